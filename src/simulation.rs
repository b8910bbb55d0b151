use itertools::{Itertools, MinMaxResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::Config;
use crate::environment::Environment;
use crate::forecast::ExpectedBalances;
use crate::learning::agent::QAgent;
use crate::{Int, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub total_reward: f64,
    /// Absolute number of bikes moved over the day.
    pub bikes_moved: Int,
    pub final_stock: Int,
}

/// Results of one training run over a fixed number of episodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRun {
    pub episodes: usize,
    pub summaries: Vec<EpisodeSummary>,
    pub hourly_actions: Vec<Int>,
    pub hourly_stocks: Vec<Int>,
    pub table_size: usize,
}

impl TrainingRun {
    pub fn average_reward(&self) -> f64 {
        if self.summaries.is_empty() {
            return 0.0;
        }
        self.summaries.iter().map(|s| s.total_reward).sum::<f64>() / self.summaries.len() as f64
    }

    /// Lowest and highest episode reward.
    pub fn reward_range(&self) -> Option<(f64, f64)> {
        match self
            .summaries
            .iter()
            .map(|s| s.total_reward)
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(r) => Some((r, r)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }
}

/// One agent learning on one station.
#[derive(Debug)]
pub struct Simulation<R: Rng> {
    pub env: Environment,
    pub agent: QAgent<R>,
}

impl<R: Rng> Simulation<R> {
    pub fn new(env: Environment, agent: QAgent<R>) -> Self {
        Simulation { env, agent }
    }

    /// Plays one day from hour 0 until the environment reports done.
    pub fn run_episode(&mut self, episode: usize) -> EpisodeSummary {
        // Per hour:
        // - Read current and expected stock
        // - Agent selects a move
        // - Station applies the move and scores the hour
        // - Agent learns from the transition
        self.env.reset();
        let mut total_reward = 0.0;
        let mut bikes_moved = 0;
        loop {
            let stock = self.env.current_stock();
            let expected = self.env.expected_stock();
            let action = self.agent.choose_action(stock, expected);
            let transition = self.env.ping(action);
            self.agent.learn(
                stock,
                action,
                transition.reward,
                transition.new_stock,
                expected,
                transition.game_over,
            );
            total_reward += transition.reward;
            bikes_moved += action.bikes().abs();
            if transition.done {
                break;
            }
        }
        debug!("Episode {episode}: reward {total_reward:.1}, moved {bikes_moved} bikes");
        EpisodeSummary {
            episode,
            total_reward,
            bikes_moved,
            final_stock: self.env.current_stock(),
        }
    }

    /// Trains for `episodes` episodes. Hourly history covers this run only.
    pub fn train(&mut self, episodes: usize) -> TrainingRun {
        self.agent.reset_hourly_history();
        let summaries = (0..episodes).map(|e| self.run_episode(e)).collect_vec();
        TrainingRun {
            episodes,
            summaries,
            hourly_actions: self
                .agent
                .hourly_actions()
                .iter()
                .map(|a| a.bikes())
                .collect(),
            hourly_stocks: self.agent.hourly_stocks().to_vec(),
            table_size: self.agent.q_table().len(),
        }
    }
}

impl Simulation<StdRng> {
    /// Builds a fresh station and agent from the configuration.
    pub fn from_config(
        config: &Config,
        forecast: &ExpectedBalances,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let env_config = &config.environment;
        let env = Environment::new(
            env_config.mode,
            env_config.debug,
            &env_config.station_id,
            env_config.station_history.as_deref(),
            forecast,
            rng,
        )?;
        let agent = QAgent::new(
            &config.agent,
            env.current_stock(),
            env.expected_stock(),
            StdRng::seed_from_u64(rng.random()),
        );
        Ok(Simulation::new(env, agent))
    }
}

/// Runs one training run per configured episode count, each with a fresh
/// station and agent.
pub fn train_all(
    config: &Config,
    forecast: &ExpectedBalances,
    rng: &mut StdRng,
) -> Result<Vec<TrainingRun>> {
    let mut runs = Vec::with_capacity(config.training.episodes.len());
    for &episodes in &config.training.episodes {
        let mut sim = Simulation::from_config(config, forecast, rng)?;
        let run = sim.train(episodes);
        info!(
            "Station {}: {} episodes, average reward {:.2}, {} states learned",
            sim.env.station_id(),
            episodes,
            run.average_reward(),
            run.table_size
        );
        runs.push(run);
    }
    Ok(runs)
}
