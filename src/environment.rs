use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::actions::Action;
use crate::forecast::ExpectedBalances;
use crate::learning::reward::{self, DQN_LOW_REFERENCE, TABULAR_LOW_REFERENCE};
use crate::stock::{self, GenerationMode};
use crate::{Error, Int, LAST_HOUR, NUM_HOURS, Result};

/// Outcome of one step of the tabular environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub hour: usize,
    pub old_stock: Int,
    pub new_stock: Int,
    pub expected_stock: Option<f64>,
    pub expected_stock_next: Option<f64>,
    pub reward: f64,
    pub done: bool,
    pub game_over: bool,
}

/// Outcome of one index-based step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DqnStep {
    pub hour: usize,
    pub old_stock: Int,
    pub new_stock: Int,
    pub reward: f64,
    pub done: bool,
}

/// A single bike station replaying one 24-hour stock scenario.
///
/// Moves shift the stock of every later hour. The scenario is fixed at
/// construction and restored by [`Environment::reset`].
#[derive(Debug, Clone)]
pub struct Environment {
    mode: GenerationMode,
    debug: bool,
    station_id: String,
    seed: u32,
    current_hour: usize,
    bike_stock_sim: Vec<Int>,
    bike_stock: Vec<Int>,
    exp_bike_stock_sim: Vec<Option<f64>>,
    exp_bike_stock: Vec<Option<f64>>,
    old_stock: Int,
    new_stock: Int,
    expected_stock: Option<f64>,
    expected_stock_new: Option<f64>,
    reward: f64,
    bike_moved: Int,
    done: bool,
    game_over: bool,
}

impl Environment {
    /// Builds a station scenario. `station_history` is only read in
    /// [`GenerationMode::Actual`].
    pub fn new<R: Rng + ?Sized>(
        mode: GenerationMode,
        debug: bool,
        station_id: &str,
        station_history: Option<&[Int]>,
        forecast: &ExpectedBalances,
        rng: &mut R,
    ) -> Result<Self> {
        info!("Creating a bike station environment for station {station_id} ({mode})");
        let seed = rng.random_range(0..=10);

        let bike_stock_sim = match stock::generate(mode, rng) {
            Some(generated) => generated,
            None => {
                let history = station_history.ok_or(Error::MissingStationHistory)?;
                if history.len() != NUM_HOURS {
                    return Err(Error::StationHistoryLength {
                        found: history.len(),
                        expected: NUM_HOURS,
                    });
                }
                history.to_vec()
            }
        };
        let exp_bike_stock_sim = forecast.trajectory(station_id)?;

        Ok(Environment {
            mode,
            debug,
            station_id: station_id.to_string(),
            seed,
            current_hour: 0,
            old_stock: bike_stock_sim[0],
            new_stock: 0,
            expected_stock: exp_bike_stock_sim[0],
            expected_stock_new: None,
            bike_stock: bike_stock_sim.clone(),
            bike_stock_sim,
            exp_bike_stock: exp_bike_stock_sim.clone(),
            exp_bike_stock_sim,
            reward: 0.0,
            bike_moved: 0,
            done: false,
            game_over: false,
        })
    }

    /// Applies `action` at the current hour, scores the hour and advances
    /// the clock unless the episode is over.
    pub fn ping(&mut self, action: Action) -> Transition {
        if self.debug {
            debug!(
                "Hour {} | stock {} | moved last hour {} | reward {} | will move {}",
                self.current_hour,
                self.current_stock(),
                self.bike_moved,
                self.reward,
                action.bikes()
            );
        }

        self.score(action.bikes(), TABULAR_LOW_REFERENCE);

        if self.current_hour == LAST_HOUR {
            self.done = true;
            self.game_over = true;
        } else {
            self.advance_hour();
            self.expected_stock = self.exp_bike_stock[self.current_hour - 1];
            if self.current_hour < LAST_HOUR {
                self.expected_stock_new = self.exp_bike_stock[self.current_hour];
            }
        }

        Transition {
            hour: self.current_hour,
            old_stock: self.old_stock,
            new_stock: self.new_stock,
            expected_stock: self.expected_stock,
            expected_stock_next: self.expected_stock_new,
            reward: self.reward,
            done: self.done,
            game_over: self.game_over,
        }
    }

    /// Index-based step. Penalises low stock against 20 rather than 30 and
    /// never raises `game_over`.
    pub fn ping_dqn(&mut self, index: usize) -> Result<DqnStep> {
        let action = Action::from_index(index).ok_or(Error::ActionIndex(index))?;
        self.score(action.bikes(), DQN_LOW_REFERENCE);

        if self.current_hour == LAST_HOUR {
            self.done = true;
        } else {
            self.advance_hour();
        }

        Ok(DqnStep {
            hour: self.current_hour,
            old_stock: self.old_stock,
            new_stock: self.new_stock,
            reward: self.reward,
            done: self.done,
        })
    }

    fn score(&mut self, bikes: Int, low_reference: Int) {
        if bikes != 0 {
            self.apply(bikes);
            self.reward = reward::move_cost(bikes);
        }
        // The band reward replaces the move cost.
        self.reward = reward::hourly_reward(self.current_stock(), low_reference);
    }

    fn advance_hour(&mut self) {
        self.current_hour += 1;
        if self.debug {
            debug!("Tick... forwarded to hour {}", self.current_hour);
        }
        self.old_stock = self.bike_stock[self.current_hour - 1];
        self.new_stock = self.bike_stock[self.current_hour];
    }

    /// Moves `num_bikes` into the station from the next hour on. The last
    /// expected slot has no value and is left alone. No-op at the last hour.
    pub fn apply(&mut self, num_bikes: Int) {
        if self.current_hour == LAST_HOUR {
            if self.debug {
                debug!("Last hour, cannot move bikes");
            }
            return;
        }
        for hour in self.current_hour + 1..NUM_HOURS {
            self.bike_stock[hour] += num_bikes;
            if hour < LAST_HOUR {
                if let Some(expected) = self.exp_bike_stock[hour].as_mut() {
                    *expected += num_bikes as f64;
                }
            }
        }
        self.bike_moved = num_bikes;
    }

    /// Replays the same scenario from hour 0.
    pub fn reset(&mut self) {
        if self.debug {
            debug!("Reset environment for station {}", self.station_id);
        }
        self.current_hour = 0;
        self.bike_stock = self.bike_stock_sim.clone();
        self.exp_bike_stock = self.exp_bike_stock_sim.clone();
        self.done = false;
        self.game_over = false;
        self.reward = 0.0;
        self.bike_moved = 0;
        self.old_stock = self.bike_stock[0];
        self.new_stock = 0;
        self.expected_stock = self.exp_bike_stock[0];
        self.expected_stock_new = None;
    }

    /// Stock at the current hour.
    pub fn current_stock(&self) -> Int {
        self.bike_stock[self.current_hour]
    }

    pub fn old_stock(&self) -> Int {
        self.old_stock
    }

    /// Expected stock for the decision at the current hour; `None` at the
    /// last hour.
    pub fn expected_stock(&self) -> Option<f64> {
        if self.current_hour < LAST_HOUR {
            self.expected_stock
        } else {
            None
        }
    }

    pub fn stock_trajectory(&self) -> &[Int] {
        &self.bike_stock
    }

    pub fn expected_trajectory(&self) -> &[Option<f64>] {
        &self.exp_bike_stock
    }

    pub fn current_hour(&self) -> usize {
        self.current_hour
    }

    pub fn bike_moved(&self) -> Int {
        self.bike_moved
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }
}
