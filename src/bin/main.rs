use std::fs;

use anyhow::Context;
use citibike_rl::{config::Config, forecast::ExpectedBalances, simulation};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            Config::from_file(&path).with_context(|| format!("reading config {path}"))?
        }
        None => Config::default(),
    };
    info!(
        "Training station {} in {} mode with a {} agent",
        config.environment.station_id, config.environment.mode, config.agent.learning_mode
    );

    let forecast_path = &config.environment.forecast_path;
    let forecast = ExpectedBalances::from_json_file(forecast_path)
        .with_context(|| format!("loading expected balances from {}", forecast_path.display()))?;

    let mut rng = match config.training.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let runs = simulation::train_all(&config, &forecast, &mut rng)?;
    for run in &runs {
        let (worst, best) = run.reward_range().unwrap_or_default();
        info!(
            "Episodes: {}, Avg. Reward: {:.2}, Worst: {:.2}, Best: {:.2}, States: {}",
            run.episodes,
            run.average_reward(),
            worst,
            best,
            run.table_size
        );
    }

    // Write results to disk
    if let Some(output) = &config.training.output {
        let json = serde_json::to_string_pretty(&runs)?;
        fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
        info!("Wrote training results to {}", output.display());
    }
    Ok(())
}
