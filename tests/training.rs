use citibike_rl::{
    NUM_HOURS,
    config::Config,
    forecast::ExpectedBalances,
    learning::policy::{LearningMode, ModelBased},
    simulation::{self, Simulation},
    stock::GenerationMode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn forecast() -> ExpectedBalances {
    ExpectedBalances::from_json_file("./expected_balances.json").expect("sample forecast")
}

fn config(episodes: Vec<usize>) -> Config {
    let mut config = Config::default();
    config.training.episodes = episodes;
    config
}

#[test]
fn test_train_all_runs_each_segment() {
    let config = config(vec![3, 5]);
    let runs =
        simulation::train_all(&config, &forecast(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].summaries.len(), 3);
    assert_eq!(runs[1].summaries.len(), 5);
    assert_eq!(runs[1].hourly_stocks.len(), 5 * NUM_HOURS);
    // Every episode replays the same scenario from the same opening stock.
    assert!(runs[1].hourly_stocks.chunks(NUM_HOURS).all(|day| day[0] == 50));
}

#[test]
fn test_training_is_reproducible_with_a_seed() {
    let mut config = config(vec![20]);
    config.environment.mode = GenerationMode::Random;
    config.agent.learning_mode = LearningMode::from(ModelBased);
    let first = simulation::train_all(&config, &forecast(), &mut StdRng::seed_from_u64(8)).unwrap();
    let second = simulation::train_all(&config, &forecast(), &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_actual_mode_replays_history() {
    let mut config = config(vec![2]);
    config.environment.mode = GenerationMode::Actual;
    config.environment.station_id = "519".to_string();
    config.environment.station_history = Some((0..NUM_HOURS as i32).map(|h| 40 - h).collect());
    let mut sim =
        Simulation::from_config(&config, &forecast(), &mut StdRng::seed_from_u64(2)).unwrap();
    let run = sim.train(2);
    assert_eq!(run.hourly_stocks[0], 40);
    assert_eq!(run.hourly_stocks[NUM_HOURS], 40);
    assert!(sim.env.is_done());
}

#[test]
fn test_results_serialize_to_json() {
    let config = config(vec![1]);
    let runs =
        simulation::train_all(&config, &forecast(), &mut StdRng::seed_from_u64(4)).unwrap();
    let json = serde_json::to_value(&runs).unwrap();
    assert_eq!(json[0]["episodes"], 1);
    assert_eq!(json[0]["summaries"].as_array().unwrap().len(), 1);
}
