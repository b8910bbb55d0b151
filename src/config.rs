use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::learning::policy::LearningMode;
use crate::stock::GenerationMode;
use crate::{Int, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub environment: EnvironmentConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Probability of acting greedily on each decision.
    pub epsilon: f64,
    pub learning_rate: f64,
    /// Discount factor.
    pub gamma: f64,
    pub learning_mode: LearningMode,
    pub debug: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            epsilon: 0.9,
            learning_rate: 0.01,
            gamma: 0.9,
            learning_mode: LearningMode::default(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub mode: GenerationMode,
    pub station_id: String,
    pub debug: bool,
    /// JSON file mapping station ids to expected next-hour balances.
    pub forecast_path: PathBuf,
    /// Hourly stock for `actual` mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_history: Option<Vec<Int>>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            mode: GenerationMode::Specific,
            station_id: "497".to_string(),
            debug: false,
            forecast_path: PathBuf::from("expected_balances.json"),
            station_history: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Episode count of each training run. Every run starts from a fresh agent.
    pub episodes: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Where to write the JSON training results, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: (100..=500).step_by(100).collect(),
            seed: None,
            output: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let toml = fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::policy::ModelBased;

    #[test]
    fn test_config_serialization_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("learning_mode = \"model_free\""));
        assert!(serialized.contains("mode = \"specific\""));

        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
            [agent]
            epsilon = 0.5
            learning_mode = "model_based"

            [environment]
            mode = "actual"
            station_history = [1, 2, 3]
            "#,
        )
        .unwrap();
        assert_eq!(config.agent.epsilon, 0.5);
        assert_eq!(config.agent.learning_mode, LearningMode::from(ModelBased));
        assert_eq!(config.agent.gamma, 0.9);
        assert_eq!(config.environment.mode, GenerationMode::Actual);
        assert_eq!(config.environment.station_history, Some(vec![1, 2, 3]));
        assert_eq!(config.training.episodes, vec![100, 200, 300, 400, 500]);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Config::from_toml_str("[agent]\nlearning_mode = \"dqn\"").is_err());
    }

    #[test]
    fn test_read_from_file() {
        let config = Config::from_file("./citibike-rl.toml").expect("Failed to read the file");
        assert_eq!(config.environment.station_id, "497");
    }
}
