//! Error types for loading scenarios and configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No expected balances for station {0}")]
    UnknownStation(String),

    #[error("Station {station} has {found} expected balances, expected {expected}")]
    ForecastLength {
        station: String,
        found: usize,
        expected: usize,
    },

    #[error("Actual mode requires a station history")]
    MissingStationHistory,

    #[error("Station history has {found} hours, expected {expected}")]
    StationHistoryLength { found: usize, expected: usize },

    #[error("Action index {0} out of range")]
    ActionIndex(usize),
}
