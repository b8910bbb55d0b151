//! Expected next-hour stock per station, as produced by an offline
//! demand model.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, LAST_HOUR, NUM_HOURS, Result};

/// Number of forecast values per station. The terminal hour has no successor.
pub const FORECAST_HOURS: usize = LAST_HOUR;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedBalances {
    pub balances: HashMap<String, Vec<f64>>,
}

impl ExpectedBalances {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, station_id: impl Into<String>, balances: Vec<f64>) {
        self.balances.insert(station_id.into(), balances);
    }

    /// Returns the 24-slot expected trajectory for a station. The final slot
    /// is always `None`.
    pub fn trajectory(&self, station_id: &str) -> Result<Vec<Option<f64>>> {
        let balances = self
            .balances
            .get(station_id)
            .ok_or_else(|| Error::UnknownStation(station_id.to_string()))?;
        if balances.len() != FORECAST_HOURS {
            return Err(Error::ForecastLength {
                station: station_id.to_string(),
                found: balances.len(),
                expected: FORECAST_HOURS,
            });
        }
        let mut trajectory: Vec<Option<f64>> = balances.iter().copied().map(Some).collect();
        trajectory.push(None);
        debug_assert_eq!(trajectory.len(), NUM_HOURS);
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn flat(value: f64) -> Vec<f64> {
        vec![value; FORECAST_HOURS]
    }

    #[test]
    fn test_trajectory_is_padded() {
        let mut forecast = ExpectedBalances::default();
        forecast.insert("497", flat(48.5));
        let trajectory = forecast.trajectory("497").unwrap();
        assert_eq!(trajectory.len(), NUM_HOURS);
        assert_eq!(trajectory[0], Some(48.5));
        assert_eq!(trajectory[LAST_HOUR - 1], Some(48.5));
        assert_eq!(trajectory[LAST_HOUR], None);
    }

    #[test]
    fn test_unknown_station() {
        let forecast = ExpectedBalances::default();
        assert!(matches!(
            forecast.trajectory("1"),
            Err(Error::UnknownStation(id)) if id == "1"
        ));
    }

    #[test]
    fn test_wrong_length() {
        let mut forecast = ExpectedBalances::default();
        forecast.insert("7", vec![1.0; 5]);
        assert!(matches!(
            forecast.trajectory("7"),
            Err(Error::ForecastLength { found: 5, .. })
        ));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let values = flat(50.0)
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(file, "{{\"497\": [{values}]}}").unwrap();

        let forecast = ExpectedBalances::from_json_file(file.path()).unwrap();
        assert_eq!(forecast.trajectory("497").unwrap()[3], Some(50.0));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ExpectedBalances::from_json_str("{\"497\": \"x\"}"),
            Err(Error::Json(_))
        ));
    }
}
