use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{Int, NUM_HOURS};

/// Stock level every generated scenario starts from.
pub const INITIAL_STOCK: Int = 50;

/// Hourly demand deltas for a weekday, with commute-hour spikes.
pub const WEEKDAY_DELTAS: [Int; NUM_HOURS] = [
    1, 1, 1, 1, 1, 1, 5, 5, 5, 2, 2, 10, 10, 2, 2, 2, 2, 10, 10, 5, 5, 5, 2, 2,
];

/// Mirror image of the weekday pattern. No generation mode selects it yet.
pub const WEEKEND_DELTAS: [Int; NUM_HOURS] = [
    -1, -1, -1, -1, -1, -1, -5, -5, -5, -2, -2, -10, -10, -2, -2, -2, -2, -10, -10, -5, -5, -5, -2,
    -2,
];

/// Bound of the uniform noise added per hour in random mode.
pub const RANDOM_NOISE: Int = 3;

/// How an environment obtains its 24-hour stock trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationMode {
    /// Deterministic weekday curve.
    Specific,
    /// Weekday curve plus uniform noise in [-3, 3] per hour.
    Random,
    /// Historical trajectory supplied by the caller.
    Actual,
}

/// Generates a 24-hour trajectory starting at [`INITIAL_STOCK`].
///
/// Returns `None` for [`GenerationMode::Actual`], which has no generator.
pub fn generate<R: Rng + ?Sized>(mode: GenerationMode, rng: &mut R) -> Option<Vec<Int>> {
    let noise = |rng: &mut R| match mode {
        GenerationMode::Random => rng.random_range(-RANDOM_NOISE..=RANDOM_NOISE),
        _ => 0,
    };
    match mode {
        GenerationMode::Actual => None,
        GenerationMode::Specific | GenerationMode::Random => {
            let mut stock = Vec::with_capacity(NUM_HOURS);
            stock.push(INITIAL_STOCK);
            for delta in WEEKDAY_DELTAS.iter().take(NUM_HOURS - 1) {
                let previous = stock[stock.len() - 1];
                stock.push(previous + delta + noise(rng));
            }
            Some(stock)
        }
    }
}
