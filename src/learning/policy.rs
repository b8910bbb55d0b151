use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::Int;
use crate::actions::Action;

/// Action values for one state, in the order they are considered.
pub type ActionValues = Vec<(Action, f64)>;

/// Maps the observed stock onto the value-table state used for a decision.
#[enum_dispatch]
pub trait StateProjection {
    fn project(&self, stock: Int, expected: Option<f64>) -> Int;
}

/// Decide on the current stock alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelFree;

/// Decide on the average of current and expected next-hour stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelBased;

impl StateProjection for ModelFree {
    fn project(&self, stock: Int, _expected: Option<f64>) -> Int {
        stock
    }
}

impl StateProjection for ModelBased {
    /// Falls back to the raw stock when no usable expectation exists.
    fn project(&self, stock: Int, expected: Option<f64>) -> Int {
        expected
            .and_then(|expected| averaged_state(stock, expected))
            .unwrap_or(stock)
    }
}

#[enum_dispatch(StateProjection)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LearningMode {
    ModelFree,
    ModelBased,
}

impl Default for LearningMode {
    fn default() -> Self {
        LearningMode::from(ModelFree)
    }
}

impl LearningMode {
    pub fn is_model_based(&self) -> bool {
        matches!(self, LearningMode::ModelBased(_))
    }

    fn name(&self) -> &'static str {
        match self {
            LearningMode::ModelFree(_) => "model_free",
            LearningMode::ModelBased(_) => "model_based",
        }
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LearningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "model_free" => Ok(ModelFree.into()),
            "model_based" => Ok(ModelBased.into()),
            other => Err(format!("unknown learning mode: {other}")),
        }
    }
}

impl TryFrom<String> for LearningMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LearningMode> for String {
    fn from(mode: LearningMode) -> Self {
        mode.name().to_string()
    }
}

/// Average of current and expected stock, rounded half to even.
/// Returns `None` when the average is not a finite number.
pub fn averaged_state(stock: Int, expected: f64) -> Option<Int> {
    let avg = (0.5 * stock as f64 + 0.5 * expected).round_ties_even();
    avg.is_finite().then_some(avg as Int)
}

/// Highest-valued action, with ties broken uniformly at random.
///
/// The candidates are shuffled and the first maximum in the new order wins.
/// Defaults to [`Action::Stay`] when there are no candidates.
pub fn greedy<R: Rng + ?Sized>(candidates: &mut [(Action, f64)], rng: &mut R) -> Action {
    candidates.shuffle(rng);
    candidates
        .iter()
        .fold(None, |best: Option<(Action, f64)>, &(action, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((action, value)),
        })
        .map(|(action, _)| action)
        .unwrap_or(Action::Stay)
}

/// Uniformly random candidate, or [`Action::Stay`] when there are none.
pub fn random<R: Rng + ?Sized>(candidates: &[(Action, f64)], rng: &mut R) -> Action {
    candidates
        .choose(rng)
        .map(|(action, _)| *action)
        .unwrap_or(Action::Stay)
}
