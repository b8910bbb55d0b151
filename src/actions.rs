use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::Int;

/// A rebalancing move at a station. Negative moves take bikes out,
/// positive moves bring bikes in.
///
/// Variants are declared in the fixed action order, which is also the
/// column order of the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Action {
    Remove15,
    Remove10,
    Remove5,
    Remove1,
    Stay,
    Add1,
    Add5,
    Add10,
    Add15,
}

pub const NUM_ACTIONS: usize = 9;

impl Action {
    /// Number of bikes moved into the station (negative for removals).
    pub fn bikes(&self) -> Int {
        match self {
            Action::Remove15 => -15,
            Action::Remove10 => -10,
            Action::Remove5 => -5,
            Action::Remove1 => -1,
            Action::Stay => 0,
            Action::Add1 => 1,
            Action::Add5 => 5,
            Action::Add10 => 10,
            Action::Add15 => 15,
        }
    }

    /// Position in the fixed action order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::iter().nth(index)
    }

    pub fn from_bikes(bikes: Int) -> Option<Action> {
        Action::iter().find(|action| action.bikes() == bikes)
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Stay)
    }
}

impl From<Action> for Int {
    fn from(action: Action) -> Self {
        action.bikes()
    }
}
