use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::Int;
use crate::actions::{Action, NUM_ACTIONS};
use crate::learning::policy::ActionValues;

/// Projected stock levels in `[SHAPING_LOW, SHAPING_HIGH]` get a positive
/// initial value.
pub const SHAPING_LOW: Int = 30;
pub const SHAPING_HIGH: Int = 70;
const SHAPING_CENTRE: Int = 50;
const SHAPING_PEAK: f64 = 20.0;
const SHAPING_PENALTY: f64 = -10.0;

/// Sparse state-action value table keyed by stock level.
///
/// Rows are created on first access and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    tab: HashMap<Int, [f64; NUM_ACTIONS]>,
}

impl QTable {
    pub fn new() -> Self {
        QTable::default()
    }

    /// Initial value of moving `action` at `state`, based on the stock level
    /// the move would produce.
    pub fn shaped_value(state: Int, action: Action) -> f64 {
        let projected = state + action.bikes();
        if projected > SHAPING_HIGH {
            SHAPING_PENALTY - (projected - SHAPING_HIGH) as f64
        } else if projected < SHAPING_LOW {
            SHAPING_PENALTY - (SHAPING_LOW - projected) as f64
        } else {
            SHAPING_PEAK - (projected - SHAPING_CENTRE).abs() as f64
        }
    }

    fn initial_row(state: Int) -> [f64; NUM_ACTIONS] {
        let mut row = [0.0; NUM_ACTIONS];
        for action in Action::iter() {
            row[action.index()] = Self::shaped_value(state, action);
        }
        row
    }

    /// Inserts a shaped row for `state` if it has none yet.
    pub fn ensure_state(&mut self, state: Int) -> &mut [f64; NUM_ACTIONS] {
        self.tab
            .entry(state)
            .or_insert_with(|| Self::initial_row(state))
    }

    pub fn contains(&self, state: Int) -> bool {
        self.tab.contains_key(&state)
    }

    pub fn row(&self, state: Int) -> Option<&[f64; NUM_ACTIONS]> {
        self.tab.get(&state)
    }

    pub fn get(&self, state: Int, action: Action) -> Option<f64> {
        self.row(state).map(|row| row[action.index()])
    }

    /// Values of every action at `state`, in action order.
    pub fn action_values(&self, state: Int) -> ActionValues {
        match self.row(state) {
            Some(row) => Action::iter().map(|a| (a, row[a.index()])).collect(),
            None => Vec::new(),
        }
    }

    pub fn max_value(&self, state: Int) -> Option<f64> {
        self.row(state)
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn get_tab(&self) -> &HashMap<Int, [f64; NUM_ACTIONS]> {
        &self.tab
    }

    /// States with a row, in ascending order.
    pub fn states(&self) -> Vec<Int> {
        self.tab.keys().copied().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaped_values() {
        assert_eq!(QTable::shaped_value(50, Action::Stay), 20.0);
        assert_eq!(QTable::shaped_value(65, Action::Add10), -15.0);
        assert_eq!(QTable::shaped_value(25, Action::Remove1), -16.0);
        // Band edges are positive.
        assert_eq!(QTable::shaped_value(70, Action::Stay), 0.0);
        assert_eq!(QTable::shaped_value(30, Action::Stay), 0.0);
        assert_eq!(QTable::shaped_value(71, Action::Stay), -11.0);
    }

    #[test]
    fn test_ensure_state_inserts_shaped_row() {
        let mut table = QTable::new();
        assert!(table.is_empty());
        table.ensure_state(50);
        assert_eq!(
            table.row(50).unwrap(),
            &[5.0, 10.0, 15.0, 19.0, 20.0, 19.0, 15.0, 10.0, 5.0]
        );
        for action in Action::iter() {
            assert_eq!(
                table.get(50, action),
                Some(QTable::shaped_value(50, action))
            );
        }
    }

    #[test]
    fn test_ensure_state_keeps_existing_row() {
        let mut table = QTable::new();
        table.ensure_state(40)[Action::Stay.index()] = 99.0;
        table.ensure_state(40);
        assert_eq!(table.get(40, Action::Stay), Some(99.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_max_and_states() {
        let mut table = QTable::new();
        assert_eq!(table.max_value(10), None);
        assert!(table.action_values(10).is_empty());
        table.ensure_state(60);
        table.ensure_state(10);
        assert_eq!(table.max_value(60), Some(20.0));
        assert_eq!(table.states(), vec![10, 60]);
        assert_eq!(table.action_values(60).len(), NUM_ACTIONS);
    }
}
