use log::debug;
use rand::Rng;

use crate::Int;
use crate::actions::Action;
use crate::config::AgentConfig;
use crate::learning::policy::{self, ActionValues, LearningMode, StateProjection};
use crate::learning::q_table::QTable;

/// Tabular Q-learning agent for a single station.
///
/// Epsilon is the probability of acting greedily: a draw below epsilon
/// exploits the table, anything else explores.
#[derive(Debug, Clone)]
pub struct QAgent<R: Rng> {
    epsilon: f64,
    learning_rate: f64,
    gamma: f64,
    mode: LearningMode,
    debug: bool,
    current_stock: Int,
    expected_stock: Option<f64>,
    q_table: QTable,
    hourly_action_history: Vec<Action>,
    hourly_stock_history: Vec<Int>,
    rng: R,
}

impl<R: Rng> QAgent<R> {
    pub fn new(
        config: &AgentConfig,
        current_stock: Int,
        expected_stock: Option<f64>,
        rng: R,
    ) -> Self {
        debug!(
            "Created a {} agent (epsilon {}, learning rate {}, gamma {})",
            config.learning_mode, config.epsilon, config.learning_rate, config.gamma
        );
        QAgent {
            epsilon: config.epsilon,
            learning_rate: config.learning_rate,
            gamma: config.gamma,
            mode: config.learning_mode,
            debug: config.debug,
            current_stock,
            expected_stock,
            q_table: QTable::new(),
            hourly_action_history: vec![],
            hourly_stock_history: vec![],
            rng,
        }
    }

    /// State key for a decision at `stock`, ensuring it has a row.
    fn decision_state(&mut self, stock: Int, expected: Option<f64>) -> Int {
        let state = self.mode.project(stock, expected);
        if self.debug && self.mode.is_model_based() && state == stock && expected.is_none() {
            debug!("No expected stock, deciding on current stock {stock}");
        }
        self.q_table.ensure_state(state);
        state
    }

    /// Chooses how many bikes to move given the current and expected stock.
    pub fn choose_action(&mut self, stock: Int, expected: Option<f64>) -> Action {
        self.q_table.ensure_state(stock);
        self.current_stock = stock;
        self.expected_stock = expected;

        let state = self.decision_state(stock, expected);
        let mut candidates = self.q_table.action_values(state);

        let action = if self.rng.random::<f64>() < self.epsilon {
            let action = policy::greedy(&mut candidates, &mut self.rng);
            if self.debug {
                debug!("Decided to move: {}", action.bikes());
            }
            action
        } else {
            let action = policy::random(&candidates, &mut self.rng);
            if self.debug {
                debug!("Randomly move: {}", action.bikes());
            }
            action
        };

        self.hourly_action_history.push(action);
        self.hourly_stock_history.push(stock);
        action
    }

    /// One-step Q-learning update for the transition `stock -> next_stock`.
    ///
    /// Terminal transitions have no lookahead term.
    pub fn learn(
        &mut self,
        stock: Int,
        action: Action,
        reward: f64,
        next_stock: Int,
        expected: Option<f64>,
        is_terminal: bool,
    ) {
        if self.debug {
            debug!(
                "Moved bikes: {} | old stock: {} | new stock: {}",
                action.bikes(),
                stock,
                next_stock
            );
        }
        self.q_table.ensure_state(next_stock);
        let state = self.decision_state(stock, expected);

        let q_target = if is_terminal {
            reward
        } else {
            let next_max = self.q_table.max_value(next_stock).unwrap_or_default();
            reward + self.gamma * next_max
        };

        let learning_rate = self.learning_rate;
        let value = &mut self.q_table.ensure_state(state)[action.index()];
        let q_predict = *value;
        *value += learning_rate * (q_target - q_predict);
    }

    /// Drops candidates that would leave the station with negative stock,
    /// measured against the stock of the last decision.
    pub fn find_valid_action(&self, mut candidates: ActionValues) -> ActionValues {
        candidates.retain(|(action, _)| {
            let valid = self.current_stock + action.bikes() >= 0;
            if !valid && self.debug {
                debug!(
                    "Drop action {}, current stock {}",
                    action.bikes(),
                    self.current_stock
                );
            }
            valid
        });
        candidates
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn hourly_actions(&self) -> &[Action] {
        &self.hourly_action_history
    }

    pub fn hourly_stocks(&self) -> &[Int] {
        &self.hourly_stock_history
    }

    pub fn reset_hourly_history(&mut self) {
        self.hourly_action_history.clear();
        self.hourly_stock_history.clear();
    }

    pub fn current_stock(&self) -> Int {
        self.current_stock
    }

    pub fn expected_stock(&self) -> Option<f64> {
        self.expected_stock
    }

    pub fn learning_mode(&self) -> LearningMode {
        self.mode
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
