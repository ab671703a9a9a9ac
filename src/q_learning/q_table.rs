//! Dense Q-table for temporal difference learning

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, State},
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored row-major as one contiguous `num_states × num_actions` buffer.
/// Dimensions are fixed at construction. Every accessor checks its indices
/// and reports a violation instead of clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Vec<f64>,
    num_states: usize,
    num_actions: usize,
    /// Initial Q-value for every pair
    q_init: f64,
}

impl QTable {
    /// Create a table filled with `q_init`.
    ///
    /// # Errors
    ///
    /// Fails for zero states, zero actions, or a non-finite `q_init`.
    pub fn new(num_states: usize, num_actions: usize, q_init: f64) -> Result<Self> {
        if num_states == 0 || num_actions == 0 {
            return Err(Error::InvalidDimensions {
                num_states,
                num_actions,
            });
        }
        if !q_init.is_finite() {
            return Err(Error::InvalidHyperparameter {
                name: "q_init",
                value: q_init,
                reason: "must be finite",
            });
        }
        Ok(Self {
            values: vec![q_init; num_states * num_actions],
            num_states,
            num_actions,
            q_init,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    fn check_state(&self, state: State) -> Result<()> {
        if state >= self.num_states {
            return Err(Error::StateOutOfRange {
                state,
                num_states: self.num_states,
            });
        }
        Ok(())
    }

    fn index(&self, state: State, action: Action) -> Result<usize> {
        self.check_state(state)?;
        if action >= self.num_actions {
            return Err(Error::ActionOutOfRange {
                action,
                num_actions: self.num_actions,
            });
        }
        Ok(state * self.num_actions + action)
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: State, action: Action) -> Result<f64> {
        Ok(self.values[self.index(state, action)?])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: Action, value: f64) -> Result<()> {
        let idx = self.index(state, action)?;
        self.values[idx] = value;
        Ok(())
    }

    /// All action values of one state
    pub fn row(&self, state: State) -> Result<&[f64]> {
        self.check_state(state)?;
        let start = state * self.num_actions;
        Ok(&self.values[start..start + self.num_actions])
    }

    /// Get maximum Q-value in a state
    pub fn max_q(&self, state: State) -> Result<f64> {
        Ok(self.row(state)?.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Every action whose value equals the row maximum exactly.
    ///
    /// No tolerance is applied: two values tie only if they compare equal.
    pub fn greedy_actions(&self, state: State) -> Result<Vec<Action>> {
        let row = self.row(state)?;
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<Action> = row
            .iter()
            .enumerate()
            .filter(|(_, q)| **q == max)
            .map(|(action, _)| action)
            .collect();
        if ties.is_empty() {
            // only reachable when the row is entirely NaN
            return Ok((0..self.num_actions).collect());
        }
        Ok(ties)
    }

    /// Lowest-indexed action attaining the row maximum.
    pub fn first_greedy_action(&self, state: State) -> Result<Action> {
        Ok(self.greedy_actions(state)?[0])
    }

    /// True when every action in the row has exactly the same value.
    pub fn is_row_uniform(&self, state: State) -> Result<bool> {
        let row = self.row(state)?;
        Ok(row.iter().all(|q| *q == row[0]))
    }

    /// Move `Q(s,a)` a step of size `learning_rate` toward `target`.
    ///
    /// Q(s,a) ← Q(s,a) + α[target − Q(s,a)]
    ///
    /// Returns the new value.
    pub fn td_update(
        &mut self,
        state: State,
        action: Action,
        target: f64,
        learning_rate: f64,
    ) -> Result<f64> {
        let idx = self.index(state, action)?;
        let current = self.values[idx];
        let updated = current + learning_rate * (target - current);
        self.values[idx] = updated;
        Ok(updated)
    }

    /// Copy of the table as one `Vec` per state.
    pub fn snapshot(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.num_actions)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Reset every value to `q_init`
    pub fn reset(&mut self) {
        self.values.fill(self.q_init);
    }

    /// Number of pairs whose value differs from `q_init`
    pub fn visited_pairs(&self) -> usize {
        self.values.iter().filter(|&&q| q != self.q_init).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(4, 3, 0.0).unwrap();
        assert_eq!(qtable.get(0, 0).unwrap(), 0.0);
        assert_eq!(qtable.row(3).unwrap(), &[0.0, 0.0, 0.0]);
        let optimistic = QTable::new(2, 2, 5.0).unwrap();
        assert_eq!(optimistic.get(1, 1).unwrap(), 5.0);
    }

    #[test]
    fn test_qtable_rejects_empty_dimensions() {
        assert!(matches!(
            QTable::new(0, 4, 0.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(QTable::new(4, 0, 0.0).is_err());
        assert!(QTable::new(4, 4, f64::INFINITY).is_err());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(4, 3, 0.0).unwrap();
        qtable.set(2, 1, 1.5).unwrap();
        assert_eq!(qtable.get(2, 1).unwrap(), 1.5);
        assert_eq!(qtable.visited_pairs(), 1);
    }

    #[test]
    fn test_out_of_range_indices_fail() {
        let mut qtable = QTable::new(4, 3, 0.0).unwrap();
        assert!(matches!(
            qtable.set(4, 0, 1.0),
            Err(Error::StateOutOfRange {
                state: 4,
                num_states: 4
            })
        ));
        assert!(matches!(
            qtable.get(0, 3),
            Err(Error::ActionOutOfRange {
                action: 3,
                num_actions: 3
            })
        ));
        assert!(qtable.row(10).is_err());
        assert_eq!(qtable.visited_pairs(), 0);
    }

    #[test]
    fn test_max_q_and_greedy_ties() {
        let mut qtable = QTable::new(1, 4, 0.0).unwrap();
        qtable.set(0, 0, 0.5).unwrap();
        qtable.set(0, 1, 1.5).unwrap();
        qtable.set(0, 3, 1.5).unwrap();
        assert_eq!(qtable.max_q(0).unwrap(), 1.5);
        assert_eq!(qtable.greedy_actions(0).unwrap(), vec![1, 3]);
        assert_eq!(qtable.first_greedy_action(0).unwrap(), 1);
        assert!(!qtable.is_row_uniform(0).unwrap());
    }

    #[test]
    fn test_td_update_moves_toward_target() {
        let mut qtable = QTable::new(2, 2, 0.0).unwrap();
        let updated = qtable.td_update(0, 1, 10.0, 0.5).unwrap();
        assert_eq!(updated, 5.0);
        let updated = qtable.td_update(0, 1, 10.0, 0.5).unwrap();
        assert_eq!(updated, 7.5);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let mut qtable = QTable::new(2, 2, 1.0).unwrap();
        qtable.set(1, 0, -3.0).unwrap();
        assert_eq!(qtable.snapshot(), vec![vec![1.0, 1.0], vec![-3.0, 1.0]]);
        qtable.reset();
        assert_eq!(qtable.snapshot(), vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
    }
}
