//! Sparse value table for tabular Q-learning
//!
//! Rows are created lazily on first reference, so memory grows exactly with
//! the number of distinct states visited: O(distinct states x num_actions).
//! There is no eviction and no persistence; the table lives and dies with its
//! owner.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{StateKey, check_unit_interval},
};

/// Sparse mapping from state key to one estimated return per action.
///
/// Action slots are fixed by index for the lifetime of the table; newly seen
/// states start with every slot at 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    rows: HashMap<StateKey, Vec<f64>>,
    num_actions: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new empty table for actions `0..num_actions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the action set is empty,
    /// the learning rate is outside `(0, 1]`, or the discount factor is
    /// outside `[0, 1]`.
    pub fn new(num_actions: usize, learning_rate: f64, discount_factor: f64) -> Result<Self> {
        if num_actions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "action set must not be empty".to_string(),
            });
        }
        check_unit_interval("learning rate", learning_rate, false)?;
        check_unit_interval("discount factor", discount_factor, true)?;

        Ok(Self {
            rows: HashMap::new(),
            num_actions,
            learning_rate,
            discount_factor,
        })
    }

    /// Number of action slots per row.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of distinct states seen so far.
    pub fn num_states(&self) -> usize {
        self.rows.len()
    }

    /// Check whether any state has been seen.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Learning rate α supplied at construction.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ supplied at construction.
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Lazily create the row for `state`, zero-filled. Idempotent: a second
    /// call with the same key leaves existing values untouched.
    pub fn ensure_state(&mut self, state: &StateKey) {
        if !self.rows.contains_key(state) {
            self.rows
                .insert(state.clone(), vec![0.0; self.num_actions]);
        }
    }

    /// Get the value row for a state, if it has been seen.
    pub fn values(&self, state: &StateKey) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Get the value of one (state, action) cell.
    ///
    /// Unseen states read as all-zero, matching the lazy-initialization
    /// contract.
    pub fn value(&self, state: &StateKey, action: usize) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Maximum value over a state's row (0.0 for unseen states).
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.rows
            .get(state)
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0)
    }

    /// All action indices tied for the row maximum.
    ///
    /// Every action of an unseen state is a candidate, since its row reads as
    /// all-zero. The policy breaks ties uniformly among these indices; a
    /// fixed first-index tie-break would bias the learned policy.
    pub fn greedy_candidates(&self, state: &StateKey) -> Vec<usize> {
        match self.rows.get(state) {
            Some(row) => {
                let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                row.iter()
                    .enumerate()
                    .filter(|&(_, &v)| v == max)
                    .map(|(action, _)| action)
                    .collect()
            }
            None => (0..self.num_actions).collect(),
        }
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Ensures both rows exist, then updates the single (prev, action) cell
    /// in place. No other cell is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if `action >= num_actions`. The check
    /// runs before any row is created, so a failed call leaves the table
    /// unchanged.
    pub fn update(
        &mut self,
        prev: &StateKey,
        action: usize,
        reward: f64,
        next: &StateKey,
    ) -> Result<()> {
        if action >= self.num_actions {
            return Err(Error::InvalidAction {
                action,
                num_actions: self.num_actions,
            });
        }

        self.ensure_state(next);
        let max_next = self.max_value(next);

        let num_actions = self.num_actions;
        let row = self
            .rows
            .entry(prev.clone())
            .or_insert_with(|| vec![0.0; num_actions]);

        let predicted = row[action];
        let target = reward + self.discount_factor * max_next;
        row[action] = predicted + self.learning_rate * (target - predicted);

        Ok(())
    }

    /// Forget every state (for fresh training runs).
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Iterate over the (state, row) pairs seen so far.
    ///
    /// Iteration order is unspecified; insertion order of discovered states
    /// carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64])> {
        self.rows.iter().map(|(key, row)| (key, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::new(s)
    }

    #[test]
    fn test_rejects_empty_action_set() {
        assert!(matches!(
            QTable::new(0, 0.5, 0.9),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_hyperparameters() {
        assert!(QTable::new(3, 0.0, 0.9).is_err());
        assert!(QTable::new(3, 1.5, 0.9).is_err());
        assert!(QTable::new(3, 0.5, -0.1).is_err());
        assert!(QTable::new(3, 0.5, f64::NAN).is_err());
        assert!(QTable::new(3, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_ensure_state_is_idempotent() {
        let mut table = QTable::new(3, 0.5, 0.9).unwrap();
        table.update(&key("s"), 1, 10.0, &key("s2")).unwrap();
        let before = table.values(&key("s")).unwrap().to_vec();

        table.ensure_state(&key("s"));
        assert_eq!(table.values(&key("s")).unwrap(), before.as_slice());
        assert_eq!(table.num_states(), 2);
    }

    #[test]
    fn test_unseen_state_reads_as_zero() {
        let table = QTable::new(4, 0.5, 0.9).unwrap();
        assert_eq!(table.value(&key("nowhere"), 2), 0.0);
        assert_eq!(table.max_value(&key("nowhere")), 0.0);
        assert_eq!(table.greedy_candidates(&key("nowhere")), vec![0, 1, 2, 3]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_update_applies_bellman_rule() {
        let mut table = QTable::new(3, 0.5, 0.9).unwrap();

        // From an all-zero table: 0 + 0.5 * (10 + 0.9*0 - 0) = 5.0
        table.update(&key("s"), 1, 10.0, &key("s2")).unwrap();
        assert_eq!(table.value(&key("s"), 1), 5.0);

        // Bootstraps from the next row: 0 + 0.5 * (1 + 0.9*5 - 0) = 2.75
        table.update(&key("s3"), 0, 1.0, &key("s")).unwrap();
        assert_eq!(table.value(&key("s3"), 0), 2.75);

        // Untouched cells stay zero.
        assert_eq!(table.value(&key("s"), 0), 0.0);
        assert_eq!(table.value(&key("s"), 2), 0.0);
        assert_eq!(table.values(&key("s2")).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_update_with_same_state_for_prev_and_next() {
        let mut table = QTable::new(2, 0.5, 0.9).unwrap();
        table.update(&key("loop"), 0, 10.0, &key("loop")).unwrap();
        assert_eq!(table.value(&key("loop"), 0), 5.0);
        assert_eq!(table.num_states(), 1);
    }

    #[test]
    fn test_out_of_range_action_leaves_table_unchanged() {
        let mut table = QTable::new(3, 0.5, 0.9).unwrap();
        table.update(&key("s"), 0, 1.0, &key("s2")).unwrap();
        let before: Vec<_> = {
            let mut rows: Vec<_> = table.iter().map(|(k, v)| (k.clone(), v.to_vec())).collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            rows
        };

        let err = table.update(&key("fresh"), 3, 99.0, &key("other"));
        assert!(matches!(
            err,
            Err(Error::InvalidAction {
                action: 3,
                num_actions: 3
            })
        ));

        let after: Vec<_> = {
            let mut rows: Vec<_> = table.iter().map(|(k, v)| (k.clone(), v.to_vec())).collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            rows
        };
        assert_eq!(before, after, "failed update must not grow or mutate rows");
    }

    #[test]
    fn test_greedy_candidates_returns_all_tied_maxima() {
        let mut table = QTable::new(3, 0.5, 0.9).unwrap();
        // Push actions 0 and 2 to the same value.
        table.update(&key("s"), 0, 10.0, &key("t")).unwrap();
        table.update(&key("s"), 2, 10.0, &key("t")).unwrap();
        assert_eq!(table.greedy_candidates(&key("s")), vec![0, 2]);
    }

    #[test]
    fn test_reset_forgets_all_states() {
        let mut table = QTable::new(2, 0.5, 0.9).unwrap();
        table.update(&key("a"), 0, 1.0, &key("b")).unwrap();
        assert_eq!(table.num_states(), 2);

        table.reset();
        assert!(table.is_empty());
        assert_eq!(table.num_actions(), 2);
    }
}
