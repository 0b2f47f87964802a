//! Epsilon-greedy Q-learning control
//!
//! The policy owns its table and random number generator outright. There is
//! no process-wide singleton: independent learners can run side by side in
//! one process without interference. A policy is single-threaded by design;
//! callers needing concurrency must serialize access externally.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::Result,
    ports::Policy,
    table::QTable,
    types::{StateKey, check_unit_interval, defaults},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Configuration for creating a [`QLearningPolicy`].
///
/// Builder-style API over the action count and the three hyperparameters,
/// each with a documented default:
/// learning rate 0.01, discount factor 0.9, epsilon 0.9.
///
/// # Examples
///
/// ```
/// use qlearn::PolicyConfig;
///
/// let policy = PolicyConfig::new(7)
///     .with_learning_rate(0.1)
///     .with_discount_factor(0.95)
///     .with_epsilon(0.8)
///     .with_seed(42)
///     .build()?;
/// # Ok::<(), qlearn::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Number of valid actions; indices run over `0..num_actions`
    pub num_actions: usize,
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in [0, 1]
    pub discount_factor: f64,
    /// Probability of acting greedily, in [0, 1]
    pub epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl PolicyConfig {
    /// Create a configuration for the given action count with default
    /// hyperparameters.
    pub fn new(num_actions: usize) -> Self {
        Self {
            num_actions,
            learning_rate: defaults::LEARNING_RATE,
            discount_factor: defaults::DISCOUNT_FACTOR,
            epsilon: defaults::EPSILON,
            seed: None,
        }
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the probability of acting greedily.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and build the policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the action set is
    /// empty or any hyperparameter is outside its stated range.
    pub fn build(self) -> Result<QLearningPolicy> {
        check_unit_interval("epsilon", self.epsilon, true)?;
        let table = QTable::new(self.num_actions, self.learning_rate, self.discount_factor)?;

        Ok(QLearningPolicy {
            table,
            epsilon: self.epsilon,
            rng: build_rng(self.seed),
            rng_seed: self.seed,
        })
    }
}

/// Tabular Q-learning policy with epsilon-greedy action selection.
///
/// With probability `epsilon` the policy picks uniformly among the actions
/// tied for the current row maximum; otherwise it picks uniformly among all
/// actions, ignoring the value row entirely. Ties are never broken toward
/// the first index, which would silently bias the learned policy.
#[derive(Debug, Clone)]
pub struct QLearningPolicy {
    table: QTable,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningPolicy {
    /// Create a policy with default hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `num_actions` is
    /// zero.
    pub fn new(num_actions: usize) -> Result<Self> {
        PolicyConfig::new(num_actions).build()
    }

    /// Seed the internal random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Select an action for the given state.
    ///
    /// Ensures the state row exists (growing the table if needed), then acts
    /// greedily with probability `epsilon` and uniformly at random otherwise.
    pub fn choose_action(&mut self, state: &StateKey) -> usize {
        self.table.ensure_state(state);

        if self.rng.random::<f64>() < self.epsilon {
            // Exploit: uniform among all actions tied for the row maximum
            let candidates = self.table.greedy_candidates(state);
            *candidates.choose(&mut self.rng).unwrap()
        } else {
            // Explore: uniform over all actions, independent of the row
            self.rng.random_range(0..self.table.num_actions())
        }
    }

    /// Apply one Q-learning update for the observed transition.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if `action` is out of range;
    /// the table is left unchanged in that case.
    pub fn learn(
        &mut self,
        prev: &StateKey,
        action: usize,
        reward: f64,
        next: &StateKey,
    ) -> Result<()> {
        self.table.update(prev, action, reward, next)
    }

    /// Read access to the underlying value table.
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Probability of acting greedily.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Policy for QLearningPolicy {
    fn select_action(&mut self, state: &StateKey) -> Result<usize> {
        Ok(self.choose_action(state))
    }

    fn learn(
        &mut self,
        prev: &StateKey,
        action: usize,
        reward: f64,
        next: &StateKey,
    ) -> Result<()> {
        QLearningPolicy::learn(self, prev, action, reward, next)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        self.table.reset();
        self.reset_rng();
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}
