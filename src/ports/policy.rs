//! Policy port - abstraction for action selection and learning
//!
//! This port defines the interface the training pipeline drives, allowing it
//! to work with:
//! - Adaptive policies (tabular Q-learning)
//! - Non-adaptive baselines (uniform random)

use crate::{Result, types::StateKey};

/// Unified interface for control policies.
///
/// A policy maps state keys to action indices and may update itself from
/// observed transitions. Non-adaptive baselines use the default no-op
/// `learn`.
///
/// # Examples
///
/// ```no_run
/// use qlearn::{ports::Policy, StateKey};
///
/// fn drive<P: Policy>(policy: &mut P, state: &StateKey) -> qlearn::Result<usize> {
///     policy.select_action(state)
/// }
/// ```
pub trait Policy: Send {
    /// Select an action index for the given state.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot produce an action for this
    /// state.
    fn select_action(&mut self, state: &StateKey) -> Result<usize>;

    /// Update the policy from one observed transition.
    ///
    /// Called once per completed step with the state the action was taken
    /// from, the action, the observed reward, and the successor state.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive policies.
    fn learn(
        &mut self,
        _prev: &StateKey,
        _action: usize,
        _reward: f64,
        _next: &StateKey,
    ) -> Result<()> {
        Ok(())
    }

    /// Get the policy's name, used in comparisons and logging.
    fn name(&self) -> &str;

    /// Reset the policy to its initial conditions.
    ///
    /// Adaptive policies should forget their learned values; stateless
    /// policies can use the default no-op.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the policy's internal random number generator.
    ///
    /// Training pipelines call this when supplied with a deterministic seed.
    /// Policies without internal randomness can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
