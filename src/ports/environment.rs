//! Environment port - the seam the external adapter occupies
//!
//! The value store itself has no notion of observations, commands, or
//! rewards. Everything domain-specific lives behind this trait: deriving a
//! `StateKey` from raw observations, mapping action indices back to concrete
//! commands, and shaping the per-step reward.

use crate::{Result, types::StateKey};

/// One completed environment transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Successor state after the action
    pub state: StateKey,
    /// Reward observed for the transition
    pub reward: f64,
    /// Whether the episode ended on this step
    pub done: bool,
}

/// Episodic environment driven one action at a time.
///
/// Implementations must serialize equal observations to equal state keys;
/// any canonical, order-preserving serialization of the feature tuple is
/// acceptable.
pub trait Environment {
    /// Number of valid actions; indices run over `0..num_actions`.
    fn num_actions(&self) -> usize;

    /// Start a new episode and return the initial state.
    fn reset(&mut self) -> StateKey;

    /// Apply one action and observe the transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the action index is out of range or the episode
    /// has already finished.
    fn step(&mut self, action: usize) -> Result<Step>;
}
