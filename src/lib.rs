//! Tabular Q-learning value store and epsilon-greedy policy
//!
//! This crate provides:
//! - A sparse value table mapping opaque state keys to per-action returns
//! - An epsilon-greedy control policy with uniform tie-breaking
//! - Trait seams for plugging in environments, policies, and observers
//! - A step-driven training pipeline with composable observation
//! - A small deterministic gridworld for tests and demos
//!
//! The table is owned by exactly one logical caller and mutated from a
//! single thread; concurrent use is undefined and must be serialized
//! externally (e.g., a mutex around the whole policy).
//!
//! ```
//! use qlearn::{PolicyConfig, StateKey};
//!
//! let mut policy = PolicyConfig::new(3).with_epsilon(1.0).with_seed(7).build()?;
//!
//! let start = StateKey::from("start");
//! let won = StateKey::from("won");
//! policy.learn(&start, 2, 100.0, &won)?;
//!
//! // With epsilon = 1 every choice is greedy, and action 2 is now best.
//! assert_eq!(policy.choose_action(&start), 2);
//! # Ok::<(), qlearn::Error>(())
//! ```

pub mod cli;
pub mod envs;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use policy::{PolicyConfig, QLearningPolicy};
pub use table::QTable;
pub use types::StateKey;
