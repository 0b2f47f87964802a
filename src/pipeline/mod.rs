//! Training pipeline framework
//!
//! Drives any [`Policy`](crate::ports::Policy) against any
//! [`Environment`](crate::ports::Environment) with one-step TD bookkeeping,
//! while composable observers collect progress, metrics, and logs.

pub mod comparison;
pub mod observers;
pub mod training;

pub use comparison::RandomPolicy;
pub use observers::{JsonlObserver, MetricsObserver, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};
