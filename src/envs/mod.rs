//! Reference environments for tests, demos, and the CLI.

pub mod gridworld;

pub use gridworld::GridWorld;
