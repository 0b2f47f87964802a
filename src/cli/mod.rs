//! CLI infrastructure for the qlearn toolkit
//!
//! This module provides the command-line interface for training the tabular
//! learner on the built-in gridworld and comparing it against baselines.

pub mod commands;
