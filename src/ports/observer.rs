//! Observer port - abstraction for training observation and data collection
//!
//! Observers can be composed to collect different kinds of data during
//! training without coupling the pipeline to specific output formats.
//!
//! # Event Sequence
//!
//! 1. `on_training_start(total_episodes)` - once at the beginning
//! 2. For each episode:
//!    - `on_step(...)` - for each completed transition
//!    - `on_episode_end(episode, steps, total_return)`
//! 3. `on_training_end()` - once at the end

use crate::{Result, types::StateKey};

/// Observer trait for monitoring training.
///
/// # Examples
///
/// ```no_run
/// use qlearn::ports::Observer;
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _steps: usize,
///         _total_return: f64,
///     ) -> qlearn::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each completed transition, before the next selection.
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &StateKey,
        _action: usize,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends (terminal state or step cap).
    fn on_episode_end(&mut self, _episode: usize, _steps: usize, _total_return: f64) -> Result<()> {
        Ok(())
    }

    /// Called when training completes. Use this to flush files or display
    /// summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
