//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without
//! coupling training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, ports::Observer};

/// One JSONL record per completed episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Episode number
    pub episode: usize,
    /// Steps taken before the episode ended
    pub steps: usize,
    /// Sum of rewards over the episode
    pub total_return: f64,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    last_return: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            last_return: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (R:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, _steps: usize, total_return: f64) -> Result<()> {
        self.last_return = total_return;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("{total_return:.1}"));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{:.1}", self.last_return));
        }
        Ok(())
    }
}

/// Metrics observer - Aggregates episode returns in memory
#[derive(Debug, Default)]
pub struct MetricsObserver {
    returns: Vec<f64>,
    total_steps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Episodes observed so far.
    pub fn episodes(&self) -> usize {
        self.returns.len()
    }

    /// Total steps observed so far.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean return over observed episodes (0.0 before any episode ends).
    pub fn mean_return(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.returns.iter().sum::<f64>() / self.returns.len() as f64
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, steps: usize, total_return: f64) -> Result<()> {
        self.returns.push(total_return);
        self.total_steps += steps;
        Ok(())
    }
}

/// JSONL observer - Writes one episode record per line
///
/// Records training artifacts only; the value table itself is never
/// persisted.
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a JSONL observer writing to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create JSONL log at {}", path.as_ref().display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, episode: usize, steps: usize, total_return: f64) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            steps,
            total_return,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n").map_err(|source| Error::Io {
            operation: "write JSONL record".to_string(),
            source,
        })?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Io {
            operation: "flush JSONL log".to_string(),
            source,
        })?;
        Ok(())
    }
}
