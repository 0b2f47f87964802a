//! Training pipeline for step-driven policies

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Environment, Observer, Policy},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Step cap per episode, so non-terminating policies still make progress
    pub max_steps_per_episode: usize,

    /// Random seed applied to the policy before training
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 500,
            max_steps_per_episode: 200,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Total environment steps across all episodes
    pub total_steps: usize,

    /// Mean episode return
    pub mean_return: f64,

    /// Best episode return
    pub best_return: f64,

    /// Return of the final episode
    pub final_return: f64,

    /// Per-episode returns, in order
    pub returns: Vec<f64>,
}

impl TrainingResult {
    /// Build a result from per-episode returns.
    pub fn new(returns: Vec<f64>, total_steps: usize) -> Self {
        let total_episodes = returns.len();
        let mean_return = if total_episodes > 0 {
            returns.iter().sum::<f64>() / total_episodes as f64
        } else {
            0.0
        };
        let best_return = if total_episodes > 0 {
            returns.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        } else {
            0.0
        };
        let final_return = returns.last().copied().unwrap_or(0.0);

        Self {
            total_episodes,
            total_steps,
            mean_return,
            best_return,
            final_return,
            returns,
        }
    }

    /// Mean return over the last `n` episodes (all episodes if fewer).
    pub fn mean_return_last(&self, n: usize) -> f64 {
        let tail = &self.returns[self.returns.len().saturating_sub(n)..];
        if tail.is_empty() {
            0.0
        } else {
            tail.iter().sum::<f64>() / tail.len() as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single policy in a single environment.
///
/// Each step follows the one-step TD control loop: select an action for the
/// current state, apply it, hand the completed transition to the policy's
/// `learn`, then move on. Terminal states are never acted from, so their
/// rows stay at zero and the bootstrap term vanishes naturally.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run training and collect per-episode returns.
    ///
    /// # Errors
    ///
    /// Propagates the first error from the policy, the environment, or any
    /// observer.
    pub fn run(
        &mut self,
        policy: &mut dyn Policy,
        env: &mut dyn Environment,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            policy.set_rng_seed(seed)?;
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        let mut returns = Vec::with_capacity(self.config.num_episodes);
        let mut total_steps = 0;

        for episode in 0..self.config.num_episodes {
            let mut state = env.reset();
            let mut episode_return = 0.0;
            let mut steps = 0;

            for step_num in 0..self.config.max_steps_per_episode {
                let action = policy.select_action(&state)?;
                let step = env.step(action)?;
                policy.learn(&state, action, step.reward, &step.state)?;

                episode_return += step.reward;
                steps += 1;

                for observer in &mut self.observers {
                    observer.on_step(episode, step_num, &state, action, step.reward)?;
                }

                state = step.state;
                if step.done {
                    break;
                }
            }

            total_steps += steps;
            returns.push(episode_return);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, steps, episode_return)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(returns, total_steps))
    }
}
