//! Train command - run tabular Q-learning on the built-in gridworld

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{
    PolicyConfig,
    envs::GridWorld,
    pipeline::{JsonlObserver, ProgressObserver, TrainingConfig, TrainingPipeline, TrainingResult},
    types::defaults,
};

/// Arguments for the train command
#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, default_value_t = 500)]
    pub episodes: usize,

    /// Step cap per episode
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,

    /// Grid width in cells
    #[arg(long, default_value_t = 5)]
    pub width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 5)]
    pub height: usize,

    /// Learning rate in (0, 1]
    #[arg(long, default_value_t = defaults::LEARNING_RATE)]
    pub learning_rate: f64,

    /// Discount factor in [0, 1]
    #[arg(long, default_value_t = defaults::DISCOUNT_FACTOR)]
    pub discount_factor: f64,

    /// Probability of acting greedily, in [0, 1]
    #[arg(long, default_value_t = defaults::EPSILON)]
    pub epsilon: f64,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write one JSON line per episode to this file
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Write the final training result as JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// Execute the train command
pub fn execute(args: TrainArgs) -> Result<()> {
    let mut env = GridWorld::new(args.width, args.height)?;
    let mut policy = PolicyConfig::new(4)
        .with_learning_rate(args.learning_rate)
        .with_discount_factor(args.discount_factor)
        .with_epsilon(args.epsilon)
        .build()?;

    let config = TrainingConfig {
        num_episodes: args.episodes,
        max_steps_per_episode: args.max_steps,
        seed: args.seed,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.jsonl {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    let result = pipeline.run(&mut policy, &mut env)?;

    print_summary(&result, policy.table().num_states());

    if let Some(path) = &args.output {
        result.save(path)?;
        println!("Result written to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &TrainingResult, states_seen: usize) {
    println!("Episodes:      {}", result.total_episodes);
    println!("Total steps:   {}", result.total_steps);
    println!("Mean return:   {:.2}", result.mean_return);
    println!("Last 50 mean:  {:.2}", result.mean_return_last(50));
    println!("Best return:   {:.2}", result.best_return);
    println!("States seen:   {states_seen}");
}
