//! Compare command - tabular Q-learning against the random baseline

use anyhow::Result;
use clap::Args;

use crate::{
    PolicyConfig,
    envs::GridWorld,
    pipeline::{RandomPolicy, TrainingConfig, TrainingPipeline, TrainingResult},
    ports::Policy,
    types::defaults,
};

/// Arguments for the compare command
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Number of episodes per policy
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

    /// Random seed shared by both runs
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Execute the compare command
pub fn execute(args: CompareArgs) -> Result<()> {
    let config = TrainingConfig {
        num_episodes: args.episodes,
        max_steps_per_episode: args.max_steps,
        seed: args.seed,
    };

    let mut learner = PolicyConfig::new(4)
        .with_learning_rate(args.learning_rate)
        .with_discount_factor(args.discount_factor)
        .with_epsilon(args.epsilon)
        .build()?;
    let mut baseline = RandomPolicy::new("Random", 4);

    let learner_result = run_one(&config, &mut learner, args.width, args.height)?;
    let baseline_result = run_one(&config, &mut baseline, args.width, args.height)?;

    println!(
        "{:<12} {:>12} {:>14} {:>12}",
        "policy", "mean return", "last 50 mean", "best return"
    );
    print_row("Q-Learning", &learner_result);
    print_row("Random", &baseline_result);

    Ok(())
}

fn run_one(
    config: &TrainingConfig,
    policy: &mut dyn Policy,
    width: usize,
    height: usize,
) -> Result<TrainingResult> {
    let mut env = GridWorld::new(width, height)?;
    let mut pipeline = TrainingPipeline::new(config.clone());
    Ok(pipeline.run(policy, &mut env)?)
}

fn print_row(name: &str, result: &TrainingResult) {
    println!(
        "{:<12} {:>12.2} {:>14.2} {:>12.2}",
        name,
        result.mean_return,
        result.mean_return_last(50),
        result.best_return
    );
}
