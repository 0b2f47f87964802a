//! Tests for the training pipeline framework

use std::sync::{Arc, Mutex};

use qlearn::{
    PolicyConfig,
    envs::GridWorld,
    pipeline::{JsonlObserver, RandomPolicy, TrainingConfig, TrainingPipeline},
    ports::{Observer, Policy},
    types::StateKey,
};

#[derive(Debug, Default)]
struct Counts {
    training_starts: usize,
    steps: usize,
    episode_ends: usize,
    training_ends: usize,
}

/// Observer that records call counts through shared state.
struct CountingObserver {
    counts: Arc<Mutex<Counts>>,
}

impl Observer for CountingObserver {
    fn on_training_start(&mut self, _total_episodes: usize) -> qlearn::Result<()> {
        self.counts.lock().unwrap().training_starts += 1;
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &StateKey,
        _action: usize,
        _reward: f64,
    ) -> qlearn::Result<()> {
        self.counts.lock().unwrap().steps += 1;
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        _episode: usize,
        _steps: usize,
        _total_return: f64,
    ) -> qlearn::Result<()> {
        self.counts.lock().unwrap().episode_ends += 1;
        Ok(())
    }

    fn on_training_end(&mut self) -> qlearn::Result<()> {
        self.counts.lock().unwrap().training_ends += 1;
        Ok(())
    }
}

#[test]
fn test_basic_training_run() {
    let config = TrainingConfig {
        num_episodes: 50,
        max_steps_per_episode: 100,
        seed: Some(42),
    };

    let mut pipeline = TrainingPipeline::new(config);
    let mut policy = RandomPolicy::new("Random", 4);
    let mut env = GridWorld::new(3, 3).unwrap();

    let result = pipeline.run(&mut policy, &mut env).unwrap();

    assert_eq!(result.total_episodes, 50);
    assert_eq!(result.returns.len(), 50);
    assert!(result.total_steps > 0);
    assert!(result.best_return <= 100.0);
}

#[test]
fn test_q_learning_improves_over_training() {
    let config = TrainingConfig {
        num_episodes: 600,
        max_steps_per_episode: 100,
        seed: Some(7),
    };

    let mut pipeline = TrainingPipeline::new(config);
    let mut policy = PolicyConfig::new(4)
        .with_learning_rate(0.5)
        .with_discount_factor(0.9)
        .with_epsilon(0.9)
        .build()
        .unwrap();
    let mut env = GridWorld::new(4, 4).unwrap();

    let result = pipeline.run(&mut policy, &mut env).unwrap();

    let first_50: f64 = result.returns[..50].iter().sum::<f64>() / 50.0;
    let last_50 = result.mean_return_last(50);

    assert!(
        last_50 > first_50,
        "training should improve returns: first 50 mean {first_50:.1}, last 50 mean {last_50:.1}"
    );
    assert!(
        last_50 > 0.0,
        "a trained policy should reach the goal most of the time, got {last_50:.1}"
    );

    // The whole reachable grid fits in the table, nothing more.
    assert!(policy.table().num_states() <= 16);
    assert!(policy.table().num_states() > 1);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = TrainingConfig {
        num_episodes: 40,
        max_steps_per_episode: 100,
        seed: Some(123),
    };

    let mut first_returns = Vec::new();
    for _ in 0..2 {
        let mut pipeline = TrainingPipeline::new(config.clone());
        let mut policy = PolicyConfig::new(4).with_learning_rate(0.5).build().unwrap();
        let mut env = GridWorld::new(3, 3).unwrap();
        let result = pipeline.run(&mut policy, &mut env).unwrap();
        first_returns.push(result.returns);
    }

    assert_eq!(first_returns[0], first_returns[1]);
}

#[test]
fn test_observers_see_every_event() {
    let counts = Arc::new(Mutex::new(Counts::default()));
    let config = TrainingConfig {
        num_episodes: 12,
        max_steps_per_episode: 50,
        seed: Some(5),
    };

    let mut pipeline = TrainingPipeline::new(config).with_observer(Box::new(CountingObserver {
        counts: Arc::clone(&counts),
    }));

    let mut policy = RandomPolicy::new("Random", 4);
    let mut env = GridWorld::new(3, 3).unwrap();
    let result = pipeline.run(&mut policy, &mut env).unwrap();

    let counts = counts.lock().unwrap();
    assert_eq!(counts.training_starts, 1);
    assert_eq!(counts.training_ends, 1);
    assert_eq!(counts.episode_ends, 12);
    assert_eq!(counts.steps, result.total_steps);
}

#[test]
fn test_jsonl_observer_records_every_episode() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    let config = TrainingConfig {
        num_episodes: 10,
        max_steps_per_episode: 50,
        seed: Some(456),
    };

    let mut pipeline =
        TrainingPipeline::new(config).with_observer(Box::new(JsonlObserver::new(&path).unwrap()));

    let mut policy = RandomPolicy::new("Random", 4);
    let mut env = GridWorld::new(3, 3).unwrap();
    pipeline.run(&mut policy, &mut env).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 10);
    for line in contents.lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record.get("episode").is_some());
        assert!(record.get("total_return").is_some());
    }
}

#[test]
fn test_pit_grid_trains_to_avoid_pits() {
    let config = TrainingConfig {
        num_episodes: 600,
        max_steps_per_episode: 100,
        seed: Some(17),
    };

    let mut pipeline = TrainingPipeline::new(config);
    let mut policy = PolicyConfig::new(4)
        .with_learning_rate(0.5)
        .with_discount_factor(0.9)
        .with_epsilon(0.9)
        .build()
        .unwrap();
    let mut env = GridWorld::new(4, 4).unwrap().with_pit(1, 1).with_pit(2, 2);

    let result = pipeline.run(&mut policy, &mut env).unwrap();
    assert!(
        result.mean_return_last(50) > -50.0,
        "late episodes should mostly avoid pits, got {:.1}",
        result.mean_return_last(50)
    );
}

#[test]
fn test_policy_with_wrong_action_count_fails_cleanly() {
    let config = TrainingConfig {
        num_episodes: 50,
        max_steps_per_episode: 50,
        seed: Some(3),
    };

    let mut pipeline = TrainingPipeline::new(config);
    // Five actions against a four-action environment: the out-of-range
    // selection eventually reaches the environment and is rejected.
    let mut policy = RandomPolicy::new("Mismatched", 5);
    let mut env = GridWorld::new(3, 3).unwrap();

    let result = pipeline.run(&mut policy, &mut env);
    assert!(result.is_err());
}

#[test]
fn test_reset_between_runs_starts_fresh() {
    let config = TrainingConfig {
        num_episodes: 30,
        max_steps_per_episode: 50,
        seed: Some(9),
    };

    let mut policy = PolicyConfig::new(4).with_learning_rate(0.5).build().unwrap();
    let mut env = GridWorld::new(3, 3).unwrap();

    TrainingPipeline::new(config.clone())
        .run(&mut policy, &mut env)
        .unwrap();
    assert!(!policy.table().is_empty());

    Policy::reset(&mut policy).unwrap();
    assert!(policy.table().is_empty());

    let result = TrainingPipeline::new(config)
        .run(&mut policy, &mut env)
        .unwrap();
    assert_eq!(result.total_episodes, 30);
}
