//! Baseline policies for side-by-side comparisons

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Result, ports::Policy, types::StateKey};

/// Uniform random baseline.
///
/// Ignores every state and never learns; useful as the floor any adaptive
/// policy should beat.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    name: String,
    num_actions: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a random policy over `0..num_actions`.
    pub fn new(name: impl Into<String>, num_actions: usize) -> Self {
        Self {
            name: name.into(),
            num_actions,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_action(&mut self, _state: &StateKey) -> Result<usize> {
        Ok(self.rng.random_range(0..self.num_actions))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_stays_in_range() {
        let mut policy = RandomPolicy::new("Random", 3);
        policy.set_rng_seed(42).unwrap();

        for _ in 0..200 {
            let action = policy.select_action(&StateKey::new("anything")).unwrap();
            assert!(action < 3);
        }
    }

    #[test]
    fn test_learn_is_a_no_op() {
        let mut policy = RandomPolicy::new("Random", 3);
        policy
            .learn(&StateKey::new("a"), 0, 1.0, &StateKey::new("b"))
            .unwrap();
    }
}
