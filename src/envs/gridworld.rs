//! Deterministic gridworld environment
//!
//! A minimal episodic environment standing in for the external game adapter:
//! the agent starts in the top-left cell, the goal sits in the bottom-right,
//! and optional pit cells end the episode with a penalty. Observations are
//! serialized to state keys as `"x_y"`, so equal positions always address
//! the same table row.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::{Environment, Step},
    types::StateKey,
};

/// Move one cell up (decreasing y).
pub const UP: usize = 0;
/// Move one cell down (increasing y).
pub const DOWN: usize = 1;
/// Move one cell left (decreasing x).
pub const LEFT: usize = 2;
/// Move one cell right (increasing x).
pub const RIGHT: usize = 3;

const NUM_ACTIONS: usize = 4;

/// Reward for reaching the goal cell.
pub const GOAL_REWARD: f64 = 100.0;
/// Reward for stepping into a pit cell.
pub const PIT_REWARD: f64 = -100.0;
/// Reward for every other step.
pub const STEP_REWARD: f64 = -1.0;

/// Deterministic episodic gridworld.
///
/// Moves that would leave the grid keep the agent in place (and still cost
/// the step reward). The episode ends on the goal or a pit; stepping a
/// finished episode is an error.
///
/// # Examples
///
/// ```
/// use qlearn::envs::{GridWorld, gridworld};
/// use qlearn::ports::Environment;
///
/// let mut env = GridWorld::new(2, 1)?;
/// let start = env.reset();
/// assert_eq!(start.as_str(), "0_0");
///
/// let step = env.step(gridworld::RIGHT)?;
/// assert!(step.done);
/// assert_eq!(step.reward, gridworld::GOAL_REWARD);
/// # Ok::<(), qlearn::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    width: usize,
    height: usize,
    goal: (usize, usize),
    pits: Vec<(usize, usize)>,
    position: (usize, usize),
    finished: bool,
}

impl GridWorld {
    /// Create a gridworld with the goal in the bottom-right cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid dimensions must be positive, got {width}x{height}"),
            });
        }

        Ok(Self {
            width,
            height,
            goal: (width - 1, height - 1),
            pits: Vec::new(),
            position: (0, 0),
            finished: false,
        })
    }

    /// Add a pit cell. Pits outside the grid or on the start or goal cell
    /// are ignored.
    pub fn with_pit(mut self, x: usize, y: usize) -> Self {
        let cell = (x, y);
        if cell != (0, 0) && cell != self.goal && x < self.width && y < self.height {
            self.pits.push(cell);
        }
        self
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Length of the shortest possible episode.
    pub fn optimal_steps(&self) -> usize {
        self.goal.0 + self.goal.1
    }

    fn encode(&self) -> StateKey {
        StateKey::new(format!("{}_{}", self.position.0, self.position.1))
    }
}

impl Environment for GridWorld {
    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn reset(&mut self) -> StateKey {
        self.position = (0, 0);
        self.finished = false;
        self.encode()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if self.finished {
            return Err(Error::EpisodeFinished);
        }

        let (mut x, mut y) = self.position;
        match action {
            UP => y = y.saturating_sub(1),
            DOWN => y = (y + 1).min(self.height - 1),
            LEFT => x = x.saturating_sub(1),
            RIGHT => x = (x + 1).min(self.width - 1),
            _ => {
                return Err(Error::InvalidAction {
                    action,
                    num_actions: NUM_ACTIONS,
                });
            }
        }
        self.position = (x, y);

        let (reward, done) = if self.position == self.goal {
            (GOAL_REWARD, true)
        } else if self.pits.contains(&self.position) {
            (PIT_REWARD, true)
        } else {
            (STEP_REWARD, false)
        };
        self.finished = done;

        Ok(Step {
            state: self.encode(),
            reward,
            done,
        })
    }
}
