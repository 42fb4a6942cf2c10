//! Update scheduling
//!
//! Nothing is updated before `seed_steps`. The first iteration at or past
//! `seed_steps` catches up with one update per seed step; every later
//! iteration performs one update per collected agent step.

use crate::rl::core::Step;

/// Tracks whether the catch-up iteration has happened
#[derive(Debug, Clone)]
pub struct UpdateSchedule {
    seed_steps: u64,
    episode_length: u64,
    bootstrapped: bool,
}

impl UpdateSchedule {
    pub fn new(seed_steps: u64, episode_length: u64) -> Self {
        Self {
            seed_steps,
            episode_length,
            bootstrapped: false,
        }
    }

    /// Number of agent updates to run after collecting the episode at `step`
    pub fn updates_for(&mut self, step: Step) -> u64 {
        if step.get() < self.seed_steps {
            0
        } else if !self.bootstrapped {
            self.bootstrapped = true;
            self.seed_steps
        } else {
            self.episode_length
        }
    }
}
