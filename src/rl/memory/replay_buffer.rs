//! Replay Buffer
//!
//! Experience replay for off-policy model learning. Completed episodes are
//! moved in whole and flattened into transitions; sampling is left to the
//! agent, which brings its own generator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use crate::rl::core::Episode;

/// A single transition in the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<O, A> {
    /// Observation before action
    pub obs: O,
    /// Action taken
    pub action: A,
    /// Reward received
    pub reward: f32,
    /// Observation after action
    pub next_obs: O,
    /// Whether episode terminated
    pub done: bool,
}

/// Replay buffer for experience storage
#[derive(Debug)]
pub struct ReplayBuffer<O, A> {
    /// Storage for transitions
    buffer: VecDeque<Transition<O, A>>,
    /// Maximum capacity
    capacity: usize,
    /// Episodes ingested over the whole run
    episodes: u64,
    /// Transitions ingested over the whole run
    transitions_seen: u64,
}

impl<O: Clone, A: Clone> ReplayBuffer<O, A> {
    /// Create a new replay buffer with given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity: capacity.max(1),
            episodes: 0,
            transitions_seen: 0,
        }
    }

    /// Take ownership of a completed episode
    pub fn push_episode(&mut self, episode: Episode<O, A>) {
        let added = episode.len();
        for (obs, action, reward, next_obs, done) in episode.transitions() {
            self.push(Transition {
                obs: obs.clone(),
                action: action.clone(),
                reward,
                next_obs: next_obs.clone(),
                done,
            });
        }
        self.episodes += 1;
        debug!(
            episode = self.episodes,
            added,
            stored = self.buffer.len(),
            "Episode added to replay buffer"
        );
    }

    fn push(&mut self, transition: Transition<O, A>) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
        self.transitions_seen += 1;
    }

    /// Sample `batch_size` transitions uniformly, with replacement
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&Transition<O, A>> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        (0..batch_size)
            .map(|_| &self.buffer[rng.gen_range(0..self.buffer.len())])
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition<O, A>> {
        self.buffer.iter()
    }

    /// Get current number of transitions
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Episodes ingested so far
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Transitions ingested so far, including evicted ones
    pub fn transitions_seen(&self) -> u64 {
        self.transitions_seen
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f32 {
        self.buffer.len() as f32 / self.capacity as f32
    }
}
