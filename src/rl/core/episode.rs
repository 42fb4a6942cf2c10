//! Episode Accumulator
//!
//! Captures one fixed-length trajectory. `push` is the only mutator and is
//! refused once the episode has terminated; completed episodes are moved
//! into the replay buffer.

use crate::error::{Result, TdmpcError};

/// One fixed-length rollout from reset to termination
#[derive(Debug, Clone)]
pub struct Episode<O, A> {
    /// Observations, starting with the one returned by reset
    observations: Vec<O>,
    actions: Vec<A>,
    rewards: Vec<f32>,
    dones: Vec<bool>,
    /// Running sum of rewards
    cumulative_reward: f64,
}

impl<O, A> Episode<O, A> {
    /// Start an episode from the initial observation
    pub fn new(initial_obs: O, episode_length: usize) -> Self {
        let mut observations = Vec::with_capacity(episode_length + 1);
        observations.push(initial_obs);
        Self {
            observations,
            actions: Vec::with_capacity(episode_length),
            rewards: Vec::with_capacity(episode_length),
            dones: Vec::with_capacity(episode_length),
            cumulative_reward: 0.0,
        }
    }

    /// Append one transition
    pub fn push(&mut self, obs: O, action: A, reward: f32, done: bool) -> Result<()> {
        if self.is_done() {
            return Err(TdmpcError::EpisodeClosed);
        }
        self.observations.push(obs);
        self.actions.push(action);
        self.rewards.push(reward);
        self.dones.push(done);
        self.cumulative_reward += f64::from(reward);
        Ok(())
    }

    /// Number of transitions appended so far
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// No transition has been appended yet
    pub fn is_first(&self) -> bool {
        self.is_empty()
    }

    /// Whether the most recent transition signalled termination
    pub fn is_done(&self) -> bool {
        self.dones.last().copied().unwrap_or(false)
    }

    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    pub fn first_obs(&self) -> &O {
        &self.observations[0]
    }

    /// Latest observation (the initial one before any push)
    pub fn last_obs(&self) -> &O {
        // Always non-empty: the initial observation is stored on construction
        &self.observations[self.observations.len() - 1]
    }

    /// Iterate `(obs, action, reward, next_obs, done)` tuples
    pub fn transitions(&self) -> impl Iterator<Item = (&O, &A, f32, &O, bool)> + '_ {
        self.actions.iter().enumerate().map(move |(i, action)| {
            (
                &self.observations[i],
                action,
                self.rewards[i],
                &self.observations[i + 1],
                self.dones[i],
            )
        })
    }
}
