//! RL Configuration
//!
//! Configuration structs for the training loop and the reference collaborators.

use serde::{Deserialize, Serialize};

/// Training loop configuration
///
/// `train_steps`, `episode_length` and `seed_steps` are counted in agent
/// steps; `eval_freq` is counted in environment steps (agent steps times
/// `action_repeat`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Total agent steps to train for
    pub train_steps: u64,
    /// Fixed number of agent steps in every episode
    pub episode_length: u64,
    /// Environment steps executed per agent action
    pub action_repeat: u32,
    /// Agent steps collected before the first update; derived when unset
    pub seed_steps: Option<u64>,
    /// Evaluation cadence in environment steps
    pub eval_freq: u64,
    /// Episodes per evaluation
    pub eval_episodes: usize,
    /// Record the first evaluation episode of each evaluation
    pub save_video: bool,
    /// Save the agent when the run finishes
    pub save_model: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            train_steps: 50_000,
            episode_length: 500,
            action_repeat: 2,
            seed_steps: None,
            eval_freq: 10_000,
            eval_episodes: 10,
            save_video: false,
            save_model: true,
        }
    }
}

impl TrainingConfig {
    /// Seed steps, falling back to `max(1000, 5 * episode_length)`
    pub fn effective_seed_steps(&self) -> u64 {
        self.seed_steps
            .unwrap_or_else(|| (5 * self.episode_length).max(1000))
    }

    /// Episode length in environment steps
    pub fn env_episode_length(&self) -> u64 {
        self.episode_length * u64::from(self.action_repeat)
    }
}

/// Replay buffer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Maximum number of stored transitions
    pub capacity: usize,
    /// Transitions sampled per update
    pub batch_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            batch_size: 512,
        }
    }
}

/// Reference agent hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate of the reward model
    pub lr: f64,
    /// Candidate actions scored per plan call
    pub num_samples: usize,
    /// Std of the Gaussian exploration noise in train mode
    pub exploration_std: f32,
    /// Weight of the reward loss in the weighted loss
    pub reward_coef: f64,
    /// How much of the previous plan carries into the next sampling mean
    pub momentum: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            num_samples: 64,
            exploration_std: 0.3,
            reward_coef: 0.5,
            momentum: 0.1,
        }
    }
}

/// Reference environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Dimensionality of position, velocity and action
    pub action_dim: usize,
    /// Force applied by an action of magnitude 1
    pub max_force: f32,
    /// Integration step
    pub dt: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            action_dim: 2,
            max_force: 1.0,
            dt: 0.05,
        }
    }
}
