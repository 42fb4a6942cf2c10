//! Model-based RL training
//!
//! Everything the training loop needs: counters and records, environments,
//! the agent contract, replay storage, logging sinks and the loop itself.
//!
//! # Usage
//!
//! ```no_run
//! use tdmpc_train::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! let summary = tdmpc_train::rl::training::run(&config)?;
//! println!("{} episodes, loss history at {:?}", summary.episodes, summary.loss_path);
//! # Ok::<(), tdmpc_train::TdmpcError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod environment;
pub mod logger;
pub mod memory;
pub mod training;

// Config exports
pub use config::{AgentConfig, BufferConfig, EnvConfig, TrainingConfig};

// Core exports
pub use core::{
    Category, ComputeDevice, DeviceKind, EnvStep, Episode, MetricsRecord, Seedable, Step,
    StepSchedule,
};

// Collaborator exports
pub use algorithms::{Agent, Checkpoint, ShootingAgent};
pub use environment::{ActionRepeat, Environment, PointMass, StepResult};
pub use logger::{MetricsSink, RunLogger, VideoSink};
pub use memory::ReplayBuffer;

// Loop exports
pub use training::{Trainer, TrainingSummary};
