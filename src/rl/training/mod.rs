//! Training Infrastructure
//!
//! The training loop, its update schedule, policy evaluation and the loss
//! history export.

pub mod evaluator;
pub mod loss_history;
pub mod schedule;
pub mod trainer;

pub use evaluator::{evaluate, nan_mean};
pub use loss_history::{LossHistory, LOSS_FILE_NAME};
pub use schedule::UpdateSchedule;
pub use trainer::{run, Trainer, TrainingSummary};
