//! RL Algorithms
//!
//! The agent contract the training loop depends on and a reference
//! sampling-based planner.

pub mod agent;
pub mod shooting;

pub use agent::{Agent, Checkpoint};
pub use shooting::ShootingAgent;
