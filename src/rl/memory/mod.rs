//! Replay storage
//!
//! Completed episodes are handed over by move and kept as a bounded FIFO of
//! transitions for the agent to sample from.

mod replay_buffer;

pub use replay_buffer::{ReplayBuffer, Transition};
