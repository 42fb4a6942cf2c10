//! Core RL abstractions
//!
//! Fundamental types shared by the loop and its collaborators: step
//! counters, the episode accumulator, metrics records, seeding and the
//! compute device.

pub mod counters;
pub mod device;
pub mod episode;
pub mod metrics;
pub mod seeding;

pub use counters::{EnvStep, Step, StepSchedule};
pub use device::{device_for, ComputeDevice, CudaDevice, DeviceKind, HostDevice};
pub use episode::Episode;
pub use metrics::{Category, MetricsRecord};
pub use seeding::{derive_seed, seed_all, stream_rng, Seedable};
