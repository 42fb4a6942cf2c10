//! Metrics and Artifact Logging
//!
//! Sinks that receive the loop's records, plus the evaluation video
//! recorder.

mod run_logger;
mod sink;
mod video;

pub use run_logger::RunLogger;
pub use sink::{MetricsSink, VideoSink};
pub use video::VideoRecorder;
