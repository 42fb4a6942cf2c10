use crate::error::Result;
use crate::rl::algorithms::Checkpoint;
use crate::rl::core::{Category, EnvStep, MetricsRecord};
use crate::rl::environment::Render;

/// Destination for training and evaluation records
pub trait MetricsSink {
    /// Emit one record under `category`
    fn log(&mut self, record: &MetricsRecord, category: Category) -> Result<()>;

    /// Called once after the last iteration with the trained agent
    fn finish(&mut self, agent: &dyn Checkpoint) -> Result<()>;

    /// Recorder used for evaluation episodes, if enabled
    fn video(&mut self) -> Option<&mut dyn VideoSink> {
        None
    }
}

/// Frame recorder for evaluation episodes
pub trait VideoSink {
    /// Start a new recording; frames are only kept when `enabled`
    fn init(&mut self, env: &dyn Render, enabled: bool);

    /// Capture the environment's current frame
    fn record(&mut self, env: &dyn Render);

    /// Persist the recording under the environment-step tag
    fn save(&mut self, env_step: EnvStep) -> Result<()>;
}

impl<S: MetricsSink + ?Sized> MetricsSink for &mut S {
    fn log(&mut self, record: &MetricsRecord, category: Category) -> Result<()> {
        (**self).log(record, category)
    }

    fn finish(&mut self, agent: &dyn Checkpoint) -> Result<()> {
        (**self).finish(agent)
    }

    fn video(&mut self) -> Option<&mut dyn VideoSink> {
        (**self).video()
    }
}
