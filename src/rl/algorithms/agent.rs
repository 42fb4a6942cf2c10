use std::path::Path;

use crate::error::Result;
use crate::rl::core::{MetricsRecord, Seedable, Step};
use crate::rl::memory::ReplayBuffer;

/// Something whose learned state can be written to disk
pub trait Checkpoint {
    fn save(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Planning agent driven by the training loop
pub trait Agent: Seedable + Checkpoint {
    type Obs: Clone;
    type Act: Clone;

    /// Choose an action for `obs`
    ///
    /// `eval_mode` disables exploration. `is_first_step` is set on the first
    /// transition of every episode.
    fn plan(
        &mut self,
        obs: &Self::Obs,
        eval_mode: bool,
        step: Step,
        is_first_step: bool,
    ) -> Result<Self::Act>;

    /// One model update; the returned metrics must contain `weighted_loss`
    fn update(
        &mut self,
        buffer: &ReplayBuffer<Self::Obs, Self::Act>,
        global_step: u64,
    ) -> Result<MetricsRecord>;
}
