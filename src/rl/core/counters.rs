//! Step Counters
//!
//! The loop tracks time in two units that must never be mixed up:
//! [`Step`] counts agent steps (one per action the agent plans) and
//! [`EnvStep`] counts environment steps, i.e. agent steps scaled by the
//! action repeat. Evaluation cadence and anything reported externally
//! uses [`EnvStep`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent-step counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Step(pub u64);

/// Environment-time counter (`Step` times action repeat)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnvStep(pub u64);

impl Step {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Convert to environment time
    pub fn to_env_step(self, action_repeat: u32) -> EnvStep {
        EnvStep(self.0 * u64::from(action_repeat))
    }

    /// Advance by `stride` agent steps
    pub fn advance(self, stride: u64) -> Step {
        Step(self.0 + stride)
    }
}

impl EnvStep {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whether this point in time falls on a multiple of `freq`
    pub fn is_multiple_of(self, freq: u64) -> bool {
        freq != 0 && self.0 % freq == 0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EnvStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Iterator over the outer-loop steps `0, L, 2L, ...` strictly below
/// `train_steps + L`, so a trailing partial stride still gets an episode.
#[derive(Debug, Clone)]
pub struct StepSchedule {
    next: u64,
    end: u64,
    stride: u64,
}

impl StepSchedule {
    pub fn new(train_steps: u64, episode_length: u64) -> Self {
        Self {
            next: 0,
            end: train_steps + episode_length,
            stride: episode_length,
        }
    }

    /// Number of iterations the schedule will yield
    pub fn iterations(&self) -> u64 {
        if self.stride == 0 {
            return 0;
        }
        (self.end - self.next).div_ceil(self.stride)
    }
}

impl Iterator for StepSchedule {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.stride == 0 || self.next >= self.end {
            return None;
        }
        let step = Step(self.next);
        self.next += self.stride;
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_step_scales_by_action_repeat() {
        for repeat in 1..=8u32 {
            for raw in [0u64, 1, 250, 12_345] {
                assert_eq!(
                    Step(raw).to_env_step(repeat).get(),
                    raw * u64::from(repeat)
                );
            }
        }
    }

    #[test]
    fn test_schedule_includes_trailing_iteration() {
        let steps: Vec<u64> = StepSchedule::new(1000, 300).map(Step::get).collect();
        assert_eq!(steps, vec![0, 300, 600, 900, 1200]);
    }

    #[test]
    fn test_schedule_exact_multiple() {
        let schedule = StepSchedule::new(500, 500);
        assert_eq!(schedule.iterations(), 2);
        let steps: Vec<u64> = schedule.map(Step::get).collect();
        assert_eq!(steps, vec![0, 500]);
    }

    #[test]
    fn test_zero_stride_yields_nothing() {
        assert_eq!(StepSchedule::new(100, 0).count(), 0);
    }

    #[test]
    fn test_eval_cadence_uses_env_steps() {
        let step = Step(500);
        assert!(step.to_env_step(2).is_multiple_of(1000));
        assert!(!Step(250).to_env_step(2).is_multiple_of(1000));
        assert!(!EnvStep(0).is_multiple_of(0));
    }
}
