//! Simulated Environments
//!
//! The gym-style [`Environment`] trait the loop drives, the action-repeat
//! wrapper, and a point-mass task used as the reference environment.

mod point_mass;
mod traits;
mod wrappers;

pub use point_mass::{PointMass, PointMassInfo};
pub use traits::{Environment, Frame, Render, StepResult};
pub use wrappers::ActionRepeat;

use crate::config::AppConfig;
use crate::error::{Result, TdmpcError};

/// Task name served by [`make_env`]
pub const POINT_MASS_REACH: &str = "point-mass-reach";

/// Build the environment for the configured task
///
/// The inner time limit is `episode_length * action_repeat` environment
/// steps, so every wrapped episode lasts exactly `episode_length` agent
/// steps.
pub fn make_env(config: &AppConfig) -> Result<ActionRepeat<PointMass>> {
    if config.task != POINT_MASS_REACH {
        return Err(TdmpcError::Validation(format!(
            "unknown task '{}', available: {}",
            config.task, POINT_MASS_REACH
        )));
    }
    let training = &config.training;
    let inner = PointMass::new(config.env.clone(), training.env_episode_length());
    Ok(ActionRepeat::new(inner, training.action_repeat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::core::Seedable;

    #[test]
    fn test_wrapped_episode_has_configured_length() {
        let mut config = AppConfig::default();
        config.training.episode_length = 25;
        config.training.action_repeat = 4;

        let mut env = make_env(&config).unwrap();
        env.reseed(config.seed);
        env.reset().unwrap();

        let mut steps = 0;
        while !env.step(vec![0.1, 0.1]).unwrap().done {
            steps += 1;
        }
        assert_eq!(steps + 1, 25);
        assert_eq!(env.inner().time_limit(), 100);
    }

    #[test]
    fn test_unknown_task_rejected() {
        let config = AppConfig {
            task: "cartpole-swingup".to_string(),
            ..Default::default()
        };
        assert!(matches!(make_env(&config), Err(TdmpcError::Validation(_))));
    }
}
