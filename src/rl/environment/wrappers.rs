//! Environment Wrappers

use super::traits::{Environment, Frame, Render, StepResult};
use crate::error::Result;
use crate::rl::core::Seedable;

/// Repeats every action `repeat` times and sums the rewards
///
/// Stops early if the inner environment terminates. One step of the
/// wrapper is one agent step; the inner steps are environment steps.
#[derive(Debug)]
pub struct ActionRepeat<E> {
    inner: E,
    repeat: u32,
}

impl<E: Environment> ActionRepeat<E> {
    pub fn new(inner: E, repeat: u32) -> Self {
        Self {
            inner,
            repeat: repeat.max(1),
        }
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Environment> Seedable for ActionRepeat<E> {
    fn reseed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }
}

impl<E: Environment> Render for ActionRepeat<E> {
    fn render(&self) -> Option<Frame> {
        self.inner.render()
    }
}

impl<E: Environment> Environment for ActionRepeat<E> {
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn reset(&mut self) -> Result<Self::Obs> {
        self.inner.reset()
    }

    fn step(&mut self, action: Self::Act) -> Result<StepResult<Self::Obs, Self::Info>> {
        let mut total_reward = 0.0f32;
        let mut result = self.inner.step(action.clone())?;
        total_reward += result.reward;

        for _ in 1..self.repeat {
            if result.done {
                break;
            }
            result = self.inner.step(action.clone())?;
            total_reward += result.reward;
        }

        result.reward = total_reward;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts steps, reward 1 per step, terminates after `limit`
    struct Ticker {
        t: u32,
        limit: u32,
    }

    impl Seedable for Ticker {
        fn reseed(&mut self, _seed: u64) {}
    }

    impl Render for Ticker {}

    impl Environment for Ticker {
        type Obs = u32;
        type Act = ();
        type Info = ();

        fn reset(&mut self) -> Result<u32> {
            self.t = 0;
            Ok(0)
        }

        fn step(&mut self, _action: ()) -> Result<StepResult<u32, ()>> {
            self.t += 1;
            Ok(StepResult {
                observation: self.t,
                reward: 1.0,
                done: self.t >= self.limit,
                info: (),
            })
        }
    }

    #[test]
    fn test_repeat_sums_rewards() {
        let mut env = ActionRepeat::new(Ticker { t: 0, limit: 100 }, 4);
        env.reset().unwrap();
        let result = env.step(()).unwrap();
        assert_eq!(result.observation, 4);
        assert_eq!(result.reward, 4.0);
        assert!(!result.done);
    }

    #[test]
    fn test_repeat_stops_at_termination() {
        let mut env = ActionRepeat::new(Ticker { t: 0, limit: 6 }, 4);
        env.reset().unwrap();
        env.step(()).unwrap();
        let result = env.step(()).unwrap();
        assert_eq!(result.observation, 6);
        assert_eq!(result.reward, 2.0);
        assert!(result.done);
    }

    #[test]
    fn test_zero_repeat_behaves_as_one() {
        let env = ActionRepeat::new(Ticker { t: 0, limit: 6 }, 0);
        assert_eq!(env.repeat(), 1);
    }
}
