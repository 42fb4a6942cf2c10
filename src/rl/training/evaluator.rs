//! Policy evaluation
//!
//! Runs full episodes with exploration disabled. Only the environment and
//! the agent's own planning state are touched; the replay buffer and the
//! loop counters are not reachable from here.

use tracing::{debug, warn};

use crate::error::Result;
use crate::rl::algorithms::Agent;
use crate::rl::core::{EnvStep, Step};
use crate::rl::environment::Environment;
use crate::rl::logger::VideoSink;

/// Mean of the values that are not NaN; NaN when none are left
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Evaluate `agent` for `num_episodes` episodes and return the mean return
///
/// The first episode is recorded when a video sink is given; every
/// episode's recording is flushed under `env_step`.
pub fn evaluate<E, A>(
    env: &mut E,
    agent: &mut A,
    num_episodes: usize,
    step: Step,
    env_step: EnvStep,
    mut video: Option<&mut dyn VideoSink>,
) -> Result<f64>
where
    E: Environment,
    A: Agent<Obs = E::Obs, Act = E::Act>,
{
    let mut episode_rewards = Vec::with_capacity(num_episodes);

    for i in 0..num_episodes {
        let mut obs = env.reset()?;
        if let Some(video) = video.as_deref_mut() {
            video.init(&*env, i == 0);
        }

        let mut done = false;
        let mut episode_reward = 0.0f64;
        let mut t = 0usize;
        while !done {
            let action = agent.plan(&obs, true, step, t == 0)?;
            let result = env.step(action)?;
            obs = result.observation;
            done = result.done;
            episode_reward += f64::from(result.reward);
            if let Some(video) = video.as_deref_mut() {
                video.record(&*env);
            }
            t += 1;
        }

        debug!(episode = i, episode_reward, length = t, "Evaluation episode");
        episode_rewards.push(episode_reward);

        if let Some(video) = video.as_deref_mut() {
            video.save(env_step)?;
        }
    }

    let skipped = episode_rewards.iter().filter(|r| r.is_nan()).count();
    if skipped > 0 {
        warn!(skipped, "Ignoring undefined evaluation returns");
    }
    Ok(nan_mean(&episode_rewards))
}
