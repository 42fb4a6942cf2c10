//! Training Loop
//!
//! Orchestrates rollout, replay storage, agent updates, evaluation and
//! logging. The loop is strictly sequential: each collaborator is owned by
//! the [`Trainer`] and called one operation at a time.

use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use super::evaluator::evaluate;
use super::loss_history::LossHistory;
use super::schedule::UpdateSchedule;
use crate::config::AppConfig;
use crate::error::{Result, TdmpcError};
use crate::rl::algorithms::{Agent, ShootingAgent};
use crate::rl::core::metrics::{
    EPISODE, EPISODE_LOSS, EPISODE_REWARD, ENV_STEP, STEP, TOTAL_TIME, WEIGHTED_LOSS,
};
use crate::rl::core::{
    device_for, seed_all, Category, ComputeDevice, EnvStep, Episode, MetricsRecord, Step,
    StepSchedule,
};
use crate::rl::environment::{make_env, Environment};
use crate::rl::logger::{MetricsSink, RunLogger};
use crate::rl::memory::ReplayBuffer;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Training episodes collected
    pub episodes: u64,
    /// Step of the last iteration
    pub final_step: Step,
    /// Environment step of the last iteration
    pub final_env_step: EnvStep,
    /// Agent updates performed
    pub updates: u64,
    /// Mean return of the most recent evaluation
    pub last_eval_return: Option<f64>,
    /// Episodes ingested by the replay buffer
    pub buffer_episodes: u64,
    /// Per-iteration average losses
    pub loss_history: LossHistory,
    /// Where the loss history was written
    pub loss_path: PathBuf,
}

/// Training orchestrator
pub struct Trainer<E, A, S, D>
where
    E: Environment,
    A: Agent<Obs = E::Obs, Act = E::Act>,
    S: MetricsSink,
    D: ComputeDevice,
{
    config: AppConfig,
    device: D,
    env: E,
    agent: A,
    buffer: ReplayBuffer<E::Obs, E::Act>,
    sink: S,
}

impl<E, A, S, D> Trainer<E, A, S, D>
where
    E: Environment,
    A: Agent<Obs = E::Obs, Act = E::Act>,
    S: MetricsSink,
    D: ComputeDevice,
{
    /// Validate the configuration and wire the collaborators together
    pub fn new(config: AppConfig, device: D, env: E, agent: A, sink: S) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| TdmpcError::Validation(errors.join("; ")))?;
        let buffer = ReplayBuffer::new(config.buffer.capacity);
        Ok(Self {
            config,
            device,
            env,
            agent,
            buffer,
            sink,
        })
    }

    /// Run the whole training schedule
    pub fn run(self) -> Result<TrainingSummary> {
        let Trainer {
            config,
            mut device,
            mut env,
            mut agent,
            mut buffer,
            mut sink,
        } = self;

        seed_all(config.seed, &mut [&mut env, &mut agent, &mut device]);

        if !device.is_available() {
            error!(device = %device.name(), "Compute device unavailable");
            return Err(TdmpcError::DeviceUnavailable {
                device: device.name(),
            });
        }

        let training = &config.training;
        let episode_length = training.episode_length as usize;
        let seed_steps = training.effective_seed_steps();
        let schedule = StepSchedule::new(training.train_steps, training.episode_length);
        info!(
            seed = config.seed,
            device = %device.name(),
            episode_length,
            action_repeat = training.action_repeat,
            seed_steps,
            iterations = schedule.iterations(),
            "Starting training"
        );

        let start = Instant::now();
        let mut updates = UpdateSchedule::new(seed_steps, training.episode_length);
        let mut history = LossHistory::new();
        let mut episode_idx = 0u64;
        let mut total_updates = 0u64;
        let mut last_eval_return = None;
        let mut last_step = Step::default();

        for step in schedule {
            // Collect trajectory
            let episode = collect_episode(&mut env, &mut agent, step, episode_length)?;
            let episode_reward = episode.cumulative_reward();
            buffer.push_episode(episode);

            // Update model
            let mut train_metrics = MetricsRecord::new();
            let mut avg_loss = 0.0;
            let num_updates = updates.updates_for(step);
            if num_updates > 0 {
                let mut total_loss = 0.0;
                for i in 0..num_updates {
                    let metrics = agent.update(&buffer, step.get() + i)?;
                    total_loss += weighted_loss(&metrics)?;
                    train_metrics = metrics;
                }
                avg_loss = total_loss / num_updates as f64;
                train_metrics.insert(EPISODE_LOSS, avg_loss);
                total_updates += num_updates;
                debug!(step = %step, num_updates, avg_loss, "Model updated");
            }

            // Log training episode
            episode_idx += 1;
            let env_step = step.to_env_step(training.action_repeat);
            let mut common = MetricsRecord::new()
                .with(EPISODE, episode_idx as f64)
                .with(STEP, step.get() as f64)
                .with(ENV_STEP, env_step.get() as f64)
                .with(TOTAL_TIME, start.elapsed().as_secs_f64())
                .with(EPISODE_REWARD, episode_reward);
            train_metrics.extend(&common);
            sink.log(&train_metrics, Category::Train)?;

            history.push(avg_loss);

            // Evaluate agent periodically
            if env_step.is_multiple_of(training.eval_freq) {
                let mean_return = evaluate(
                    &mut env,
                    &mut agent,
                    training.eval_episodes,
                    step,
                    env_step,
                    sink.video(),
                )?;
                common.insert(EPISODE_REWARD, mean_return);
                sink.log(&common, Category::Eval)?;
                last_eval_return = Some(mean_return);
            }

            last_step = step;
        }

        sink.finish(&agent)?;
        info!(
            episodes = episode_idx,
            updates = total_updates,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Training completed successfully"
        );

        let loss_path = history.save(&config.work_dir())?;

        Ok(TrainingSummary {
            episodes: episode_idx,
            final_step: last_step,
            final_env_step: last_step.to_env_step(training.action_repeat),
            updates: total_updates,
            last_eval_return,
            buffer_episodes: buffer.episodes(),
            loss_history: history,
            loss_path,
        })
    }
}

/// Roll out one episode with the training policy
///
/// Fails if the episode does not last exactly `episode_length` steps; an
/// environment that keeps going past the limit is cut off one step late
/// rather than looping forever.
fn collect_episode<E, A>(
    env: &mut E,
    agent: &mut A,
    step: Step,
    episode_length: usize,
) -> Result<Episode<E::Obs, E::Act>>
where
    E: Environment,
    A: Agent<Obs = E::Obs, Act = E::Act>,
{
    let obs = env.reset()?;
    let mut episode = Episode::new(obs, episode_length);

    while !episode.is_done() && episode.len() <= episode_length {
        let action = agent.plan(episode.last_obs(), false, step, episode.is_first())?;
        let result = env.step(action.clone())?;
        episode.push(result.observation, action, result.reward, result.done)?;
    }

    if episode.len() != episode_length {
        return Err(TdmpcError::EpisodeLengthMismatch {
            expected: episode_length,
            actual: episode.len(),
        });
    }
    Ok(episode)
}

fn weighted_loss(metrics: &MetricsRecord) -> Result<f64> {
    metrics
        .get(WEIGHTED_LOSS)
        .ok_or_else(|| TdmpcError::MissingMetric(WEIGHTED_LOSS.to_string()))
}

/// Train the reference agent on the configured task
pub fn run(config: &AppConfig) -> Result<TrainingSummary> {
    let env = make_env(config)?;
    let agent = ShootingAgent::from_config(config, env.inner().obs_dim(), env.inner().action_dim());
    let sink = RunLogger::new(config)?;
    let device = device_for(config.device);

    Trainer::new(config.clone(), device, env, agent, sink)?.run()
}
