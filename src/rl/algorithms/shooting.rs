//! Sampling-based planning agent
//!
//! A deliberately small stand-in for a TD-MPC agent: it learns a linear
//! one-step reward model from replayed transitions and plans by scoring
//! sampled candidate actions with it. Good enough to exercise the training
//! loop end to end on the point-mass task.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use super::agent::{Agent, Checkpoint};
use crate::config::AppConfig;
use crate::error::{Result, TdmpcError};
use crate::rl::config::AgentConfig;
use crate::rl::core::metrics::WEIGHTED_LOSS;
use crate::rl::core::seeding::{derive_seed, stream_rng, streams};
use crate::rl::core::{MetricsRecord, Seedable, Step};
use crate::rl::memory::ReplayBuffer;

/// Spread of the candidate actions around the warm-start mean
const CANDIDATE_STD: f32 = 0.5;

/// Serialized agent state
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedModel {
    obs_dim: usize,
    action_dim: usize,
    updates: u64,
    weights: Vec<f64>,
}

/// Linear one-step reward model
#[derive(Debug, Clone)]
struct RewardModel {
    action_dim: usize,
    weights: Vec<f64>,
}

impl RewardModel {
    fn new(obs_dim: usize, action_dim: usize) -> Self {
        Self {
            action_dim,
            weights: vec![0.0; 1 + obs_dim + 2 * action_dim],
        }
    }

    /// Bias, observation, action, and action times the matching trailing
    /// observation entries (offset to target on the point-mass task)
    fn features(&self, obs: &[f32], action: &[f32]) -> Vec<f64> {
        let mut phi = Vec::with_capacity(self.weights.len());
        phi.push(1.0);
        phi.extend(obs.iter().map(|v| f64::from(*v)));
        phi.extend(action.iter().map(|v| f64::from(*v)));
        let tail = &obs[obs.len().saturating_sub(self.action_dim)..];
        phi.extend(
            action
                .iter()
                .zip(tail.iter().chain(std::iter::repeat(&0.0f32)))
                .map(|(a, o)| f64::from(a * o)),
        );
        phi
    }

    fn predict(&self, obs: &[f32], action: &[f32]) -> f64 {
        dot(&self.features(obs, action), &self.weights)
    }
}

fn dot(x: &[f64], w: &[f64]) -> f64 {
    x.iter().zip(w).map(|(a, b)| a * b).sum()
}

/// Best of `num_samples` candidates around `mean`; the mean itself is
/// always a candidate
fn best_candidate<R: Rng + ?Sized>(
    model: &RewardModel,
    mean: &[f32],
    num_samples: usize,
    obs: &[f32],
    rng: &mut R,
) -> Vec<f32> {
    let mut best = mean.to_vec();
    let mut best_score = model.predict(obs, &best);
    for _ in 1..num_samples {
        let candidate: Vec<f32> = mean
            .iter()
            .map(|m| (m + CANDIDATE_STD * sample_normal(rng)).clamp(-1.0, 1.0))
            .collect();
        let score = model.predict(obs, &candidate);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

/// Standard normal sample (Box-Muller)
fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

/// Random-shooting planner over a learned linear reward model
#[derive(Debug)]
pub struct ShootingAgent {
    config: AgentConfig,
    obs_dim: usize,
    action_dim: usize,
    /// Steps of uniform random acting before planning kicks in
    seed_steps: u64,
    batch_size: usize,
    model: RewardModel,
    /// Warm-start mean for candidate sampling
    mean: Vec<f32>,
    seed: u64,
    rng: StdRng,
    updates: u64,
}

impl ShootingAgent {
    pub fn new(
        config: AgentConfig,
        obs_dim: usize,
        action_dim: usize,
        seed_steps: u64,
        batch_size: usize,
    ) -> Self {
        Self {
            config,
            obs_dim,
            action_dim,
            seed_steps,
            batch_size,
            model: RewardModel::new(obs_dim, action_dim),
            mean: vec![0.0; action_dim],
            seed: 0,
            rng: stream_rng(0, streams::AGENT),
            updates: 0,
        }
    }

    /// Agent for the configured run
    pub fn from_config(config: &AppConfig, obs_dim: usize, action_dim: usize) -> Self {
        Self::new(
            config.agent.clone(),
            obs_dim,
            action_dim,
            config.training.effective_seed_steps(),
            config.buffer.batch_size,
        )
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    fn check_obs(&self, obs: &[f32]) -> Result<()> {
        if obs.len() != self.obs_dim {
            return Err(TdmpcError::Agent(format!(
                "observation has {} dimensions, expected {}",
                obs.len(),
                self.obs_dim
            )));
        }
        Ok(())
    }

    fn warm_start(&mut self, action: &[f32]) {
        let momentum = self.config.momentum;
        for (m, a) in self.mean.iter_mut().zip(action) {
            *m = momentum * *m + (1.0 - momentum) * a;
        }
    }
}

impl Seedable for ShootingAgent {
    fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = stream_rng(seed, streams::AGENT);
    }
}

impl Checkpoint for ShootingAgent {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let model = SavedModel {
            obs_dim: self.obs_dim,
            action_dim: self.action_dim,
            updates: self.updates,
            weights: self.model.weights.clone(),
        };
        fs::write(path, serde_json::to_vec_pretty(&model)?)?;
        info!("Saved agent to {:?}", path);
        Ok(())
    }
}

impl Agent for ShootingAgent {
    type Obs = Vec<f32>;
    type Act = Vec<f32>;

    fn plan(
        &mut self,
        obs: &Vec<f32>,
        eval_mode: bool,
        step: Step,
        is_first_step: bool,
    ) -> Result<Vec<f32>> {
        self.check_obs(obs)?;
        if is_first_step {
            self.mean.iter_mut().for_each(|m| *m = 0.0);
        }

        if eval_mode {
            // Separate generator so evaluation never advances the training stream
            let mut eval_rng = stream_rng(derive_seed(self.seed, step.get()), streams::EVAL);
            let action = best_candidate(
                &self.model,
                &self.mean,
                self.config.num_samples,
                obs,
                &mut eval_rng,
            );
            self.warm_start(&action);
            return Ok(action);
        }

        if step.get() < self.seed_steps {
            return Ok((0..self.action_dim)
                .map(|_| self.rng.gen_range(-1.0..=1.0))
                .collect());
        }

        let planned = best_candidate(
            &self.model,
            &self.mean,
            self.config.num_samples,
            obs,
            &mut self.rng,
        );
        self.warm_start(&planned);
        let std = self.config.exploration_std;
        Ok(planned
            .iter()
            .map(|a| (a + std * sample_normal(&mut self.rng)).clamp(-1.0, 1.0))
            .collect())
    }

    fn update(
        &mut self,
        buffer: &ReplayBuffer<Vec<f32>, Vec<f32>>,
        global_step: u64,
    ) -> Result<MetricsRecord> {
        let batch = buffer.sample(self.batch_size, &mut self.rng);
        if batch.is_empty() {
            return Err(TdmpcError::Agent(format!(
                "update at step {global_step} with an empty replay buffer"
            )));
        }

        let n = batch.len() as f64;
        let mut grad = vec![0.0f64; self.model.weights.len()];
        let mut loss = 0.0f64;
        for transition in &batch {
            let phi = self.model.features(&transition.obs, &transition.action);
            let pred = dot(&phi, &self.model.weights);
            let err = pred - f64::from(transition.reward);
            loss += err * err;
            for (g, x) in grad.iter_mut().zip(&phi) {
                *g += 2.0 * err * x / n;
            }
        }
        loss /= n;

        let grad_norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        for (w, g) in self.model.weights.iter_mut().zip(&grad) {
            *w -= self.config.lr * g;
        }
        self.updates += 1;

        Ok(MetricsRecord::new()
            .with("reward_loss", loss)
            .with(WEIGHTED_LOSS, self.config.reward_coef * loss)
            .with("grad_norm", grad_norm)
            .with("lr", self.config.lr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::core::Episode;

    fn agent(seed_steps: u64) -> ShootingAgent {
        let mut agent = ShootingAgent::new(AgentConfig::default(), 6, 2, seed_steps, 32);
        agent.reseed(9);
        agent
    }

    /// Buffer where reward equals the first action component
    fn linear_buffer(len: usize) -> ReplayBuffer<Vec<f32>, Vec<f32>> {
        let mut rng = stream_rng(4, 0);
        let mut episode = Episode::new(vec![0.0; 6], len);
        for i in 0..len {
            let a: f32 = rng.gen_range(-1.0..=1.0);
            episode
                .push(vec![0.0; 6], vec![a, 0.0], a, i + 1 == len)
                .unwrap();
        }
        let mut buffer = ReplayBuffer::new(1000);
        buffer.push_episode(episode);
        buffer
    }

    #[test]
    fn test_random_actions_before_seed_steps() {
        let mut agent = agent(100);
        let action = agent.plan(&vec![0.0; 6], false, Step(0), true).unwrap();
        assert_eq!(action.len(), 2);
        assert!(action.iter().all(|a| (-1.0..=1.0).contains(a)));
    }

    #[test]
    fn test_eval_plan_is_deterministic() {
        let mut a = agent(0);
        let mut b = agent(0);
        let obs = vec![0.1, -0.2, 0.0, 0.0, 0.3, 0.4];

        let x = a.plan(&obs, true, Step(10), true).unwrap();
        let y = b.plan(&obs, true, Step(10), true).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_eval_does_not_advance_training_rng() {
        let mut a = agent(1000);
        let mut b = agent(1000);
        let obs = vec![0.0; 6];

        a.plan(&obs, true, Step(0), true).unwrap();
        let x = a.plan(&obs, false, Step(0), true).unwrap();
        let y = b.plan(&obs, false, Step(0), true).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_update_reports_weighted_loss_and_learns() {
        let mut agent = agent(0);
        let buffer = linear_buffer(200);

        let first = agent.update(&buffer, 0).unwrap();
        let weighted = first.get(WEIGHTED_LOSS).unwrap();
        let reward_loss = first.get("reward_loss").unwrap();
        assert!((weighted - 0.5 * reward_loss).abs() < 1e-12);

        let mut last = first.clone();
        for step in 1..2000 {
            last = agent.update(&buffer, step).unwrap();
        }
        assert!(last.get("reward_loss").unwrap() < 0.5 * reward_loss);
        assert_eq!(agent.updates(), 2000);
    }

    #[test]
    fn test_update_on_empty_buffer_fails() {
        let mut agent = agent(0);
        let buffer = ReplayBuffer::new(10);
        assert!(matches!(agent.update(&buffer, 0), Err(TdmpcError::Agent(_))));
    }

    #[test]
    fn test_rejects_wrong_observation_size() {
        let mut agent = agent(0);
        assert!(agent.plan(&vec![0.0; 3], true, Step(0), true).is_err());
    }

    #[test]
    fn test_save_writes_weights() {
        let agent = agent(0);
        let dir = std::env::temp_dir().join(format!("tdmpc_agent_{}", uuid::Uuid::new_v4()));
        let path = dir.join("models").join("model.json");
        agent.save(&path).unwrap();

        let saved: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(saved["weights"].as_array().unwrap().len(), 1 + 6 + 4);
        std::fs::remove_dir_all(&dir).ok();
    }
}
