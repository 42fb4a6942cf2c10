//! Point-mass reaching task
//!
//! A damped point mass in `[-1, 1]^d` is pushed by a bounded force toward a
//! randomly placed target. Episodes always last `time_limit` environment
//! steps; there is no early termination.

use rand::rngs::StdRng;
use rand::Rng;

use super::traits::{Environment, Frame, Render, StepResult};
use crate::error::{Result, TdmpcError};
use crate::rl::config::EnvConfig;
use crate::rl::core::seeding::{stream_rng, streams};
use crate::rl::core::Seedable;

/// Velocity damping per step
const DAMPING: f32 = 0.95;
/// Positions are clamped to this box
const ARENA: f32 = 1.5;
/// Distance under which the target counts as reached
const SUCCESS_RADIUS: f32 = 0.05;
const FRAME_SIZE: usize = 32;

/// Per-step diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMassInfo {
    /// Euclidean distance to the target
    pub distance: f32,
    /// Whether the mass is within the success radius
    pub success: bool,
}

/// Point-mass reaching environment
#[derive(Debug)]
pub struct PointMass {
    config: EnvConfig,
    time_limit: u64,
    position: Vec<f32>,
    velocity: Vec<f32>,
    target: Vec<f32>,
    t: u64,
    started: bool,
    rng: StdRng,
}

impl PointMass {
    pub fn new(config: EnvConfig, time_limit: u64) -> Self {
        let dim = config.action_dim;
        Self {
            config,
            time_limit,
            position: vec![0.0; dim],
            velocity: vec![0.0; dim],
            target: vec![0.0; dim],
            t: 0,
            started: false,
            rng: stream_rng(0, streams::ENVIRONMENT),
        }
    }

    /// Observation size: position, velocity, offset to target
    pub fn obs_dim(&self) -> usize {
        3 * self.config.action_dim
    }

    pub fn action_dim(&self) -> usize {
        self.config.action_dim
    }

    pub fn time_limit(&self) -> u64 {
        self.time_limit
    }

    fn distance(&self) -> f32 {
        self.position
            .iter()
            .zip(&self.target)
            .map(|(p, g)| (p - g).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    fn observe(&self) -> Vec<f32> {
        let mut obs = Vec::with_capacity(self.obs_dim());
        obs.extend_from_slice(&self.position);
        obs.extend_from_slice(&self.velocity);
        obs.extend(self.target.iter().zip(&self.position).map(|(g, p)| g - p));
        obs
    }

    fn to_pixel(coord: f32) -> usize {
        let unit = ((coord + ARENA) / (2.0 * ARENA)).clamp(0.0, 1.0);
        (unit * (FRAME_SIZE - 1) as f32).round() as usize
    }
}

impl Seedable for PointMass {
    fn reseed(&mut self, seed: u64) {
        self.rng = stream_rng(seed, streams::ENVIRONMENT);
    }
}

impl Render for PointMass {
    fn render(&self) -> Option<Frame> {
        if !self.started {
            return None;
        }
        let mut frame = Frame::blank(FRAME_SIZE, FRAME_SIZE);
        // Only the first two axes are drawn
        let axis = |v: &[f32], i: usize| v.get(i).copied().unwrap_or(0.0);
        frame.put(
            Self::to_pixel(axis(&self.target, 0)),
            Self::to_pixel(axis(&self.target, 1)),
            128,
        );
        frame.put(
            Self::to_pixel(axis(&self.position, 0)),
            Self::to_pixel(axis(&self.position, 1)),
            255,
        );
        Some(frame)
    }
}

impl Environment for PointMass {
    type Obs = Vec<f32>;
    type Act = Vec<f32>;
    type Info = PointMassInfo;

    fn reset(&mut self) -> Result<Vec<f32>> {
        for i in 0..self.config.action_dim {
            self.position[i] = self.rng.gen_range(-1.0..=1.0);
            self.velocity[i] = 0.0;
            self.target[i] = self.rng.gen_range(-1.0..=1.0);
        }
        self.t = 0;
        self.started = true;
        Ok(self.observe())
    }

    fn step(&mut self, action: Vec<f32>) -> Result<StepResult<Vec<f32>, PointMassInfo>> {
        if !self.started {
            return Err(TdmpcError::Environment(
                "step called before reset".to_string(),
            ));
        }
        if self.t >= self.time_limit {
            return Err(TdmpcError::Environment(
                "step called on a finished episode".to_string(),
            ));
        }
        if action.len() != self.config.action_dim {
            return Err(TdmpcError::Environment(format!(
                "action has {} dimensions, expected {}",
                action.len(),
                self.config.action_dim
            )));
        }

        let dt = self.config.dt;
        for (i, a) in action.iter().enumerate() {
            let force = a.clamp(-1.0, 1.0) * self.config.max_force;
            self.velocity[i] = (self.velocity[i] + force * dt) * DAMPING;
            self.position[i] = (self.position[i] + self.velocity[i] * dt).clamp(-ARENA, ARENA);
        }
        self.t += 1;

        let distance = self.distance();
        Ok(StepResult {
            observation: self.observe(),
            reward: (-distance).exp(),
            done: self.t >= self.time_limit,
            info: PointMassInfo {
                distance,
                success: distance < SUCCESS_RADIUS,
            },
        })
    }
}
