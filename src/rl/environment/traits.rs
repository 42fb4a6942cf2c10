use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rl::core::Seedable;

/// Outcome of one environment step
#[derive(Debug, Clone)]
pub struct StepResult<O, I> {
    /// Observation after the step
    pub observation: O,
    /// Scalar reward
    pub reward: f32,
    /// Whether the episode terminated
    pub done: bool,
    /// Auxiliary information
    pub info: I,
}

/// Single grayscale frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    /// Row-major intensities
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Set a pixel; out-of-range coordinates are ignored
    pub fn put(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }
}

/// Something that can draw its current state
pub trait Render {
    fn render(&self) -> Option<Frame> {
        None
    }
}

/// Gym-style environment
pub trait Environment: Seedable + Render {
    type Obs: Clone;
    type Act: Clone;
    type Info;

    /// Start a new episode and return its first observation
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Apply an action
    fn step(&mut self, action: Self::Act) -> Result<StepResult<Self::Obs, Self::Info>>;
}
