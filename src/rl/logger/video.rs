//! Evaluation Video Recording
//!
//! Buffers rendered frames of an evaluation episode and writes them as a
//! JSON document per evaluation. Encoding into a playable format is left
//! to downstream tooling.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::sink::VideoSink;
use crate::error::Result;
use crate::rl::core::EnvStep;
use crate::rl::environment::{Frame, Render};

/// Playback rate stored alongside the frames
const DEFAULT_FPS: u32 = 15;

#[derive(Serialize)]
struct VideoFile<'a> {
    env_step: u64,
    fps: u32,
    frames: &'a [Frame],
}

/// Writes `<dir>/<env_step>.json`
#[derive(Debug)]
pub struct VideoRecorder {
    dir: PathBuf,
    fps: u32,
    enabled: bool,
    frames: Vec<Frame>,
}

impl VideoRecorder {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            fps: DEFAULT_FPS,
            enabled: false,
            frames: Vec::new(),
        }
    }

    /// Output path for a given tag
    pub fn video_path(&self, env_step: EnvStep) -> PathBuf {
        self.dir.join(format!("{}.json", env_step.get()))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl VideoSink for VideoRecorder {
    fn init(&mut self, env: &dyn Render, enabled: bool) {
        self.frames.clear();
        self.enabled = enabled;
        self.record(env);
    }

    fn record(&mut self, env: &dyn Render) {
        if !self.enabled {
            return;
        }
        if let Some(frame) = env.render() {
            self.frames.push(frame);
        }
    }

    fn save(&mut self, env_step: EnvStep) -> Result<()> {
        if !self.enabled || self.frames.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.video_path(env_step);
        let file = VideoFile {
            env_step: env_step.get(),
            fps: self.fps,
            frames: &self.frames,
        };
        fs::write(&path, serde_json::to_vec(&file)?)?;
        debug!(frames = self.frames.len(), "Saved evaluation video to {:?}", path);
        // Later episodes of the same evaluation are not recorded
        self.enabled = false;
        Ok(())
    }
}
