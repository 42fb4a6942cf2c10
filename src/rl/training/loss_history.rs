//! Per-iteration loss history
//!
//! Written once, at the end of a successful run, as
//! `{"TDMPC_Loss": [...], "episodes": [1, 2, ...]}`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

/// File name of the exported history inside the work directory
pub const LOSS_FILE_NAME: &str = "TDMPC_Loss.json";

#[derive(Debug, Serialize, Deserialize)]
struct LossArchive {
    #[serde(rename = "TDMPC_Loss")]
    losses: Vec<f64>,
    episodes: Vec<u64>,
}

/// Average loss of every training iteration, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LossHistory {
    losses: Vec<f64>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, loss: f64) {
        self.losses.push(loss);
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    pub fn len(&self) -> usize {
        self.losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    /// 1-based episode indices matching [`Self::losses`]
    pub fn episodes(&self) -> Vec<u64> {
        (1..=self.losses.len() as u64).collect()
    }

    /// Export path inside `work_dir`
    pub fn path_in(work_dir: &Path) -> PathBuf {
        work_dir.join(LOSS_FILE_NAME)
    }

    /// Write the archive into `work_dir` and return its path
    pub fn save(&self, work_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(work_dir)?;
        let path = Self::path_in(work_dir);
        let archive = LossArchive {
            losses: self.losses.clone(),
            episodes: self.episodes(),
        };
        fs::write(&path, serde_json::to_vec_pretty(&archive)?)?;
        info!(entries = self.losses.len(), "Saved episode losses to {:?}", path);
        Ok(path)
    }

    /// Read an archive written by [`Self::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let archive: LossArchive = serde_json::from_slice(&fs::read(path)?)?;
        Ok(Self {
            losses: archive.losses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_layout() {
        let dir = std::env::temp_dir().join(format!("tdmpc_loss_{}", uuid::Uuid::new_v4()));
        let mut history = LossHistory::new();
        history.push(0.0);
        history.push(1.5);
        history.push(0.75);

        let path = history.save(&dir).unwrap();
        assert!(path.ends_with(LOSS_FILE_NAME));

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["TDMPC_Loss"], serde_json::json!([0.0, 1.5, 0.75]));
        assert_eq!(raw["episodes"], serde_json::json!([1, 2, 3]));

        assert_eq!(LossHistory::load(&path).unwrap(), history);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_history() {
        let history = LossHistory::new();
        assert!(history.is_empty());
        assert!(history.episodes().is_empty());
    }
}
