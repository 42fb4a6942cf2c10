//! File-backed run logger
//!
//! Layout under the work directory:
//!
//! ```text
//! run.json          run id, start time, resolved configuration
//! train.jsonl       one training record per line
//! eval.jsonl        one evaluation record per line
//! videos/<n>.json   evaluation frames, when enabled
//! models/model.json final agent, when enabled
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::sink::{MetricsSink, VideoSink};
use super::video::VideoRecorder;
use crate::config::AppConfig;
use crate::error::Result;
use crate::rl::algorithms::Checkpoint;
use crate::rl::core::metrics::{EPISODE, EPISODE_LOSS, EPISODE_REWARD, ENV_STEP, TOTAL_TIME};
use crate::rl::core::{Category, MetricsRecord};

#[derive(Serialize)]
struct RunMetadata<'a> {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    config: &'a AppConfig,
}

/// Logs records to JSON-lines files and the console
pub struct RunLogger {
    work_dir: PathBuf,
    run_id: Uuid,
    save_model: bool,
    train: BufWriter<File>,
    eval: BufWriter<File>,
    video: Option<VideoRecorder>,
    train_records: usize,
    eval_records: usize,
}

impl RunLogger {
    /// Create the work directory and the record files
    pub fn new(config: &AppConfig) -> Result<Self> {
        let work_dir = config.work_dir();
        fs::create_dir_all(&work_dir)?;

        let run_id = Uuid::new_v4();
        let metadata = RunMetadata {
            run_id,
            started_at: Utc::now(),
            config,
        };
        fs::write(
            work_dir.join("run.json"),
            serde_json::to_vec_pretty(&metadata)?,
        )?;

        let video = config
            .training
            .save_video
            .then(|| VideoRecorder::new(work_dir.join("videos")));

        info!(%run_id, "Logging run to {:?}", work_dir);

        Ok(Self {
            train: BufWriter::new(File::create(work_dir.join("train.jsonl"))?),
            eval: BufWriter::new(File::create(work_dir.join("eval.jsonl"))?),
            work_dir,
            run_id,
            save_model: config.training.save_model,
            video,
            train_records: 0,
            eval_records: 0,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Where `finish` saves the agent
    pub fn model_path(&self) -> PathBuf {
        self.work_dir.join("models").join("model.json")
    }

    /// Records written so far under `category`
    pub fn logged(&self, category: Category) -> usize {
        match category {
            Category::Train => self.train_records,
            Category::Eval => self.eval_records,
        }
    }

    fn print(record: &MetricsRecord, category: Category) {
        let value = |name: &str| record.get(name).unwrap_or(0.0);
        match record.get(EPISODE_LOSS) {
            Some(loss) => info!(
                "{:<5} E: {:>6} S: {:>9} R: {:>9.1} L: {:>8.4} T: {}",
                category.as_str(),
                value(EPISODE) as u64,
                value(ENV_STEP) as u64,
                value(EPISODE_REWARD),
                loss,
                format_elapsed(value(TOTAL_TIME))
            ),
            None => info!(
                "{:<5} E: {:>6} S: {:>9} R: {:>9.1} T: {}",
                category.as_str(),
                value(EPISODE) as u64,
                value(ENV_STEP) as u64,
                value(EPISODE_REWARD),
                format_elapsed(value(TOTAL_TIME))
            ),
        }
    }
}

/// `H:MM:SS` for a duration in seconds
fn format_elapsed(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

impl MetricsSink for RunLogger {
    fn log(&mut self, record: &MetricsRecord, category: Category) -> Result<()> {
        let writer = match category {
            Category::Train => {
                self.train_records += 1;
                &mut self.train
            }
            Category::Eval => {
                self.eval_records += 1;
                &mut self.eval
            }
        };
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        Self::print(record, category);
        Ok(())
    }

    fn finish(&mut self, agent: &dyn Checkpoint) -> Result<()> {
        self.train.flush()?;
        self.eval.flush()?;
        if self.save_model {
            agent.save(&self.model_path())?;
        }
        info!(
            run_id = %self.run_id,
            train_records = self.train_records,
            eval_records = self.eval_records,
            "Run finished"
        );
        Ok(())
    }

    fn video(&mut self) -> Option<&mut dyn VideoSink> {
        self.video.as_mut().map(|v| v as &mut dyn VideoSink)
    }
}
