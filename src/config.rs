use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rl::config::{AgentConfig, BufferConfig, EnvConfig, TrainingConfig};
use crate::rl::core::DeviceKind;

/// Default location of the run configuration
pub const DEFAULT_CONFIG_PATH: &str = "cfgs/default.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seed for every pseudo-random source of the run
    pub seed: u64,
    /// Task identifier (e.g., "point-mass-reach")
    pub task: String,
    /// Observation modality (e.g., "state")
    pub modality: String,
    /// Experiment name
    pub exp_name: String,
    /// Root directory for run outputs
    pub logs_dir: PathBuf,
    /// Compute device the agent runs on
    pub device: DeviceKind,
    pub training: TrainingConfig,
    pub buffer: BufferConfig,
    pub agent: AgentConfig,
    pub env: EnvConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            task: "point-mass-reach".to_string(),
            modality: "state".to_string(),
            exp_name: "default".to_string(),
            logs_dir: PathBuf::from("logs"),
            device: DeviceKind::Cuda,
            training: TrainingConfig::default(),
            buffer: BufferConfig::default(),
            agent: AgentConfig::default(),
            env: EnvConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON formatted logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        Self::from_sources(path.exists().then_some(path))
    }

    /// Load configuration from a specific TOML file
    pub fn load_from<P: AsRef<Path>>(config_file: P) -> Result<Self, ConfigError> {
        Self::from_sources(Some(config_file.as_ref()))
    }

    fn from_sources(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder()?;
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            // Override with environment variables (TDMPC__TRAINING__TRAIN_STEPS, etc.)
            .add_source(
                Environment::with_prefix("TDMPC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        // Start with default values
        Ok(Config::builder().add_source(Config::try_from(&AppConfig::default())?))
    }

    /// Directory holding every artifact of this run:
    /// `<logs_dir>/<task>/<modality>/<exp_name>/<seed>`
    pub fn work_dir(&self) -> PathBuf {
        self.logs_dir
            .join(&self.task)
            .join(&self.modality)
            .join(&self.exp_name)
            .join(self.seed.to_string())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("task", &self.task),
            ("modality", &self.modality),
            ("exp_name", &self.exp_name),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        let training = &self.training;
        if training.episode_length == 0 {
            errors.push("training.episode_length must be at least 1".to_string());
        }
        if training.action_repeat == 0 {
            errors.push("training.action_repeat must be at least 1".to_string());
        }
        if training.eval_freq == 0 {
            errors.push("training.eval_freq must be at least 1".to_string());
        }

        if self.buffer.batch_size == 0 {
            errors.push("buffer.batch_size must be at least 1".to_string());
        }
        if (self.buffer.capacity as u64) < training.episode_length {
            errors.push(format!(
                "buffer.capacity ({}) must hold at least one episode ({})",
                self.buffer.capacity, training.episode_length
            ));
        }

        if self.agent.num_samples == 0 {
            errors.push("agent.num_samples must be at least 1".to_string());
        }
        if self.agent.lr <= 0.0 {
            errors.push("agent.lr must be positive".to_string());
        }
        if self.env.action_dim == 0 {
            errors.push("env.action_dim must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
