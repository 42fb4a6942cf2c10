use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::error::Result;
use crate::rl::core::DeviceKind;

#[derive(Parser, Debug)]
#[command(name = "tdmpc")]
#[command(version)]
#[command(about = "Training loop for model-based RL agents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train an agent with the configured task and schedule
    Train(TrainArgs),
    /// Print the effective configuration as JSON
    Config(Overrides),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Emit JSON formatted logs
    #[arg(long)]
    pub json_logs: bool,
}

/// Command-line overrides applied on top of file and environment settings
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Seed for every random source
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Task identifier
    #[arg(short, long)]
    pub task: Option<String>,

    /// Experiment name
    #[arg(short, long)]
    pub exp_name: Option<String>,

    /// Compute device (cuda or cpu)
    #[arg(short, long, value_parser = parse_device)]
    pub device: Option<DeviceKind>,

    /// Total agent steps to train for
    #[arg(long)]
    pub train_steps: Option<u64>,

    /// Root directory for run outputs
    #[arg(long)]
    pub logs_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(task) = &self.task {
            config.task = task.clone();
        }
        if let Some(exp_name) = &self.exp_name {
            config.exp_name = exp_name.clone();
        }
        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(train_steps) = self.train_steps {
            config.training.train_steps = train_steps;
        }
        if let Some(logs_dir) = &self.logs_dir {
            config.logs_dir = logs_dir.clone();
        }
    }
}

fn parse_device(value: &str) -> std::result::Result<DeviceKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "cuda" => Ok(DeviceKind::Cuda),
        "cpu" => Ok(DeviceKind::Cpu),
        other => Err(format!("unknown device '{other}', expected cuda or cpu")),
    }
}

impl Cli {
    /// Load the config file named on the command line, falling back to
    /// built-in defaults when the default file is absent
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = if self.config.exists() {
            AppConfig::load_from(&self.config)?
        } else if self.config == PathBuf::from(DEFAULT_CONFIG_PATH) {
            AppConfig::load()?
        } else {
            return Err(crate::error::TdmpcError::Validation(format!(
                "config file not found: {}",
                self.config.display()
            )));
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_overrides() {
        let cli = Cli::try_parse_from([
            "tdmpc",
            "train",
            "--seed",
            "42",
            "--device",
            "cpu",
            "--train-steps",
            "1000",
            "--exp-name",
            "smoke",
        ])
        .unwrap();

        let Some(Commands::Train(args)) = cli.command else {
            panic!("expected train subcommand");
        };
        let mut config = AppConfig::default();
        args.overrides.apply(&mut config);

        assert_eq!(config.seed, 42);
        assert_eq!(config.device, DeviceKind::Cpu);
        assert_eq!(config.training.train_steps, 1000);
        assert_eq!(config.exp_name, "smoke");
        assert_eq!(config.task, AppConfig::default().task);
    }

    #[test]
    fn test_unknown_device_rejected() {
        assert!(Cli::try_parse_from(["tdmpc", "train", "--device", "tpu"]).is_err());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let cli = Cli::try_parse_from(["tdmpc", "--config", "/nonexistent/run.toml", "config"])
            .unwrap();
        assert!(cli.load_config().is_err());
    }
}
