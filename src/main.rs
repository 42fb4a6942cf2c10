use clap::Parser;
use std::path::Path;
use tdmpc_train::cli::{Cli, Commands};
use tdmpc_train::error::Result;
use tdmpc_train::rl::training;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "train.log";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Config(overrides)) => {
            let mut config = cli.load_config()?;
            overrides.apply(&mut config);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Some(Commands::Train(args)) => {
            let mut config = cli.load_config()?;
            args.overrides.apply(&mut config);
            if args.json_logs {
                config.logging.json = true;
            }

            let work_dir = config.work_dir();
            let _guard = init_logging(&config.logging.level, config.logging.json, &work_dir);
            info!(work_dir = %work_dir.display(), task = %config.task, "Loaded configuration");

            match training::run(&config) {
                Ok(summary) => {
                    info!(
                        episodes = summary.episodes,
                        env_steps = summary.final_env_step.get(),
                        updates = summary.updates,
                        "Run finished"
                    );
                    if let Some(eval_return) = summary.last_eval_return {
                        println!("Final evaluation return: {eval_return:.3}");
                    }
                    println!("Loss history: {}", summary.loss_path.display());
                }
                Err(e) => {
                    if e.is_invariant_breach() {
                        error!("Training aborted, loop invariant violated: {e}");
                    } else {
                        error!("Training failed: {e}");
                    }
                    return Err(e);
                }
            }
        }
        None => {
            println!("No command given. Run `tdmpc train` or `tdmpc --help`.");
        }
    }

    Ok(())
}

/// Console plus `train.log` in the run directory
///
/// File logging is skipped with a warning when the directory is not
/// writable; the returned guard must outlive the run so buffered lines are
/// flushed.
fn init_logging(level: &str, json: bool, work_dir: &Path) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tdmpc_train={level}")));

    // `rolling::never` panics if it cannot create the file, so preflight it
    let (file_layer, guard) = match preflight_log_file(work_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::never(work_dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No color codes in file
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not write to run directory {} ({}), file logging disabled",
                work_dir.display(),
                e
            );
            (None, None)
        }
    };

    // Console layer
    let console_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn preflight_log_file(work_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(work_dir)?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(work_dir.join(LOG_FILE_NAME))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_creates_log_file() {
        let dir = std::env::temp_dir().join(format!("tdmpc_log_{}", uuid::Uuid::new_v4()));
        preflight_log_file(&dir).unwrap();
        assert!(dir.join(LOG_FILE_NAME).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_preflight_fails_when_dir_is_a_file() {
        let file = std::env::temp_dir().join(format!("tdmpc_log_{}", uuid::Uuid::new_v4()));
        std::fs::write(&file, b"").unwrap();
        assert!(preflight_log_file(&file).is_err());
        std::fs::remove_file(&file).ok();
    }
}
