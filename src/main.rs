use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use streak_finder::app;
use streak_finder::cli::Cli;
use streak_finder::config::{AppConfig, DEFAULT_LOG_LEVEL};
use streak_finder::error::StreakError;

fn main() -> ExitCode {
    let cfg = AppConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = app::execute(cli, &cfg).and_then(|rendered| app::emit(&rendered));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<StreakError>() {
            Some(usage) if usage.is_usage() => {
                eprintln!("error: {usage}");
                ExitCode::from(2)
            }
            _ => {
                debug!(error = ?err, "streak query failed");
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
