// ABOUTME: Main entry point for hjk — parses the CLI, dispatches to the Instance Manager, exits

use clap::Parser;

use headjack::cli::{dispatch, Cli};

#[tokio::main]
async fn main() {
    setup_logging();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Logs to `<data_dir>/logs/hjk.log` rather than stderr, since stderr is reserved for
/// user-facing error output.
fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let config = headjack::config::Config::from_env_or_defaults();
    let _ = std::fs::create_dir_all(&config.data_dir);
    let log_path = config.data_dir.join("hjk.log");

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hjk=info".into()),
        )
        .try_init();
}
