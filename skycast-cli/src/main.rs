//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use std::{env, io::IsTerminal, process::ExitCode};
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cmd = cli::Cli::parse();
    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render::error_report(&err));
            ExitCode::FAILURE
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins, then `SKYCAST_LOG`,
/// then `warn`. Logs go to stderr so stdout only carries the report.
fn init_tracing() {
    let env_filter = match env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => {
            let level = env::var("SKYCAST_LOG").unwrap_or_else(|_| "warn".to_string());
            EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .init();
}
