//! u-landscape: generate, inspect and evaluate seeded metric problems.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use u_landscape::cli::{run, Cli};
use u_landscape::Result;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a failed run through the subscriber and maps it to a process
/// status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            1
        }
    }
}

fn main() -> ExitCode {
    enable_tracing();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    ExitCode::from(exit_status(run(cli, &mut stdout)))
}
