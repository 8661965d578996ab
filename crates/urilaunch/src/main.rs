//! urilaunch - share command lines as URIs and open them in a terminal
//!
//! Main entry point for the command-line tool.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use terminal_launcher::Launcher;
use tracing::{debug, info};

use crate::cli::Cli;

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("URILAUNCH_DEBUG").is_ok()
}

/// Initialize the logging system. Logs go to stderr; stdout carries output.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "urilaunch=trace,terminal_launcher=trace,command_guard=debug,info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    if is_debug_mode() {
        info!(
            "urilaunch v{} starting up (DEBUG MODE ENABLED)",
            env!("CARGO_PKG_VERSION")
        );
        info!("Set RUST_LOG for custom log levels, e.g. RUST_LOG=terminal_launcher=trace");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = cli.action().and_then(|action| {
        debug!(?action, "Running");
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        cli::run(action, &mut stdin.lock(), &mut stdout.lock(), || {
            Launcher::detect(&settings::load_config())
        })
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if cli::is_security_rejection(&e) => {
            eprintln!("urilaunch: refusing to run potentially malicious command: {e:#}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("urilaunch: {e:#}");
            ExitCode::FAILURE
        }
    }
}
