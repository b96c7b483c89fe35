//! # nsbrand Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the nsbrand CLI application.
//! It handles:
//! - Capturing the command and its option tokens using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command dispatcher
//! - Turning any error into a single `Error: ...` line and exit code 1
//!
//! ## Architecture
//!
//! Clap only owns the global flags (`-v`, `--version`). The command and its
//! options are captured verbatim and parsed by `commands::options`, whose
//! grammar is looser than Clap's: unknown tokens are ignored and an unknown
//! command prints the usage text instead of failing.
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! nsbrand --help
//!
//! # Build with increased verbosity
//! nsbrand -vv build --prefix=Acme
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command routing, option parsing, build and install
mod common; // Filesystem and terminal helpers
mod core; // Settings, rewrite engine, loader generation, reporting

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "nsbrand",
    about = "Brand a vendored template tree with your own namespace prefix",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The command followed by its options.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::run(&cli.tokens) {
        tracing::debug!("Command execution failed: {:?}", e);
        common::ui::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}
