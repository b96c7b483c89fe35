//! # nsbrand Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Routes the raw tokens captured by `main.rs` to a command. The first token
//! names the command; everything after it is handed to the option parser.
//!
//! ## Commands
//!
//! - `build`: branded copy of the template tree in an output directory
//! - `install`: deprecated in-place branding of the template tree
//! - `help`, `--help`, `-h`, or no command at all: usage text
//!
//! An unknown command prints an error line followed by the usage text and is
//! not treated as a failure.
//!

/// `nsbrand build`.
pub mod build;
/// Working directory, settings, and options shared by the commands.
pub mod context;
/// Usage text.
pub mod help;
/// `nsbrand install`.
pub mod install;
/// Token-level option parsing.
pub mod options;

use crate::common::ui::{self, StdinConfirm};
use crate::core::error::Result;
use anyhow::Context;
use context::RunContext;
use options::Options;
use tracing::debug;

/// Dispatches `tokens` (command name first) to its handler.
pub fn run(tokens: &[String]) -> Result<()> {
    let Some((name, rest)) = tokens.split_first() else {
        help::print_help();
        return Ok(());
    };
    debug!("Command '{}' with options {:?}", name, rest);

    match name.as_str() {
        "help" | "--help" | "-h" => help::print_help(),
        "build" => {
            build::handle_build(&load_context(rest)?)?;
        }
        "install" => {
            install::handle_install(&load_context(rest)?, &mut StdinConfirm)?;
        }
        other => {
            ui::error(&format!("Error: Unknown command: {}", other));
            help::print_help();
        }
    }
    Ok(())
}

fn load_context(rest: &[String]) -> Result<RunContext> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    RunContext::load(cwd, Options::parse(rest))
}
