//! # nsbrand UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! User-facing terminal output and the interactive confirmation used by the
//! destructive `install` command. Logging goes through `tracing` to stderr;
//! everything in this module is meant for the person running the tool and goes
//! to stdout (errors to stderr).
//!
//! ## Architecture
//!
//! - Styled line printers (`info`, `warning`, `comment`, `error`, `line`,
//!   `banner`) built on the `colored` crate. Colors are dropped automatically
//!   when `NO_COLOR` is set.
//! - The `Confirm` trait abstracts the yes/no prompt so commands can be driven
//!   by a scripted answer in tests. `StdinConfirm` is the real implementation:
//!   only `y`/`yes` (any case) counts as consent; anything else, including an
//!   empty line or end of input, is a refusal.
//!
use crate::core::error::Result;
use anyhow::Context;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Green status line.
pub fn info(message: &str) {
    println!("{}", message.green());
}

/// Yellow status line.
pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// Dimmed detail line.
pub fn comment(message: &str) {
    println!("{}", message.dimmed());
}

/// Plain line.
pub fn line(message: &str) {
    println!("{}", message);
}

/// Red line on stderr.
pub fn error(message: &str) {
    eprintln!("{}", message.red());
}

/// Key/value line with the value highlighted.
pub fn field(label: &str, value: &str) {
    println!("{} {}", format!("{}:", label), value.cyan().bold());
}

/// Boxed title.
pub fn banner(title: &str) {
    let width = 62;
    let rule = "═".repeat(width);
    println!();
    info(&format!("╔{}╗", rule));
    info(&format!("║{:^width$}║", title, width = width));
    info(&format!("╚{}╝", rule));
    println!();
}

/// Horizontal rule used around summaries.
pub fn rule() {
    info(&"═".repeat(63));
}

/// A yes/no question put to the user.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Asks on stdout and reads the answer from stdin.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{} ", format!("{} [y/N]:", question).yellow());
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation from stdin")?;
        Ok(is_affirmative(&answer))
    }
}

/// `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
