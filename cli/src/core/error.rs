//! # nsbrand Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout nsbrand. Every fatal
//! condition a run can hit is a variant of `BrandError`; everything else is
//! carried by `anyhow` with context attached at the call site.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `BrandError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The variants fall into three groups:
//! - Validation errors (`MissingPrefix`, `InvalidPrefix`, `MissingTemplate`,
//!   `OutputOverlapsTemplate`, `ArgumentParsing`): raised before any file is touched.
//! - Settings errors (`Config`): the project `nsbrand.toml` is present but invalid.
//!   The persisted prefix state is never an error; it degrades to empty.
//! - Processing errors (`FileSystem`, `Template`, `Pattern`): raised mid-run and
//!   abort the remainder of it. Files already written are left as they are.
//!
//! All of them surface in `main` as a single `Error: ...` line and exit code 1.
//!
//! ## Examples
//!
//! ```rust
//! if !template_dir.is_dir() {
//!     return Err(BrandError::MissingTemplate(template_dir.to_path_buf()).into());
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for nsbrand.
#[derive(Error, Debug)]
pub enum BrandError {
    #[error("No prefix configured. Run with --prefix=<Name> to set one.")]
    MissingPrefix,

    #[error(
        "Invalid prefix: '{0}'. Prefix must be a valid namespace segment (e.g. MyPlugin, My_Plugin)."
    )]
    InvalidPrefix(String),

    #[error("Source directory not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error(
        "Output directory '{}' overlaps the template directory '{}'.",
        output.display(),
        template.display()
    )]
    OutputOverlapsTemplate { output: PathBuf, template: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Invalid rewrite pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
