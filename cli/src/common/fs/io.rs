//! # nsbrand Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that attach the offending path to every
//! error, so a failure deep in a tree walk still tells the user which file it
//! was working on.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, rejecting a path that exists as a file.
//! - **`read_file_to_string`**: reads a whole file as UTF-8.
//! - **`read_text_file`**: like `read_file_to_string`, but a file that is not
//!   valid UTF-8 yields `Ok(None)` instead of an error. The rewrite engine uses
//!   it to skip files it cannot treat as text.
//! - **`write_string_to_file`**: creates the parent directory, then overwrites.
//! - **`remove_file_if_exists`**: deletes a file, reporting whether it was there.
//!
use crate::core::error::{BrandError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(BrandError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Reads a file as text, returning `None` when it is not valid UTF-8.
///
/// # Errors
///
/// Returns an `Err` only when the file cannot be read at all.
pub fn read_text_file(path: &Path) -> Result<Option<String>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file {:?}", path))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => Ok(None),
    }
}

/// Writes string content to a file, creating its parent directory first.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Removes a file if it exists. Returns whether anything was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).with_context(|| format!("Failed to remove file {:?}", path))?;
    info!("Removed file: {:?}", path);
    Ok(true)
}
