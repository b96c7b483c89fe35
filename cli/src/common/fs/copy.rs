//! # nsbrand Tree Replication
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! Build mode regenerates its output directory from scratch on every run:
//! the previous output is removed and the template tree is copied in again
//! before the rewrite engine touches it. This module holds both halves.
//!
//! ## Architecture
//!
//! - `clean_directory` walks the target with `walkdir` in contents-first
//!   order, so every file and subdirectory is removed before the directory
//!   holding it, then removes the root itself. In preview mode it only reports
//!   what it would remove.
//! - `copy_directory_recursive` makes sure the destination exists and then
//!   lets `fs_extra` copy the *contents* of the source into it, creating
//!   directories before the files inside them.
//!
//! Both abort on the first I/O failure. Nothing is rolled back.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// What `clean_directory` did (or would do, in preview mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub files: usize,
    pub directories: usize,
}

impl CleanSummary {
    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.directories == 0
    }
}

/// Removes `dir` and everything below it, children first.
///
/// Returns an empty summary when `dir` does not exist. With `dry_run` set the
/// summary is computed but nothing is deleted.
pub fn clean_directory(dir: &Path, dry_run: bool) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();
    if !dir.exists() {
        debug!("Nothing to clean at {:?}", dir);
        return Ok(summary);
    }

    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            summary.directories += 1;
            if !dry_run {
                fs::remove_dir(path)
                    .with_context(|| format!("Failed to remove directory {:?}", path))?;
            }
        } else {
            summary.files += 1;
            if !dry_run {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to remove file {:?}", path))?;
            }
        }
    }

    if dry_run {
        info!(
            "Would remove {} files and {} directories under {:?}",
            summary.files, summary.directories, dir
        );
    } else {
        info!(
            "Removed {} files and {} directories under {:?}",
            summary.files, summary.directories, dir
        );
    }
    Ok(summary)
}

/// Copies the contents of `source` into `target`, byte for byte.
///
/// # Errors
///
/// Returns an `Err` if `target` cannot be created or any entry fails to copy.
pub fn copy_directory_recursive(source: &Path, target: &Path) -> Result<()> {
    info!("Starting recursive copy from {:?} to {:?}", source, target);
    io::ensure_dir_exists(target)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;

    fs_extra::dir::copy(source, target, &options).map_err(|e| {
        anyhow::anyhow!(e).context(format!("Failed to copy dir {:?} to {:?}", source, target))
    })?;

    info!("Finished recursive copy from {:?} to {:?}", source, target);
    Ok(())
}
