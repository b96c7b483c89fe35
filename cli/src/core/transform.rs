//! # nsbrand Tree Transformation
//!
//! File: cli/src/core/transform.rs
//!
//! ## Overview
//!
//! Applies the rewrite rules to every source file under a tree root. The
//! build command points it at the freshly copied output directory; install
//! mode and every preview point it at the template tree itself, with writes
//! disabled for the preview case.
//!
//! ## Architecture
//!
//! The walk is sorted by file name at every level, so the returned manifest
//! has a stable order and a preview lists files in the same order a real run
//! would. For each file with the source extension:
//!
//! 1. the loader artifact is skipped (the finalizer owns it),
//! 2. the entry helper goes through `Rewriter::rewrite_entry_helper`,
//! 3. everything else goes through `Rewriter::rewrite_module`.
//!
//! A file is written back only when its content changed and the run is not a
//! preview, and only changed files are recorded. Files that are not valid
//! UTF-8 are skipped with a warning. Any I/O error aborts the walk; files
//! already rewritten stay rewritten.
//!
use crate::common::fs::io;
use crate::core::config::Layout;
use crate::core::error::Result;
use crate::core::manifest::{display_relative, FileCategory, FileRecord, Manifest};
use crate::core::rewrite::Rewriter;
use crate::core::syntax::Syntax;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Walks a tree and rewrites it with one `Rewriter`.
#[derive(Debug)]
pub struct Transformer<'a> {
    rewriter: &'a Rewriter,
    syntax: &'a Syntax,
    layout: &'a Layout,
    dry_run: bool,
}

impl<'a> Transformer<'a> {
    pub fn new(rewriter: &'a Rewriter, syntax: &'a Syntax, layout: &'a Layout, dry_run: bool) -> Self {
        Self {
            rewriter,
            syntax,
            layout,
            dry_run,
        }
    }

    /// Rewrites every source file under `root` and returns what changed.
    pub fn transform_tree(&self, root: &Path) -> Result<Manifest> {
        info!(
            "Transforming {} (target {}, dry_run: {})",
            root.display(),
            self.rewriter.target(),
            self.dry_run
        );
        let mut manifest = Manifest::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk directory {}", root.display()))?;
            if !entry.file_type().is_file() || !self.syntax.is_source_file(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(root).with_context(|| {
                format!("{} is not under {}", entry.path().display(), root.display())
            })?;

            if relative == self.layout.loader_file {
                debug!("Skipping loader {}", display_relative(relative));
                continue;
            }
            let category = if relative == self.layout.entry_helper {
                FileCategory::EntryHelper
            } else {
                FileCategory::Normal
            };

            if self.transform_file(entry.path(), category)? {
                manifest.push(FileRecord::changed(relative, category));
            }
        }

        info!("{} file(s) changed under {}", manifest.changed_count(), root.display());
        Ok(manifest)
    }

    /// Returns whether the file's content changed.
    fn transform_file(&self, path: &Path, category: FileCategory) -> Result<bool> {
        let Some(original) = io::read_text_file(path)? else {
            warn!("Skipping {}: not valid UTF-8", path.display());
            return Ok(false);
        };

        let rewritten = match category {
            FileCategory::EntryHelper => self.rewriter.rewrite_entry_helper(&original),
            _ => self.rewriter.rewrite_module(&original),
        };

        if rewritten == original {
            debug!("Unchanged: {}", path.display());
            return Ok(false);
        }
        if self.dry_run {
            debug!("Would rewrite {:?} file {}", category, path.display());
        } else {
            io::write_string_to_file(path, &rewritten)?;
            debug!("Rewrote {:?} file {}", category, path.display());
        }
        Ok(true)
    }
}
