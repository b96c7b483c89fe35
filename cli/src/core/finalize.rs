//! # nsbrand Artifact Finalizer
//!
//! File: cli/src/core/finalize.rs
//!
//! ## Overview
//!
//! Produces the loader artifact of a transformed tree. The transformer never
//! touches the loader file; this module owns it.
//!
//! ## Build mode
//!
//! - `LoaderStrategy::SelfContained`: renders `autoload.php` for the branded
//!   namespace (see `core::templating::SELF_CONTAINED_LOADER`).
//! - `LoaderStrategy::External`: removes `autoload.php` and renders
//!   `helpers.php`, which only includes the helper files.
//!
//! The generated text is compared against what is on disk at the same
//! location and the record is marked changed when they differ. A preview
//! build runs against the template tree instead of the output directory; the
//! template still holds the unbranded loader, so the comparison gives the
//! same answer a real build would.
//!
//! ## Install mode
//!
//! The existing loader is rewritten in place with `Rewriter::rewrite_loader`.
//! A tree without a loader is not an error.
//!
use crate::common::fs::io;
use crate::core::config::{Layout, LoaderStrategy};
use crate::core::error::Result;
use crate::core::manifest::{display_relative, FileCategory, FileRecord, Manifest};
use crate::core::rewrite::Rewriter;
use crate::core::syntax::Syntax;
use crate::core::templating::{self, LoaderContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File stem of the loader generated by the external strategy.
pub const HELPERS_FILE_STEM: &str = "helpers";

/// Generates or rewrites the loader of one tree.
#[derive(Debug)]
pub struct Finalizer<'a> {
    rewriter: &'a Rewriter,
    syntax: &'a Syntax,
    layout: &'a Layout,
    dry_run: bool,
}

impl<'a> Finalizer<'a> {
    pub fn new(rewriter: &'a Rewriter, syntax: &'a Syntax, layout: &'a Layout, dry_run: bool) -> Self {
        Self {
            rewriter,
            syntax,
            layout,
            dry_run,
        }
    }

    /// Relative path of the file the given strategy generates.
    pub fn generated_path(&self, strategy: LoaderStrategy) -> PathBuf {
        match strategy {
            LoaderStrategy::SelfContained => self.layout.loader_file.clone(),
            LoaderStrategy::External => {
                PathBuf::from(format!("{}.{}", HELPERS_FILE_STEM, self.syntax.extension))
            }
        }
    }

    /// Writes the build-mode loader under `root`.
    pub fn finalize_build(&self, root: &Path, strategy: LoaderStrategy) -> Result<Manifest> {
        info!("Finalizing build with the {} loader strategy", strategy);
        let helpers_dir = display_relative(&self.layout.helpers_dir);
        let ctx = LoaderContext {
            namespace: self.rewriter.target(),
            helpers_dir: &helpers_dir,
            extension: self.syntax.extension,
        };

        let template = match strategy {
            LoaderStrategy::SelfContained => templating::SELF_CONTAINED_LOADER,
            LoaderStrategy::External => {
                let loader = root.join(&self.layout.loader_file);
                if self.dry_run {
                    if loader.is_file() {
                        debug!("Would remove {}", loader.display());
                    }
                } else if io::remove_file_if_exists(&loader)? {
                    info!("Removed {}", loader.display());
                }
                templating::HELPERS_LOADER
            }
        };

        let content = templating::render_loader(template, &ctx)?;
        let mut manifest = Manifest::new();
        manifest.push(self.emit(root, &self.generated_path(strategy), &content)?);
        Ok(manifest)
    }

    /// Rewrites the existing loader under `root` in place.
    pub fn finalize_install(&self, root: &Path) -> Result<Manifest> {
        let mut manifest = Manifest::new();
        let path = root.join(&self.layout.loader_file);
        if !path.is_file() {
            debug!("No loader at {}, nothing to rewrite", path.display());
            return Ok(manifest);
        }
        let Some(original) = io::read_text_file(&path)? else {
            warn!("Skipping loader {}: not valid UTF-8", path.display());
            return Ok(manifest);
        };

        let rewritten = self.rewriter.rewrite_loader(&original);
        if rewritten != original {
            if !self.dry_run {
                io::write_string_to_file(&path, &rewritten)?;
            }
            info!("Loader {} updated", path.display());
            manifest.push(FileRecord::changed(
                self.layout.loader_file.clone(),
                FileCategory::Loader,
            ));
        }
        Ok(manifest)
    }

    fn emit(&self, root: &Path, relative: &Path, content: &str) -> Result<FileRecord> {
        let path = root.join(relative);
        let changed = if path.is_file() {
            io::read_text_file(&path)?.as_deref() != Some(content)
        } else {
            true
        };
        if changed && !self.dry_run {
            io::write_string_to_file(&path, content)?;
            info!("Generated {}", path.display());
        } else if !changed {
            debug!("{} is already up to date", path.display());
        }
        Ok(FileRecord {
            path: relative.to_path_buf(),
            changed,
            category: FileCategory::Loader,
        })
    }
}
