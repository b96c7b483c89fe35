//! # nsbrand Run Context
//!
//! File: cli/src/commands/context.rs
//!
//! ## Overview
//!
//! Everything `build` and `install` share before they diverge: the working
//! directory, the project settings, the parsed options, and the derived
//! paths. Command-line options take precedence over `nsbrand.toml`, which
//! takes precedence over the built-in defaults.
//!
//! Relative paths from either source are resolved against the working
//! directory. Paths shown to the user are made relative to it again with
//! `pathdiff`.
//!
use crate::commands::options::Options;
use crate::core::config::{self, Layout, LoaderStrategy, Settings};
use crate::core::error::{BrandError, Result};
use crate::core::state::ConfigStore;
use crate::core::syntax::Syntax;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings and options of one run.
#[derive(Debug)]
pub struct RunContext {
    pub cwd: PathBuf,
    pub settings: Settings,
    pub options: Options,
    pub syntax: Syntax,
    pub layout: Layout,
}

impl RunContext {
    /// Loads the settings visible from `cwd`.
    pub fn load(cwd: PathBuf, options: Options) -> Result<Self> {
        let settings = config::load_settings(&cwd).context("Failed to load nsbrand settings")?;
        let layout = Layout::from_settings(&settings.template);
        debug!("Run context in {}: {:?}", cwd.display(), options);
        Ok(Self {
            cwd,
            settings,
            options,
            syntax: Syntax::php(),
            layout,
        })
    }

    /// `--dry-run` was given.
    pub fn dry_run(&self) -> bool {
        self.options.has("dry-run")
    }

    /// `--force` was given.
    pub fn force(&self) -> bool {
        self.options.has("force")
    }

    /// The explicit `--prefix`, if any.
    pub fn explicit_prefix(&self) -> Result<Option<&str>> {
        self.options.value("prefix")
    }

    /// Template tree: `--source`, else `template.directory`.
    pub fn template_dir(&self) -> Result<PathBuf> {
        let raw = self
            .non_empty_value("source")?
            .unwrap_or(self.settings.template.directory.as_str());
        Ok(self.resolve(raw))
    }

    /// Build output: `--output`, else `build.output`.
    pub fn output_dir(&self) -> Result<PathBuf> {
        let raw = self
            .non_empty_value("output")?
            .unwrap_or(self.settings.build.output.as_str());
        Ok(self.resolve(raw))
    }

    /// Loader strategy: `--loader`, else `build.loader`.
    pub fn loader_strategy(&self) -> Result<LoaderStrategy> {
        match self.options.value("loader")? {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(self.settings.build.loader),
        }
    }

    /// Persisted state store.
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.resolve(&self.settings.state_file))
    }

    /// `path` relative to the working directory, for display.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = pathdiff::diff_paths(path, &self.cwd).unwrap_or_else(|| path.to_path_buf());
        let shown = relative.to_string_lossy().trim_end_matches('/').to_string();
        if shown.is_empty() {
            ".".to_string()
        } else {
            shown
        }
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }

    fn non_empty_value(&self, key: &str) -> Result<Option<&str>> {
        match self.options.value(key)? {
            Some(v) if v.trim().is_empty() => Err(BrandError::ArgumentParsing(format!(
                "--{} cannot be empty",
                key
            ))
            .into()),
            other => Ok(other),
        }
    }
}
