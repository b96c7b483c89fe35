//! # nsbrand Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the project settings that tell nsbrand where the
//! template tree lives, where builds go, and how the template is laid out.
//! It is separate from the persisted prefix state (`core::state`): settings
//! are written by hand and an invalid settings file is an error, while the
//! state file is written by the tool and read permissively.
//!
//! ## Architecture
//!
//! Settings sources (in order of precedence):
//! 1. Command-line options (`--source`, `--output`, `--loader`), applied by the commands
//! 2. Project `nsbrand.toml` in the working directory or its nearest ancestor
//! 3. Default values defined in the code
//!
//! The ancestor search stops at the first directory containing `.git`, so a
//! settings file from an enclosing repository is never picked up. Paths are
//! `~`-expanded after loading and the result is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! state_file = "nsbrand.json"
//!
//! [template]
//! directory = "vendor/acme/wplite/src"
//! entry_helper = "Helpers/main.php"
//! helpers_dir = "Helpers"
//! loader_file = "autoload.php"
//!
//! [build]
//! output = "src/WPLite"
//! loader = "external"
//! ```
//!
use crate::core::error::{BrandError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Name of the project settings file.
pub const PROJECT_CONFIG_FILENAME: &str = "nsbrand.toml";

/// Project settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Persisted state file, relative to the working directory.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default)]
    pub template: TemplateSettings,
    #[serde(default)]
    pub build: BuildSettings,
}

/// Where the template tree lives and how it is laid out.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplateSettings {
    /// Template tree location (can use ~).
    #[serde(default = "default_template_dir")]
    pub directory: String,
    /// Declaration-less helper file, relative to the tree.
    #[serde(default = "default_entry_helper")]
    pub entry_helper: String,
    /// Directory whose files every loader includes, relative to the tree.
    #[serde(default = "default_helpers_dir")]
    pub helpers_dir: String,
    /// Loader artifact, relative to the tree.
    #[serde(default = "default_loader_file")]
    pub loader_file: String,
}

/// Build-mode settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildSettings {
    /// Output directory (can use ~).
    #[serde(default = "default_output_dir")]
    pub output: String,
    /// How the output tree gets loaded.
    #[serde(default)]
    pub loader: LoaderStrategy,
}

/// How a build's output is meant to be loaded.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoaderStrategy {
    /// Generate an autoloader for the branded namespace.
    #[default]
    SelfContained,
    /// Drop the loader; the consuming project autoloads by path.
    External,
}

impl FromStr for LoaderStrategy {
    type Err = BrandError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "self-contained" => Ok(Self::SelfContained),
            "external" => Ok(Self::External),
            other => Err(BrandError::ArgumentParsing(format!(
                "Unknown loader strategy '{}'. Expected 'self-contained' or 'external'.",
                other
            ))),
        }
    }
}

impl fmt::Display for LoaderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfContained => "self-contained",
            Self::External => "external",
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            template: TemplateSettings::default(),
            build: BuildSettings::default(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            directory: default_template_dir(),
            entry_helper: default_entry_helper(),
            helpers_dir: default_helpers_dir(),
            loader_file: default_loader_file(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output_dir(),
            loader: LoaderStrategy::default(),
        }
    }
}

fn default_state_file() -> String {
    crate::core::state::STATE_FILENAME.to_string()
}
fn default_template_dir() -> String {
    "src".to_string()
}
fn default_entry_helper() -> String {
    "Helpers/main.php".to_string()
}
fn default_helpers_dir() -> String {
    "Helpers".to_string()
}
fn default_loader_file() -> String {
    "autoload.php".to_string()
}
fn default_output_dir() -> String {
    "core".to_string()
}

/// Relative layout of special files inside a template (or output) tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub entry_helper: PathBuf,
    pub helpers_dir: PathBuf,
    pub loader_file: PathBuf,
}

impl Layout {
    /// Layout paths are compared against walk-relative paths, so `.`
    /// components are dropped here.
    pub fn from_settings(template: &TemplateSettings) -> Self {
        Self {
            entry_helper: normalize_relative(&template.entry_helper),
            helpers_dir: normalize_relative(&template.helpers_dir),
            loader_file: normalize_relative(&template.loader_file),
        }
    }
}

fn normalize_relative(value: &str) -> PathBuf {
    Path::new(value)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl Default for Layout {
    fn default() -> Self {
        Self::from_settings(&TemplateSettings::default())
    }
}

/// Loads, expands and validates the settings visible from `start_dir`.
pub fn load_settings(start_dir: &Path) -> Result<Settings> {
    let mut settings = match find_project_config_path(start_dir) {
        Some(path) => {
            info!("Loading project settings from: {}", path.display());
            load_settings_from_path(&path)?
        }
        None => {
            debug!(
                "No {} found from {}, using defaults.",
                PROJECT_CONFIG_FILENAME,
                start_dir.display()
            );
            Settings::default()
        }
    };
    expand_settings_paths(&mut settings);
    validate_settings(&settings).context("Settings validation failed")?;
    debug!("Final settings: {:?}", settings);
    Ok(settings)
}

fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping settings search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    toml::from_str(&content).map_err(|e| {
        anyhow!(BrandError::Config(format!(
            "Failed to parse {}: {}",
            path.display(),
            e
        )))
    })
}

fn expand_settings_paths(settings: &mut Settings) {
    settings.template.directory = shellexpand::tilde(&settings.template.directory).into_owned();
    settings.build.output = shellexpand::tilde(&settings.build.output).into_owned();
    settings.state_file = shellexpand::tilde(&settings.state_file).into_owned();
}

fn validate_settings(settings: &Settings) -> Result<()> {
    let required = [
        ("template.directory", &settings.template.directory),
        ("build.output", &settings.build.output),
        ("state_file", &settings.state_file),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(anyhow!(BrandError::Config(format!(
                "'{}' cannot be empty.",
                key
            ))));
        }
    }

    let layout = [
        ("template.entry_helper", &settings.template.entry_helper),
        ("template.helpers_dir", &settings.template.helpers_dir),
        ("template.loader_file", &settings.template.loader_file),
    ];
    for (key, value) in layout {
        if !is_plain_relative(value) {
            return Err(anyhow!(BrandError::Config(format!(
                "'{}' must be a non-empty path relative to the template tree, got '{}'.",
                key, value
            ))));
        }
    }
    Ok(())
}

/// Relative, free of `..`, and naming at least one entry.
fn is_plain_relative(value: &str) -> bool {
    let path = Path::new(value);
    !value.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path
            .components()
            .any(|c| matches!(c, Component::Normal(_)))
}
