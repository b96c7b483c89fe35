//! # nsbrand Prefix Resolution
//!
//! File: cli/src/core/prefix.rs
//!
//! ## Overview
//!
//! Determines the prefix a run brands the template with. An explicit
//! `--prefix` wins and, when the caller asks for it, is remembered in the
//! persisted state file; otherwise the remembered value is used. A run
//! without either fails before anything is touched. Install mode resolves
//! without persisting and calls `persist_prefix` once the user has agreed.
//!
//! ## Validation
//!
//! A prefix must be a single namespace segment: `^[A-Za-z_][A-Za-z0-9_]*$`.
//! Path separators, namespace separators, dashes and leading digits are all
//! rejected. The `Prefix` newtype can only be constructed through that check,
//! so everything downstream of `resolve_prefix` works with a known-good value.
//!
use crate::core::error::{BrandError, Result};
use crate::core::state::{ConfigStore, PREFIX_KEY};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// A validated target prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Prefix {
    type Err = BrandError;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        if is_valid_identifier(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(BrandError::InvalidPrefix(raw.to_string()))
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true for `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn is_valid_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Where the resolved prefix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOrigin {
    Explicit,
    Persisted,
}

/// Outcome of `resolve_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub prefix: Prefix,
    pub origin: PrefixOrigin,
    /// True when the prefix was written to the state file during this run.
    pub saved: bool,
}

/// Resolves the effective prefix for a run. An explicit prefix is written to
/// `store` only when `persist` is set.
///
/// # Errors
///
/// - `BrandError::InvalidPrefix` if the explicit (or persisted) value is not a valid identifier.
/// - `BrandError::MissingPrefix` if neither is available.
/// - Any error raised while saving an explicit prefix to the state file.
pub fn resolve_prefix(
    explicit: Option<&str>,
    store: &ConfigStore,
    persist: bool,
) -> Result<Resolution> {
    if let Some(raw) = explicit {
        let prefix: Prefix = raw.parse()?;
        if persist {
            persist_prefix(store, &prefix)?;
        } else {
            debug!("Not persisting prefix '{}' yet", prefix);
        }
        return Ok(Resolution {
            prefix,
            origin: PrefixOrigin::Explicit,
            saved: persist,
        });
    }

    match store.prefix() {
        Some(stored) => {
            debug!("Using persisted prefix '{}'", stored);
            Ok(Resolution {
                prefix: stored.parse()?,
                origin: PrefixOrigin::Persisted,
                saved: false,
            })
        }
        None => Err(BrandError::MissingPrefix.into()),
    }
}

/// Merges `prefix` into the state file.
pub fn persist_prefix(store: &ConfigStore, prefix: &Prefix) -> Result<()> {
    let mut partial = serde_json::Map::new();
    partial.insert(
        PREFIX_KEY.to_string(),
        serde_json::Value::String(prefix.to_string()),
    );
    store.save(partial)?;
    info!("Persisted prefix '{}' to {}", prefix, store.path().display());
    Ok(())
}
