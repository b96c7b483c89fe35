//! # nsbrand Persisted State
//!
//! File: cli/src/core/state.rs
//!
//! ## Overview
//!
//! The state file (`nsbrand.json` by default) remembers choices between runs,
//! currently only the last explicit prefix. It is a single JSON object and is
//! treated permissively:
//! - A missing, unreadable or malformed file, or one holding anything other
//!   than a JSON object, reads as an empty object. This is never an error.
//! - Writes merge the new keys into whatever is on disk, so keys written by
//!   other tools (or future versions) survive in their original order.
//! - The file is written pretty-printed with a trailing newline.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file name of the persisted state.
pub const STATE_FILENAME: &str = "nsbrand.json";

/// Key holding the last explicit prefix.
pub const PREFIX_KEY: &str = "prefix";

/// Persisted configuration, as an open JSON object.
pub type PersistedConfig = Map<String, Value>;

/// Reads and merges the persisted JSON state at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted object, falling back to an empty one.
    pub fn load(&self) -> PersistedConfig {
        if !self.path.exists() {
            debug!("No state file at {}", self.path.display());
            return Map::new();
        }
        let content = match io::read_file_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Ignoring unreadable state file: {:#}", e);
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                debug!(
                    "Ignoring state file {} holding a non-object value ({})",
                    self.path.display(),
                    json_kind(&other)
                );
                Map::new()
            }
            Err(e) => {
                debug!("Ignoring malformed state file {}: {}", self.path.display(), e);
                Map::new()
            }
        }
    }

    /// Merges `partial` into the persisted object and writes it back.
    pub fn save(&self, partial: PersistedConfig) -> Result<()> {
        let mut merged = self.load();
        for (key, value) in partial {
            merged.insert(key, value);
        }
        let mut serialized = serde_json::to_string_pretty(&Value::Object(merged))?;
        serialized.push('\n');
        io::write_string_to_file(&self.path, &serialized)
    }

    /// The persisted prefix, if it is a string.
    pub fn prefix(&self) -> Option<String> {
        match self.load().remove(PREFIX_KEY) {
            Some(Value::String(prefix)) if !prefix.is_empty() => Some(prefix),
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn partial(key: &str, value: &str) -> PersistedConfig {
        let mut map = Map::new();
        map.insert(key.to_string(), Value::String(value.to_string()));
        map
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(STATE_FILENAME));
        assert!(store.load().is_empty());
        assert_eq!(store.prefix(), None);
    }

    #[test]
    fn test_load_malformed_or_non_object_is_empty() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(STATE_FILENAME));

        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), "[\"prefix\", \"Acme\"]").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), "").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_merges_and_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(STATE_FILENAME));
        fs::write(
            store.path(),
            "{\"zeta\": 1, \"prefix\": \"Old\", \"alpha\": [true]}",
        )
        .unwrap();

        store.save(partial("prefix", "Acme")).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert!(written.ends_with("}\n"));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["prefix"], "Acme");
        assert_eq!(value["zeta"], 1);
        assert_eq!(value["alpha"][0], true);
        // Original key order is kept.
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "prefix", "alpha"]);
    }

    #[test]
    fn test_save_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(STATE_FILENAME));
        store.save(partial("prefix", "Acme")).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "{\n  \"prefix\": \"Acme\"\n}\n"
        );
        assert_eq!(store.prefix().as_deref(), Some("Acme"));
    }

    #[test]
    fn test_non_string_prefix_is_ignored() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(STATE_FILENAME));
        fs::write(store.path(), "{\"prefix\": 42}").unwrap();
        assert_eq!(store.prefix(), None);
    }
}
