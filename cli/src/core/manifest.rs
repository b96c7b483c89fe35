//! # nsbrand Manifest
//!
//! File: cli/src/core/manifest.rs
//!
//! The ordered list of files a run changed (or, in preview mode, would
//! change). The transformer returns one; the finalizer appends to it; the
//! reporter reads it. Paths are relative to the tree the run worked on, so a
//! preview over the template tree and a real run over the output directory
//! produce comparable manifests.
//!
use std::path::{Path, PathBuf};

/// How a file was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// Ordinary template file, rewritten by the shape rules.
    Normal,
    /// The declaration-less helper file.
    EntryHelper,
    /// A generated or rewritten loader.
    Loader,
}

/// Outcome for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub changed: bool,
    pub category: FileCategory,
}

impl FileRecord {
    pub fn changed(path: impl Into<PathBuf>, category: FileCategory) -> Self {
        Self {
            path: path.into(),
            changed: true,
            category,
        }
    }

    /// `/`-separated display form of the relative path.
    pub fn display_path(&self) -> String {
        display_relative(&self.path)
    }
}

/// Insertion-ordered records of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<FileRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, other: Manifest) {
        self.records.extend(other.records);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Number of records flagged as changed.
    pub fn changed_count(&self) -> usize {
        self.records.iter().filter(|r| r.changed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one category.
    pub fn of_category(&self, category: FileCategory) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }
}

/// Joins path components with `/` regardless of platform.
pub fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
