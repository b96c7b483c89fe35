//! # nsbrand Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the commands and the rewrite engine.
//!
//! - **`copy`**: Tree replication for build mode (`clean_directory`,
//!   `copy_directory_recursive`).
//! - **`io`**: Context-rich reads and writes (`read_text_file`,
//!   `write_string_to_file`, ...).
//!
//! Callers import from the submodule, e.g. `crate::common::fs::io::read_text_file`.
//!

/// Tree replication: post-order cleaning and recursive copying.
pub mod copy;
/// Basic file I/O with path context on every error.
pub mod io;
