//! # nsbrand Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to namespace branding: filesystem
//! operations and terminal interaction. Command handlers and the core engine
//! import directly from the submodule they need.
//!
//! - **`fs`**: File I/O with context, tree cleaning and copying.
//! - **`ui`**: Styled output and the confirmation prompt.
//!

/// Utilities for filesystem operations (I/O, cleaning, copying).
pub mod fs;
/// Terminal output helpers and the `Confirm` prompt.
pub mod ui;
