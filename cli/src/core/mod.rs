//! # nsbrand Core Engine
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates everything that is specific to namespace branding:
//! settings and persisted state, prefix resolution, the rewrite rules and the
//! tree walk that applies them, loader generation, and run reporting.
//!
//! ## Architecture
//!
//! Leaves first:
//! - `error`, `syntax`: error taxonomy and the template language vocabulary
//! - `config`, `state`, `prefix`: project settings, persisted JSON state, prefix resolution
//! - `rewrite`, `transform`: shape rules and the per-file walk
//! - `templating`, `finalize`, `resolve`: loader rendering, loader placement, loader model
//! - `manifest`, `report`: what a run changed and how it is presented
//!
//! Command handlers in `crate::commands` wire these together.
//!
pub mod config;
pub mod error;
pub mod finalize;
pub mod manifest;
pub mod prefix;
pub mod report;
pub mod resolve;
pub mod rewrite;
pub mod state;
pub mod syntax;
pub mod templating;
pub mod transform;
