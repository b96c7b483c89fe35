//! # nsbrand Loader Templates
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders the loader files the finalizer writes into a build's output
//! directory. The texts are Tera templates compiled into the binary; the only
//! inputs are the branded namespace, the helper subdirectory and the source
//! extension, so the same prefix always yields byte-identical output.
//!
//! ## Templates
//!
//! - `SELF_CONTAINED_LOADER`: registers an autoloader that maps
//!   `<Target>\Sub\Name` to `<root>/Sub/Name.php` and declines everything else,
//!   then includes every helper file.
//! - `HELPERS_LOADER`: only includes the helper files. Class loading is left to
//!   a path-based autoloader the consuming project already configures.
//!
//! Autoescaping is off: the output is PHP, not HTML.
//!
use crate::core::error::{BrandError, Result};
use anyhow::anyhow;
use tera::{Context, Tera};
use tracing::debug;

/// Loader used by the self-contained strategy.
pub const SELF_CONTAINED_LOADER: &str = r#"<?php

/**
 * {{ namespace }} autoloader
 *
 * Resolves {{ namespace }}\* classes from this directory and loads the helper
 * functions.
 *
 * @generated Do not edit. Run `nsbrand build` to regenerate.
 */

spl_autoload_register(function ($class) {
    $prefix = '{{ namespace_literal }}\\';
    $base_dir = __DIR__ . '/';

    $len = strlen($prefix);
    if (strncmp($prefix, $class, $len) !== 0) {
        return;
    }

    $relative_class = substr($class, $len);
    $file = $base_dir . str_replace('\\', '/', $relative_class) . '.{{ extension }}';

    if (file_exists($file)) {
        require $file;
    }
});

foreach (glob(__DIR__ . '/{{ helpers_dir }}/*.{{ extension }}') as $file) {
    require_once $file;
}
"#;

/// Loader used by the external strategy.
pub const HELPERS_LOADER: &str = r#"<?php

/**
 * {{ namespace }} helpers loader
 *
 * Include this file to load helper functions. Classes are resolved by the
 * project's own autoloader.
 *
 * @generated Do not edit. Run `nsbrand build` to regenerate.
 */

foreach (glob(__DIR__ . '/{{ helpers_dir }}/*.{{ extension }}') as $file) {
    require_once $file;
}
"#;

/// Values substituted into the loader templates.
#[derive(Debug, Clone)]
pub struct LoaderContext<'a> {
    /// Branded namespace, e.g. `Acme\WPLite`.
    pub namespace: &'a str,
    /// Helper subdirectory relative to the artifact root, `/`-separated.
    pub helpers_dir: &'a str,
    /// Source file extension without the dot.
    pub extension: &'a str,
}

/// Renders `template` with the loader context.
pub fn render_loader(template: &str, ctx: &LoaderContext<'_>) -> Result<String> {
    let mut context = Context::new();
    context.insert("namespace", ctx.namespace);
    // Single-quoted string literal form.
    context.insert("namespace_literal", &ctx.namespace.replace('\\', "\\\\"));
    context.insert("helpers_dir", ctx.helpers_dir.trim_matches('/'));
    context.insert("extension", ctx.extension);

    let rendered = Tera::one_off(template, &context, false).map_err(|e| {
        anyhow!(BrandError::Template { source: e }).context("Failed to render loader template")
    })?;
    debug!("Rendered loader for {} ({} bytes)", ctx.namespace, rendered.len());
    Ok(rendered)
}
