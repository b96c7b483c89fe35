//! # nsbrand Build Command
//!
//! File: cli/src/commands/build.rs
//!
//! ## Overview
//!
//! Implements `nsbrand build`: produce a branded copy of the template tree in
//! the output directory, leaving the template untouched.
//!
//! ## Architecture
//!
//! 1. Resolve the prefix (an explicit `--prefix` is remembered unless previewing).
//! 2. Validate that the template exists and that the output directory does
//!    not overlap it.
//! 3. Clean the output directory and copy the template into it.
//! 4. Rewrite the copy and generate its loader.
//! 5. After a self-contained build, check every rewritten class file against
//!    the generated loader's resolution scheme.
//! 6. Print the summary.
//!
//! With `--dry-run`, steps 3 and 4 run against the template tree with writes
//! disabled, so the summary lists exactly what a real build would produce.
//!
//! ## Examples
//!
//! ```bash
//! nsbrand build --prefix=MyPlugin              # Build to ./core
//! nsbrand build --prefix=MyPlugin --output=lib # Build to ./lib
//! nsbrand build                                # Uses the saved prefix
//! nsbrand build --dry-run                      # Preview only
//! ```
//!
use crate::commands::context::RunContext;
use crate::common::fs::copy;
use crate::common::ui;
use crate::core::config::LoaderStrategy;
use crate::core::error::{BrandError, Result};
use crate::core::finalize::Finalizer;
use crate::core::manifest::Manifest;
use crate::core::prefix::{resolve_prefix, Resolution};
use crate::core::report::{self, Report, RunKind, RunMode};
use crate::core::resolve;
use crate::core::rewrite::Rewriter;
use crate::core::transform::Transformer;
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// # Handle Build Command (`handle_build`)
///
/// Runs a complete build (or preview) for the given context.
///
/// ## Returns
///
/// * `Result<Manifest>` - every file the build changed or would change, in
///   discovery order, followed by the loader record.
///
/// ## Errors
///
/// Validation failures (`MissingPrefix`, `InvalidPrefix`, `MissingTemplate`,
/// `OutputOverlapsTemplate`) are returned before the output directory is
/// touched. I/O failures abort the build part way; the output directory is
/// left as it is.
pub fn handle_build(ctx: &RunContext) -> Result<Manifest> {
    let dry_run = ctx.dry_run();
    let mode = RunMode {
        kind: RunKind::Build,
        preview: dry_run,
    };
    info!("Starting {}", mode);

    let Resolution {
        prefix,
        origin,
        saved,
    } = resolve_prefix(ctx.explicit_prefix()?, &ctx.store(), !dry_run)?;
    info!("Using {:?} prefix '{}'", origin, prefix);
    let template_dir = ctx.template_dir()?;
    let output_dir = ctx.output_dir()?;
    let strategy = ctx.loader_strategy()?;
    validate_paths(&template_dir, &output_dir)?;

    let rewriter = Rewriter::new(&ctx.syntax, &prefix)?;
    let finalizer = Finalizer::new(&rewriter, &ctx.syntax, &ctx.layout, dry_run);
    let output_shown = ctx.display_path(&output_dir);
    let report = Report {
        mode,
        prefix: prefix.to_string(),
        target: rewriter.target().to_string(),
        source: ctx.display_path(&template_dir),
        output: Some(output_shown.clone()),
        loader: strategy,
        loader_file: finalizer
            .generated_path(strategy)
            .to_string_lossy()
            .into_owned(),
    };

    ui::banner(report.title());
    report::print(&report.header());
    if saved {
        ui::comment(&format!(
            "  Saved configuration to {}",
            ctx.display_path(ctx.store().path())
        ));
    }
    ui::info("Building namespaced framework...");
    ui::line("");

    let root = prepare_output(&template_dir, &output_dir, &output_shown, &report.source, dry_run)?;

    ui::comment("  Transforming namespaces...");
    ui::line("");
    let mut manifest = Transformer::new(&rewriter, &ctx.syntax, &ctx.layout, dry_run)
        .transform_tree(&root)
        .context("Namespace transformation failed")?;
    manifest.extend(
        finalizer
            .finalize_build(&root, strategy)
            .context("Loader generation failed")?,
    );
    for record in manifest.iter().filter(|r| r.changed) {
        ui::comment(&format!("     ✓ {}/{}", output_shown, record.display_path()));
    }

    if !dry_run && strategy == LoaderStrategy::SelfContained {
        let missing =
            resolve::unresolvable_files(&rewriter, &ctx.syntax, &root, &manifest);
        if !missing.is_empty() {
            ui::line("");
            ui::warning(
                "  The generated loader cannot resolve these files from their declared namespaces:",
            );
            for path in &missing {
                warn!("Unresolvable by the generated loader: {}", path.display());
                ui::warning(&format!("     - {}/{}", output_shown, path.display()));
            }
        }
    }

    report::print(&report.summary(&manifest));
    Ok(manifest)
}

/// Cleans and fills the output directory. Returns the tree to transform.
fn prepare_output(
    template_dir: &Path,
    output_dir: &Path,
    output_shown: &str,
    source_shown: &str,
    dry_run: bool,
) -> Result<PathBuf> {
    if output_dir.exists() {
        ui::comment(&format!("  Cleaning existing {}/ directory...", output_shown));
        let summary = copy::clean_directory(output_dir, dry_run)?;
        if dry_run && !summary.is_empty() {
            ui::comment(&format!(
                "     Would remove {} file(s) and {} director(ies)",
                summary.files, summary.directories
            ));
        }
    }

    ui::comment(&format!("  Copying {}/ to {}/...", source_shown, output_shown));
    if dry_run {
        return Ok(template_dir.to_path_buf());
    }
    copy::copy_directory_recursive(template_dir, output_dir).with_context(|| {
        format!(
            "Failed to copy template {} into {}",
            template_dir.display(),
            output_dir.display()
        )
    })?;
    Ok(output_dir.to_path_buf())
}

/// Template must exist; output must be neither it, inside it, nor around it.
fn validate_paths(template_dir: &Path, output_dir: &Path) -> Result<()> {
    if !template_dir.is_dir() {
        return Err(BrandError::MissingTemplate(template_dir.to_path_buf()).into());
    }
    let template = normalize(
        &template_dir
            .canonicalize()
            .unwrap_or_else(|_| template_dir.to_path_buf()),
    );
    let output = normalize(&canonicalize_existing_prefix(output_dir));
    if output.starts_with(&template) || template.starts_with(&output) {
        return Err(BrandError::OutputOverlapsTemplate {
            output: output_dir.to_path_buf(),
            template: template_dir.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Canonicalizes the longest existing ancestor of `path` and re-appends the rest.
fn canonicalize_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut rest = Vec::new();
    while !existing.exists() {
        let (Some(name), Some(parent)) = (existing.file_name(), existing.parent()) else {
            return path.to_path_buf();
        };
        let (name, parent) = (name.to_os_string(), parent.to_path_buf());
        rest.push(name);
        existing = parent;
    }
    let mut resolved = existing.canonicalize().unwrap_or(existing);
    for name in rest.into_iter().rev() {
        resolved.push(name);
    }
    resolved
}

/// Lexically removes `.` and resolves `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::options::Options;
    use crate::core::manifest::FileCategory;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let src = dir.path().join("src");
        write(&src, "Application.php", "<?php\n\nnamespace WPLite;\n\nclass Application {}\n");
        write(
            &src,
            "Facades/App.php",
            "<?php\n\nnamespace WPLite\\Facades;\n\nuse WPLite\\Application;\n\nclass App {}\n",
        );
        write(
            &src,
            "Helpers/main.php",
            "<?php\n\nif (!function_exists('appLogger')) {\n    function appLogger() {}\n}\n",
        );
        write(&src, "autoload.php", "<?php\n$prefix = 'WPLite\\\\';\n");
        dir
    }

    fn run(dir: &Path, tokens: &[&str]) -> Result<Manifest> {
        let ctx = RunContext::load(dir.to_path_buf(), Options::parse(tokens))?;
        handle_build(&ctx)
    }

    #[test]
    fn test_build_writes_branded_copy_and_keeps_template() {
        let dir = project();
        let before = fs::read_to_string(dir.path().join("src/Application.php")).unwrap();

        let manifest = run(dir.path(), &["--prefix=Acme"]).unwrap();
        assert_eq!(manifest.changed_count(), 4);

        let core = dir.path().join("core");
        assert!(fs::read_to_string(core.join("Application.php"))
            .unwrap()
            .contains("namespace Acme\\WPLite;"));
        assert!(fs::read_to_string(core.join("autoload.php"))
            .unwrap()
            .contains("$prefix = 'Acme\\\\WPLite\\\\';"));
        assert_eq!(
            fs::read_to_string(dir.path().join("src/Application.php")).unwrap(),
            before
        );
        assert!(fs::read_to_string(dir.path().join("nsbrand.json"))
            .unwrap()
            .contains("\"prefix\": \"Acme\""));
    }

    #[test]
    fn test_build_preview_matches_real_build() {
        let dir = project();
        let preview = run(dir.path(), &["--prefix=Acme", "--dry-run"]).unwrap();
        assert!(!dir.path().join("core").exists());
        assert!(!dir.path().join("nsbrand.json").exists());

        let real = run(dir.path(), &["--prefix=Acme"]).unwrap();
        assert_eq!(preview, real);
    }

    #[test]
    fn test_rebuild_cleans_stale_output() {
        let dir = project();
        write(&dir.path().join("core"), "Stale.php", "<?php\n");
        run(dir.path(), &["--prefix=Acme"]).unwrap();
        assert!(!dir.path().join("core/Stale.php").exists());

        // Saved prefix is reused.
        let manifest = run(dir.path(), &[]).unwrap();
        assert_eq!(manifest.changed_count(), 4);
    }

    #[test]
    fn test_external_loader_strategy() {
        let dir = project();
        let manifest = run(dir.path(), &["--prefix=Acme", "--loader=external"]).unwrap();
        let loaders: Vec<_> = manifest
            .of_category(FileCategory::Loader)
            .map(|r| r.display_path())
            .collect();
        assert_eq!(loaders, vec!["helpers.php"]);
        assert!(!dir.path().join("core/autoload.php").exists());
        assert!(dir.path().join("core/helpers.php").is_file());
    }

    #[test]
    fn test_validation_errors() {
        let dir = project();
        let err = run(dir.path(), &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrandError>(),
            Some(BrandError::MissingPrefix)
        ));

        let err = run(dir.path(), &["--prefix=9x"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrandError>(),
            Some(BrandError::InvalidPrefix(_))
        ));

        for output in ["--output=src", "--output=src/Facades", "--output=.", "--output=./src/../src"] {
            let err = run(dir.path(), &["--prefix=Acme", output]).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<BrandError>(),
                    Some(BrandError::OutputOverlapsTemplate { .. })
                ),
                "{output} should overlap"
            );
        }

        let err = run(dir.path(), &["--prefix=Acme", "--source=missing"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrandError>(),
            Some(BrandError::MissingTemplate(_))
        ));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
