//! # nsbrand Install Command
//!
//! File: cli/src/commands/install.rs
//!
//! ## Overview
//!
//! Implements `nsbrand install`, the older workflow that brands the template
//! tree in place. It is kept for existing users; `build` is the recommended
//! command because it never touches the template.
//!
//! ## Architecture
//!
//! 1. Resolve the prefix and check the template exists.
//! 2. Unless `--force` or `--dry-run` is given, ask for confirmation. A
//!    refusal ends the run successfully with "Operation cancelled." and
//!    leaves the state file alone; an explicit prefix is only remembered
//!    once the run is allowed to proceed.
//! 3. Rewrite every source file of the template tree.
//! 4. Rewrite the existing loader (its imports and its prefix literal).
//! 5. Print the summary with the list of modified files.
//!
use crate::commands::context::RunContext;
use crate::common::ui::{self, Confirm};
use crate::core::error::{BrandError, Result};
use crate::core::finalize::Finalizer;
use crate::core::manifest::Manifest;
use crate::core::prefix::{persist_prefix, resolve_prefix, PrefixOrigin, Resolution};
use crate::core::report::{self, Report, RunKind, RunMode};
use crate::core::rewrite::Rewriter;
use crate::core::transform::Transformer;
use anyhow::Context;
use tracing::info;

/// # Handle Install Command (`handle_install`)
///
/// Brands the template tree in place.
///
/// ## Arguments
///
/// * `ctx` - The run context.
/// * `confirm` - Asked before anything is modified, unless the run is forced
///   or a preview.
///
/// ## Returns
///
/// * `Result<Option<Manifest>>` - `None` when the user declined, otherwise
///   the files that changed (or would change).
pub fn handle_install(ctx: &RunContext, confirm: &mut dyn Confirm) -> Result<Option<Manifest>> {
    let dry_run = ctx.dry_run();
    let mode = RunMode {
        kind: RunKind::Install,
        preview: dry_run,
    };
    info!("Starting {}", mode);

    let store = ctx.store();
    let Resolution { prefix, origin, .. } =
        resolve_prefix(ctx.explicit_prefix()?, &store, false)?;
    info!("Using {:?} prefix '{}'", origin, prefix);
    let template_dir = ctx.template_dir()?;
    if !template_dir.is_dir() {
        return Err(BrandError::MissingTemplate(template_dir).into());
    }

    let rewriter = Rewriter::new(&ctx.syntax, &prefix)?;
    let source = ctx.display_path(&template_dir);
    let report = Report {
        mode,
        prefix: prefix.to_string(),
        target: rewriter.target().to_string(),
        source: source.clone(),
        output: None,
        loader: ctx.settings.build.loader,
        loader_file: ctx.layout.loader_file.to_string_lossy().into_owned(),
    };

    ui::banner(report.title());
    report::print(&report.header());

    if !dry_run && !ctx.force() {
        ui::warning(&format!(
            "This action will modify all {} files in the {}/ directory.",
            ctx.syntax.extension.to_uppercase(),
            source
        ));
        ui::warning("   Make sure you have committed your changes to version control.");
        ui::line("");
        if !confirm.confirm("Do you want to continue?")? {
            ui::line("Operation cancelled.");
            info!("Install cancelled by user");
            return Ok(None);
        }
        ui::line("");
    }
    if !dry_run && origin == PrefixOrigin::Explicit {
        persist_prefix(&store, &prefix)?;
    }

    ui::info("Starting namespace branding...");
    ui::line("");

    let mut manifest = Transformer::new(&rewriter, &ctx.syntax, &ctx.layout, dry_run)
        .transform_tree(&template_dir)
        .context("Namespace transformation failed")?;
    manifest.extend(
        Finalizer::new(&rewriter, &ctx.syntax, &ctx.layout, dry_run)
            .finalize_install(&template_dir)
            .context("Loader rewrite failed")?,
    );
    for record in manifest.iter() {
        ui::comment(&format!("  ✓ {}/{}", source, record.display_path()));
    }

    report::print(&report.summary(&manifest));
    Ok(Some(manifest))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::options::Options;
    use crate::core::state::STATE_FILENAME;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Scripted answer; records whether it was asked.
    struct Answer {
        yes: bool,
        asked: bool,
    }

    impl Confirm for Answer {
        fn confirm(&mut self, _question: &str) -> Result<bool> {
            self.asked = true;
            Ok(self.yes)
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("Helpers")).unwrap();
        fs::write(src.join("Application.php"), "<?php\n\nnamespace WPLite;\n").unwrap();
        fs::write(
            src.join("Helpers/main.php"),
            "<?php\n\nif (!function_exists('appLogger')) {\n    function appLogger() {}\n}\n",
        )
        .unwrap();
        fs::write(
            src.join("autoload.php"),
            "<?php\n\nspl_autoload_register(function ($class) {\n    $prefix = 'WPLite\\\\';\n});\n",
        )
        .unwrap();
        dir
    }

    fn run(dir: &Path, tokens: &[&str], answer: &mut Answer) -> Result<Option<Manifest>> {
        let ctx = RunContext::load(dir.to_path_buf(), Options::parse(tokens))?;
        handle_install(&ctx, answer)
    }

    #[test]
    fn test_install_declined_changes_nothing() {
        let dir = project();
        let before = fs::read_to_string(dir.path().join("src/Application.php")).unwrap();
        let mut answer = Answer {
            yes: false,
            asked: false,
        };

        let result = run(dir.path(), &["--prefix=Acme"], &mut answer).unwrap();
        assert!(answer.asked);
        assert!(result.is_none());
        assert!(!dir.path().join(STATE_FILENAME).exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("src/Application.php")).unwrap(),
            before
        );
    }

    #[test]
    fn test_install_confirmed_rewrites_template_in_place() {
        let dir = project();
        let mut answer = Answer {
            yes: true,
            asked: false,
        };

        let manifest = run(dir.path(), &["--prefix=Acme"], &mut answer)
            .unwrap()
            .unwrap();
        assert!(dir.path().join(STATE_FILENAME).is_file());
        let paths: Vec<_> = manifest.iter().map(|r| r.display_path()).collect();
        assert_eq!(paths, vec!["Application.php", "Helpers/main.php", "autoload.php"]);

        let src = dir.path().join("src");
        assert!(fs::read_to_string(src.join("Application.php"))
            .unwrap()
            .contains("namespace Acme\\WPLite;"));
        assert!(fs::read_to_string(src.join("Helpers/main.php"))
            .unwrap()
            .contains("function_exists('Acme\\WPLite\\appLogger')"));
        assert!(fs::read_to_string(src.join("autoload.php"))
            .unwrap()
            .contains("$prefix = 'Acme\\\\WPLite\\\\';"));
    }

    #[test]
    fn test_force_and_dry_run_skip_confirmation() {
        let dir = project();
        let mut answer = Answer {
            yes: false,
            asked: false,
        };

        let preview = run(dir.path(), &["--prefix=Acme", "--dry-run"], &mut answer)
            .unwrap()
            .unwrap();
        assert!(!answer.asked);
        assert!(fs::read_to_string(dir.path().join("src/Application.php"))
            .unwrap()
            .contains("namespace WPLite;"));

        let real = run(dir.path(), &["--prefix=Acme", "--force"], &mut answer)
            .unwrap()
            .unwrap();
        assert!(!answer.asked);
        assert_eq!(preview, real);

        // A second install finds nothing left to change.
        let again = run(dir.path(), &["--force"], &mut answer).unwrap().unwrap();
        assert!(again.is_empty());
    }
}
