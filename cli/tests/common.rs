//! # nsbrand CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: a command builder for the
//! compiled `nsbrand` binary and a small template project on disk that looks
//! like the tree the tool is meant to brand.
//!

// Each test file uses a different subset of these helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// # Get nsbrand Command (`nsbrand_cmd`)
///
/// Command for the compiled binary with colors and `RUST_LOG` disabled, so
/// output assertions see plain text.
pub fn nsbrand_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nsbrand").expect("Failed to find nsbrand binary for testing");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

pub const APPLICATION: &str = "<?php\n\nnamespace WPLite;\n\nuse WPLite\\Facades\\App;\n\nclass Application\n{\n    public function routes()\n    {\n        return \\WPLite\\RouteManager::class;\n    }\n}\n";

pub const FACADE: &str = "<?php\n\nnamespace WPLite\\Facades;\n\n/**\n * @method static \\WPLite\\Application make($class)\n * @see \\WPLite\\Application\n */\nclass App extends Facade\n{\n}\n";

pub const ROUTE_MANAGER: &str = "<?php\n\nnamespace WPLite;\n\nclass RouteManager\n{\n    protected $name = 'WPLite';\n}\n";

pub const HELPERS: &str = "<?php\n\nuse WPLite\\Facades\\App;\n\nif (!function_exists('appLogger')) {\n    function appLogger($message)\n    {\n        return App::make('logger');\n    }\n}\n";

pub const LOADER: &str = "<?php\n\nspl_autoload_register(function ($class) {\n    $prefix = 'WPLite\\\\';\n    $base_dir = __DIR__ . '/';\n});\n";

/// # Template Project (`TemplateProject`)
///
/// A temporary working directory holding `src/` with a handful of template
/// files. A `.git` directory at the root keeps settings discovery from
/// wandering into the real filesystem.
pub struct TemplateProject {
    dir: TempDir,
}

impl TemplateProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp project");
        fs::create_dir(dir.path().join(".git")).unwrap();
        let project = Self { dir };
        project.write("src/Application.php", APPLICATION);
        project.write("src/Facades/App.php", FACADE);
        project.write("src/RouteManager.php", ROUTE_MANAGER);
        project.write("src/Helpers/main.php", HELPERS);
        project.write("src/autoload.php", LOADER);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.join(rel)).unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    /// Every file under the project, with its bytes, in walk order.
    pub fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        collect(self.path(), &mut files);
        files.sort();
        files
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = nsbrand_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

fn collect(dir: &Path, files: &mut Vec<(PathBuf, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, files);
        } else {
            let bytes = fs::read(&path).unwrap();
            files.push((path, bytes));
        }
    }
}
