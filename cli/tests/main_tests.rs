//! # nsbrand CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `nsbrand` binary: help, version, unknown
//! commands, and error reporting.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_no_command_shows_help() {
    nsbrand_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:").and(predicate::str::contains("build")));
}

#[test]
fn test_help_spellings() {
    for arg in ["help", "--help", "-h"] {
        nsbrand_cmd()
            .arg(arg)
            .assert()
            .success()
            .stdout(predicate::str::contains("Available Commands:"));
    }
}

#[test]
fn test_version_flag() {
    nsbrand_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// An unknown command is reported but is not a failure.
#[test]
fn test_unknown_command_prints_error_and_help() {
    nsbrand_cmd()
        .arg("frobnicate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown command: frobnicate"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_errors_exit_with_one() {
    let project = TemplateProject::new();
    project
        .cmd()
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: No prefix configured"));
}

#[test]
fn test_invalid_settings_file_is_fatal() {
    let project = TemplateProject::new();
    project.write("nsbrand.toml", "[build]\nunknown = true\n");
    project
        .cmd()
        .args(["build", "--prefix=Acme"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
