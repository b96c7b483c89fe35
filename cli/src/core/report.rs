//! # nsbrand Run Reports
//!
//! File: cli/src/core/report.rs
//!
//! ## Overview
//!
//! Builds what a run tells the user: a header before any work starts and a
//! summary at the end. Both are plain lists of `Line`s, so the text can be
//! checked in tests and printed through `common::ui` in one place.
//!
//! The summary is driven by the run's `Manifest`. A preview and a real run
//! over the same input produce the same manifest and therefore the same
//! counts and file lists; only the wording ("would be") differs.
//!
use crate::common::ui;
use crate::core::config::LoaderStrategy;
use crate::core::manifest::{FileCategory, Manifest};
use std::fmt;

/// Which command is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Build,
    Install,
}

/// Command plus whether writes are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    pub kind: RunKind,
    pub preview: bool,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            RunKind::Build => "build",
            RunKind::Install => "install",
        };
        if self.preview {
            write!(f, "{} (preview)", kind)
        } else {
            f.write_str(kind)
        }
    }
}

/// One line of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Info(String),
    Warning(String),
    Comment(String),
    Plain(String),
    Field(&'static str, String),
    Rule,
    Blank,
}

impl Line {
    /// Unstyled text of the line.
    pub fn text(&self) -> String {
        match self {
            Line::Info(s) | Line::Warning(s) | Line::Comment(s) | Line::Plain(s) => s.clone(),
            Line::Field(label, value) => format!("{}: {}", label, value),
            Line::Rule | Line::Blank => String::new(),
        }
    }
}

/// Prints lines through the styled printers.
pub fn print(lines: &[Line]) {
    for line in lines {
        match line {
            Line::Info(s) => ui::info(s),
            Line::Warning(s) => ui::warning(s),
            Line::Comment(s) => ui::comment(s),
            Line::Field(label, value) => ui::field(label, value),
            Line::Rule => ui::rule(),
            Line::Plain(_) | Line::Blank => ui::line(&line.text()),
        }
    }
}

/// Everything a header or summary needs to know about a run.
#[derive(Debug, Clone)]
pub struct Report {
    pub mode: RunMode,
    pub prefix: String,
    /// Effective target namespace.
    pub target: String,
    /// Template tree, as shown to the user.
    pub source: String,
    /// Output directory (build only), as shown to the user.
    pub output: Option<String>,
    pub loader: LoaderStrategy,
    /// Relative path of the generated loader (build only).
    pub loader_file: String,
}

impl Report {
    pub fn title(&self) -> &'static str {
        match self.mode.kind {
            RunKind::Build => "WPLite Framework Build Tool",
            RunKind::Install => "WPLite Framework Branding Tool",
        }
    }

    /// Lines printed before any work starts.
    pub fn header(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        if self.mode.preview {
            let what = match self.mode.kind {
                RunKind::Build => "created or modified",
                RunKind::Install => "modified",
            };
            lines.push(Line::Warning(format!(
                "DRY RUN MODE - No files will be {}",
                what
            )));
            lines.push(Line::Blank);
        }
        lines.push(Line::Field("Prefix", self.prefix.clone()));
        match self.mode.kind {
            RunKind::Build => {
                lines.push(Line::Field(
                    "Source",
                    format!("{}/ (read-only template)", self.source),
                ));
                if let Some(output) = &self.output {
                    lines.push(Line::Field("Output", format!("{}/ (generated)", output)));
                }
                lines.push(Line::Field("Namespace", self.target.clone()));
            }
            RunKind::Install => {
                lines.push(Line::Field("New namespace", self.target.clone()));
            }
        }
        lines.push(Line::Blank);
        lines
    }

    /// Lines printed after the run.
    pub fn summary(&self, manifest: &Manifest) -> Vec<Line> {
        let count = manifest.changed_count();
        let mut lines = vec![Line::Blank, Line::Rule];

        match (self.mode.kind, self.mode.preview) {
            (RunKind::Build, true) => {
                lines.push(Line::Warning("DRY RUN COMPLETE - No files were created".into()));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!("Files that would be generated: {}", count)));
            }
            (RunKind::Build, false) => {
                lines.push(Line::Info("Build complete!".into()));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!("Files generated: {}", count)));
                if let Some(output) = &self.output {
                    lines.push(Line::Plain(format!("Output directory: {}/", output)));
                }
            }
            (RunKind::Install, true) => {
                lines.push(Line::Warning("DRY RUN COMPLETE - No files were modified".into()));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!("Files that would be modified: {}", count)));
            }
            (RunKind::Install, false) => {
                lines.push(Line::Info("Branding complete!".into()));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!("Files modified: {}", count)));
            }
        }

        if self.mode.kind == RunKind::Install && !manifest.is_empty() {
            lines.push(Line::Blank);
            lines.push(Line::Comment("Modified files:".into()));
            for record in manifest.iter().filter(|r| r.changed) {
                let suffix = match record.category {
                    FileCategory::EntryHelper => " (helpers - namespaced)",
                    FileCategory::Loader => " (autoloader updated)",
                    FileCategory::Normal => "",
                };
                lines.push(Line::Comment(format!(
                    "  - {}/{}{}",
                    self.source,
                    record.display_path(),
                    suffix
                )));
            }
        }

        lines.push(Line::Blank);
        lines.push(Line::Rule);

        if !self.mode.preview {
            match self.mode.kind {
                RunKind::Build => lines.extend(self.setup_hints()),
                RunKind::Install => lines.extend(self.next_steps()),
            }
        }
        lines
    }

    fn setup_hints(&self) -> Vec<Line> {
        let output = self.output.as_deref().unwrap_or(".");
        let mut lines = vec![Line::Blank, Line::Warning("Setup:".into())];
        match self.loader {
            LoaderStrategy::SelfContained => {
                lines.push(Line::Plain(
                    "   1. Load the autoloader in your main plugin file:".into(),
                ));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!(
                    "      require_once __DIR__ . '/{}/{}';",
                    output, self.loader_file
                )));
                lines.push(Line::Blank);
                lines.push(Line::Plain("   2. Use the branded classes:".into()));
            }
            LoaderStrategy::External => {
                lines.push(Line::Plain(
                    "   1. Load helpers in your main plugin file:".into(),
                ));
                lines.push(Line::Blank);
                lines.push(Line::Plain(format!(
                    "      require_once __DIR__ . '/{}/{}';",
                    output, self.loader_file
                )));
                lines.push(Line::Blank);
                lines.push(Line::Plain(
                    "   2. Classes are autoloaded by your project's autoloader:".into(),
                ));
            }
        }
        lines.push(Line::Blank);
        lines.push(Line::Plain(format!("      use {}\\Facades\\App;", self.target)));
        lines.push(Line::Blank);
        lines.push(Line::Plain(format!(
            "   3. Add /{}/ to your .gitignore",
            output
        )));
        lines.push(Line::Blank);
        lines.push(Line::Comment(
            "   After updating the template, run `nsbrand build` again.".into(),
        ));
        lines.push(Line::Blank);
        lines
    }

    fn next_steps(&self) -> Vec<Line> {
        vec![
            Line::Blank,
            Line::Warning("Next steps:".into()),
            Line::Plain("   1. Update your composer.json autoload section:".into()),
            Line::Plain("      \"autoload\": {".into()),
            Line::Plain("          \"psr-4\": {".into()),
            Line::Plain(format!(
                "              \"{}\\\\\": \"{}/\"",
                self.target.replace('\\', "\\\\"),
                self.source
            )),
            Line::Plain("          }".into()),
            Line::Plain("      }".into()),
            Line::Blank,
            Line::Plain("   2. Run: composer dump-autoload".into()),
            Line::Blank,
            Line::Plain("   3. Update your main plugin file to use the new namespace:".into()),
            Line::Plain(format!("      use {}\\Application;", self.target)),
            Line::Blank,
        ]
    }
}
