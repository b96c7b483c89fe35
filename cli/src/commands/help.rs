//! # nsbrand Help Text
//!
//! File: cli/src/commands/help.rs
//!
//! Printed for `nsbrand`, `nsbrand help`, `nsbrand --help`, `nsbrand -h`, and
//! after an unknown command.
//!
use colored::Colorize;

pub fn help_text() -> String {
    let mut out = String::new();
    let mut push = |line: String| {
        out.push_str(&line);
        out.push('\n');
    };

    push(String::new());
    push(format!(
        "  {} - Namespace branding for vendored template trees",
        "nsbrand".cyan().bold()
    ));
    push(String::new());
    push(format!("  {}", "Usage:".yellow().bold()));
    push("    nsbrand [-v...] <command> [options]".into());
    push(String::new());
    push(format!("  {}", "Available Commands:".yellow().bold()));
    push(format!(
        "    {}         Build a branded copy of the template (recommended)",
        "build".green()
    ));
    push(format!(
        "    {}       [deprecated] Brand the template in place (destructive)",
        "install".dimmed()
    ));
    push(format!("    {}          Show this help", "help".green()));
    push(String::new());
    push(format!("  {}", "Options:".yellow().bold()));
    push("    --prefix=<Name>   The namespace prefix (e.g., MyPlugin); remembered for later runs".into());
    push("    --output=<path>   Output directory (build; default: ./core)".into());
    push("    --source=<path>   Template directory (default: ./src)".into());
    push("    --loader=<kind>   self-contained (default) or external (build)".into());
    push("    --dry-run         Preview changes without writing files".into());
    push("    --force           Skip the confirmation prompt (install)".into());
    push(String::new());
    push(format!("  {}", "Examples:".yellow().bold()));
    push("    nsbrand build --prefix=MyPlugin              # Build to ./core".into());
    push("    nsbrand build --prefix=MyPlugin --output=lib # Build to ./lib".into());
    push("    nsbrand build                                # Uses saved prefix".into());
    push("    nsbrand build --dry-run                      # Preview only".into());
    push(String::new());
    push(format!("  {}", "Settings:".yellow().bold()));
    push("    Defaults can be set in nsbrand.toml ([template] and [build] tables).".into());
    push(String::new());
    out
}

pub fn print_help() {
    print!("{}", help_text());
}
