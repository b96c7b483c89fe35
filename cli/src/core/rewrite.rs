//! # nsbrand Rewrite Rules
//!
//! File: cli/src/core/rewrite.rs
//!
//! ## Overview
//!
//! This module decides which pieces of text in a template file refer to the
//! placeholder namespace and rewrites them to the effective target namespace
//! (`<Prefix>\WPLite`). It works on plain text with a handful of anchored
//! regular expressions; there is no parser and no symbol table.
//!
//! ## Architecture
//!
//! Each recognized shape is an independent `Rule`:
//!
//! | Shape          | Matches                                            |
//! |----------------|----------------------------------------------------|
//! | `Declaration`  | `namespace WPLite;` / `namespace WPLite\Sub;` / `namespace WPLite {` at line start |
//! | `Import`       | `use WPLite\...` (also `use function`, `use const`) at line start |
//! | `Qualified`    | `\WPLite\Name` anywhere, unless glued to a preceding name |
//! | `DocReference` | `@see`, `@method`, ... followed on the same line by `\WPLite\` |
//! | `EscapedQualified` | `\\WPLite\\Name` as written inside a string literal |
//!
//! Rewriting is two-phase. Rules run in the order above and replace the
//! placeholder segment with a sentinel that cannot occur in source text (it
//! is delimited by NUL characters). Only after every rule has run is the
//! sentinel swapped for the target namespace. A segment claimed by one rule is
//! therefore never seen again by a later one.
//!
//! The escaped form stages its own sentinel, committed as the target with
//! doubled separators so the literal still names the right class at runtime.
//!
//! The rules are also anchored so that their own output never matches them.
//! Running the rewriter over branded text is a no-op, which makes repeated
//! builds and repeated installs safe.
//!
//! ## Entry helper
//!
//! The helper file is deliberately written without a namespace so that it can
//! be included directly. `rewrite_entry_helper` applies the rules above, then
//! injects `namespace <Target>;` right after the opening `<?php`, and finally
//! qualifies the names passed to `function_exists('...')`, since the injected
//! declaration moves every function in the file into the target namespace.
//!
//! ## Loader
//!
//! `rewrite_loader` is used by install mode on the existing loader: imports,
//! qualified references, and the `$prefix = 'WPLite\\';` literal the loader
//! matches class names against.
//!
use crate::core::error::{BrandError, Result};
use crate::core::prefix::Prefix;
use crate::core::syntax::Syntax;
use regex::{Captures, NoExpand, Regex};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Stand-in for the placeholder segment between staging and commit.
const SENTINEL: &str = "\u{0}NSBRAND_TARGET\u{0}";
/// Same, for the escaped form inside string literals.
const LITERAL_SENTINEL: &str = "\u{0}NSBRAND_LITERAL\u{0}";

/// The textual shapes the rewriter recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Declaration,
    Import,
    Qualified,
    DocReference,
    EscapedQualified,
    LoaderPrefix,
}

/// One anchored matcher and the template replacing each match.
#[derive(Debug)]
struct Rule {
    shape: Shape,
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(shape: Shape, pattern: &str, replacement: String) -> Result<Self> {
        Ok(Self {
            shape,
            pattern: compile(pattern)?,
            replacement,
        })
    }

    /// Replaces every match, staging the sentinel in place of the placeholder.
    fn stage<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let staged = self.pattern.replace_all(text, self.replacement.as_str());
        if let Cow::Owned(_) = staged {
            debug!("{:?} rule matched", self.shape);
        }
        staged
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern).map_err(BrandError::from)?)
}

/// Compiled rewrite rules for one target prefix.
#[derive(Debug)]
pub struct Rewriter {
    target: String,
    target_literal: String,
    declaration: Rule,
    import: Rule,
    qualified: Rule,
    doc_reference: Rule,
    escaped_qualified: Rule,
    loader_prefix: Rule,
    declaration_probe: Regex,
    open_marker: Regex,
    existence_check: Regex,
}

impl Rewriter {
    pub fn new(syntax: &Syntax, prefix: &Prefix) -> Result<Self> {
        let placeholder = regex::escape(syntax.placeholder);
        let sep = regex::escape(&syntax.separator.to_string());
        let sep_lit = syntax.separator.to_string();
        let decl = regex::escape(syntax.declaration_keyword);
        let import = regex::escape(syntax.import_keyword);
        let tags = syntax
            .doc_tags
            .iter()
            .map(|tag| regex::escape(tag))
            .collect::<Vec<_>>()
            .join("|");

        let target = syntax.effective_identifier(prefix.as_str());
        // The loader matches class names against a single-quoted literal,
        // where each separator is written doubled.
        let target_literal = target.replace('\\', "\\\\");

        let declaration = Rule::new(
            Shape::Declaration,
            &format!(r"(?m)^([ \t]*{decl}[ \t]+){placeholder}([ \t]*(?:;|\{{|{sep}))"),
            format!("${{1}}{SENTINEL}${{2}}"),
        )?;
        let import = Rule::new(
            Shape::Import,
            &format!(
                r"(?m)^([ \t]*{import}[ \t]+(?:(?:function|const)[ \t]+)?){placeholder}{sep}"
            ),
            format!("${{1}}{SENTINEL}{sep_lit}"),
        )?;
        let qualified = Rule::new(
            Shape::Qualified,
            &format!(r"(?m)(^|[^A-Za-z0-9_{sep}]){sep}{placeholder}{sep}([A-Za-z_])"),
            format!("${{1}}{sep_lit}{SENTINEL}{sep_lit}${{2}}"),
        )?;
        let doc_reference = Rule::new(
            Shape::DocReference,
            &format!(r"(@(?:{tags})[ \t]+[^{sep}\r\n]*?){sep}{placeholder}{sep}"),
            format!("${{1}}{sep_lit}{SENTINEL}{sep_lit}"),
        )?;
        let escaped_qualified = Rule::new(
            Shape::EscapedQualified,
            &format!(r"(^|[^A-Za-z0-9_{sep}]){sep}{sep}{placeholder}{sep}{sep}([A-Za-z_])"),
            format!("${{1}}{sep_lit}{sep_lit}{LITERAL_SENTINEL}{sep_lit}{sep_lit}${{2}}"),
        )?;
        let loader_prefix = Rule::new(
            Shape::LoaderPrefix,
            &format!(r"(\$prefix[ \t]*=[ \t]*'){placeholder}({sep}{sep}'[ \t]*;)"),
            format!("${{1}}{target_literal}${{2}}"),
        )?;

        let declaration_probe = compile(&format!(
            r"(?m)^[ \t]*{decl}[ \t]+{sep}?([A-Za-z_][A-Za-z0-9_]*(?:{sep}[A-Za-z_][A-Za-z0-9_]*)*)?"
        ))?;
        let open_marker = compile(&format!(r"\A{}\s*", regex::escape(syntax.open_marker)))?;
        let existence_check = compile(&format!(
            r#"\b({check}[ \t]*\([ \t]*)(?:'([A-Za-z_][A-Za-z0-9_]*)'|"([A-Za-z_][A-Za-z0-9_]*)")([ \t]*\))"#,
            check = regex::escape(syntax.existence_check),
        ))?;

        Ok(Self {
            target,
            target_literal,
            declaration,
            import,
            qualified,
            doc_reference,
            escaped_qualified,
            loader_prefix,
            declaration_probe,
            open_marker,
            existence_check,
        })
    }

    /// The effective target namespace, e.g. `Acme\WPLite`.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Rewrites an ordinary template file.
    pub fn rewrite_module(&self, content: &str) -> String {
        let staged = self.stage(
            content,
            &[
                &self.declaration,
                &self.import,
                &self.qualified,
                &self.doc_reference,
                &self.escaped_qualified,
            ],
        );
        self.commit(&staged)
    }

    /// Rewrites the declaration-less entry helper file.
    pub fn rewrite_entry_helper(&self, content: &str) -> String {
        let has_declaration = self.has_declaration(content);
        let mut rewritten = self.rewrite_module(content);

        if !has_declaration {
            match self.inject_declaration(&rewritten) {
                Some(injected) => rewritten = injected,
                None => warn!("Entry helper has no opening marker; namespace not injected"),
            }
        }

        self.qualify_existence_checks(&rewritten).into_owned()
    }

    /// Rewrites the loader file in place (install mode).
    pub fn rewrite_loader(&self, content: &str) -> String {
        let staged = self.stage(
            content,
            &[
                &self.import,
                &self.qualified,
                &self.escaped_qualified,
                &self.loader_prefix,
            ],
        );
        self.commit(&staged)
    }

    /// True if `content` already has a namespace declaration of any kind.
    pub fn has_declaration(&self, content: &str) -> bool {
        self.declaration_probe
            .captures_iter(content)
            .any(|caps| caps.get(1).is_some())
    }

    /// The namespace named by the first declaration in `content`.
    pub fn declared_namespace<'t>(&self, content: &'t str) -> Option<&'t str> {
        self.declaration_probe
            .captures_iter(content)
            .find_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn stage(&self, content: &str, rules: &[&Rule]) -> String {
        let mut text = content.to_string();
        for rule in rules {
            let replaced = match rule.stage(&text) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            if let Some(next) = replaced {
                text = next;
            }
        }
        text
    }

    fn commit(&self, staged: &str) -> String {
        staged
            .replace(SENTINEL, &self.target)
            .replace(LITERAL_SENTINEL, &self.target_literal)
    }

    fn inject_declaration(&self, content: &str) -> Option<String> {
        if !self.open_marker.is_match(content) {
            return None;
        }
        let header = format!("<?php\n\nnamespace {};\n\n", self.target);
        Some(
            self.open_marker
                .replacen(content, 1, NoExpand(&header))
                .into_owned(),
        )
    }

    fn qualify_existence_checks<'t>(&self, content: &'t str) -> Cow<'t, str> {
        self.existence_check.replace_all(content, |caps: &Captures| {
            let name = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            format!("{}'{}\\{}'{}", &caps[1], self.target, name, &caps[4])
        })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter(prefix: &str) -> Rewriter {
        Rewriter::new(&Syntax::php(), &prefix.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_end_to_end_shapes() {
        let source = "<?php\n\nnamespace WPLite;\n\nuse WPLite\\Facades\\App;\n\nclass Boot\n{\n    public function routes()\n    {\n        return \\WPLite\\RouteManager::class;\n    }\n}\n";
        let out = rewriter("Acme").rewrite_module(source);
        assert!(out.contains("namespace Acme\\WPLite;\n"));
        assert!(out.contains("use Acme\\WPLite\\Facades\\App;\n"));
        assert!(out.contains("return \\Acme\\WPLite\\RouteManager::class;"));
        assert!(!out.contains(SENTINEL));
    }

    #[test]
    fn test_declaration_subpath_and_braces() {
        let r = rewriter("Acme");
        assert_eq!(
            r.rewrite_module("namespace WPLite\\Facades;\n"),
            "namespace Acme\\WPLite\\Facades;\n"
        );
        assert_eq!(
            r.rewrite_module("namespace WPLite {\n}\n"),
            "namespace Acme\\WPLite {\n}\n"
        );
        assert_eq!(
            r.rewrite_module("  namespace   WPLite ;\n"),
            "  namespace   Acme\\WPLite ;\n"
        );
    }

    #[test]
    fn test_import_variants() {
        let r = rewriter("Acme");
        let out = r.rewrite_module(
            "use WPLite\\Container;\nuse function WPLite\\Support\\tap;\nuse const WPLite\\VERSION;\nuse WPLite\\{Config, DB};\n",
        );
        assert_eq!(
            out,
            "use Acme\\WPLite\\Container;\nuse function Acme\\WPLite\\Support\\tap;\nuse const Acme\\WPLite\\VERSION;\nuse Acme\\WPLite\\{Config, DB};\n"
        );
    }

    #[test]
    fn test_doc_references() {
        let r = rewriter("Acme");
        let source = "/**\n * @method static \\WPLite\\Application make($class, array $params = [])\n * @see \\WPLite\\Application\n * @param array|\\WPLite\\Config $config\n**/\n";
        let out = r.rewrite_module(source);
        assert!(out.contains("@method static \\Acme\\WPLite\\Application make("));
        assert!(out.contains("@see \\Acme\\WPLite\\Application\n"));
        assert!(out.contains("@param array|\\Acme\\WPLite\\Config $config"));
    }

    #[test]
    fn test_doc_reference_after_name_prefix() {
        // Only the doc rule reaches a reference glued to a preceding name.
        let out = rewriter("Acme").rewrite_module(" * @return Collection\\WPLite\\Model\n");
        assert_eq!(out, " * @return Collection\\Acme\\WPLite\\Model\n");
    }

    #[test]
    fn test_selectivity_leaves_lookalikes_alone() {
        let r = rewriter("Acme");
        let source = "<?php\nnamespace WPLiteExtra;\nuse WPLiteTools\\Thing;\nuse MyWPLite\\Thing;\n$a = \\MyWPLite\\Thing::class;\n$b = \\WPLiteX\\Y::class;\n$c = 'WPLite';\n$d = \\Vendor\\WPLite\\Thing::class;\n// WPLite is great\n";
        assert_eq!(r.rewrite_module(source), source);
    }

    #[test]
    fn test_escaped_references_in_string_literals() {
        let r = rewriter("Acme");
        let source = "$a = '\\\\WPLite\\\\Facades\\\\App';\n$b = \"\\\\WPLite\\\\Application\";\n$c = 'Vendor\\\\WPLite\\\\X';\n";
        let out = r.rewrite_module(source);
        assert!(out.contains("$a = '\\\\Acme\\\\WPLite\\\\Facades\\\\App';"));
        assert!(out.contains("$b = \"\\\\Acme\\\\WPLite\\\\Application\";"));
        assert!(out.contains("$c = 'Vendor\\\\WPLite\\\\X';"));
        assert_eq!(r.rewrite_module(&out), out);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let r = rewriter("Acme");
        let source = "<?php\n\nnamespace WPLite\\Facades;\n\nuse WPLite\\Application;\n\n/**\n * @method static \\WPLite\\Application make()\n * @see \\WPLite\\Application\n * @return Collection\\WPLite\\Model\n */\nclass App extends Facade\n{\n    protected $x = [\\WPLite\\A::class, \\WPLite\\B::class];\n}\n";
        let once = r.rewrite_module(source);
        assert_ne!(once, source);
        let twice = r.rewrite_module(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_entry_helper_injection_and_existence_checks() {
        let r = rewriter("Acme");
        let source = "<?php\n\nuse WPLite\\Facades\\App;\n\nif (!function_exists('appLogger')) {\n    function appLogger($message) {}\n}\n\nif (!function_exists( \"appConfig\" )) {\n    function appConfig() { return 'appLogger'; }\n}\n";
        let out = r.rewrite_entry_helper(source);
        assert!(out.starts_with("<?php\n\nnamespace Acme\\WPLite;\n\nuse Acme\\WPLite\\Facades\\App;\n"));
        assert!(out.contains("if (!function_exists('Acme\\WPLite\\appLogger')) {"));
        assert!(out.contains("if (!function_exists( 'Acme\\WPLite\\appConfig' )) {"));
        // Unrelated string literals stay untouched.
        assert!(out.contains("return 'appLogger';"));
        assert_eq!(r.rewrite_entry_helper(&out), out);
    }

    #[test]
    fn test_entry_helper_with_declaration_is_not_injected() {
        let r = rewriter("Acme");
        let source = "<?php\nnamespace Other;\n\nfunction_exists('x');\n";
        let out = r.rewrite_entry_helper(source);
        assert_eq!(out.matches("namespace").count(), 1);
        assert!(out.contains("function_exists('Acme\\WPLite\\x')"));
    }

    #[test]
    fn test_entry_helper_without_marker_is_not_injected() {
        let r = rewriter("Acme");
        let out = r.rewrite_entry_helper("function helper() {}\n");
        assert_eq!(out, "function helper() {}\n");
    }

    #[test]
    fn test_existence_check_ignores_lookalikes() {
        let r = rewriter("Acme");
        let source = "<?php\nnamespace X;\nmy_function_exists('a');\nfunction_exists($name);\nfunction_exists('a' . 'b');\nfunction_exists('Already\\Qualified');\n";
        assert_eq!(r.rewrite_entry_helper(source), source);
    }

    #[test]
    fn test_loader_rewrite() {
        let r = rewriter("Acme");
        let source = "<?php\n\nuse WPLite\\Facades\\Config;\n\nspl_autoload_register(function ($class) {\n    $prefix = 'WPLite\\\\';\n});\n\nspl_autoload_register(function ($class) {\n    $prefix = 'App\\\\';\n});\n";
        let out = r.rewrite_loader(source);
        assert!(out.contains("use Acme\\WPLite\\Facades\\Config;"));
        assert!(out.contains("$prefix = 'Acme\\\\WPLite\\\\';"));
        assert!(out.contains("$prefix = 'App\\\\';"));
        assert_eq!(r.rewrite_loader(&out), out);
    }

    #[test]
    fn test_declared_namespace() {
        let r = rewriter("Acme");
        assert_eq!(
            r.declared_namespace("<?php\n\nnamespace Acme\\WPLite\\Facades;\n"),
            Some("Acme\\WPLite\\Facades")
        );
        assert_eq!(r.declared_namespace("<?php\nnamespace Acme {\n}\n"), Some("Acme"));
        assert_eq!(r.declared_namespace("<?php\nnamespace {\n}\n"), None);
        assert_eq!(r.declared_namespace("<?php\n// namespace X;\n"), None);
        assert!(!r.has_declaration("<?php\nnamespace {\n}\n"));
        assert!(r.has_declaration("<?php\nnamespace \\Other;\n"));
    }

    #[test]
    fn test_target() {
        assert_eq!(rewriter("My_Plugin").target(), "My_Plugin\\WPLite");
    }
}
