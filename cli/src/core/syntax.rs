//! # nsbrand Template Syntax
//!
//! File: cli/src/core/syntax.rs
//!
//! The fixed textual vocabulary of the template tree: the placeholder
//! namespace, the keywords the rewrite rules anchor on, and the file-level
//! conventions used by the transformer and the loader generator.
//!

/// The namespace baked into the template tree.
pub const PLACEHOLDER: &str = "WPLite";

/// Textual conventions of the template language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// The identifier that gets branded.
    pub placeholder: &'static str,
    /// Namespace separator.
    pub separator: char,
    /// Keyword opening a namespace declaration.
    pub declaration_keyword: &'static str,
    /// Keyword opening an import statement.
    pub import_keyword: &'static str,
    /// Marker every source file starts with.
    pub open_marker: &'static str,
    /// Runtime check whose string argument names a function.
    pub existence_check: &'static str,
    /// Documentation tags whose inline references are rewritten.
    pub doc_tags: &'static [&'static str],
    /// Extension of files the engine rewrites.
    pub extension: &'static str,
}

impl Syntax {
    pub fn php() -> Self {
        Self {
            placeholder: PLACEHOLDER,
            separator: '\\',
            declaration_keyword: "namespace",
            import_keyword: "use",
            open_marker: "<?php",
            existence_check: "function_exists",
            doc_tags: &[
                "see",
                "method",
                "return",
                "param",
                "var",
                "throws",
                "property",
                "property-read",
                "property-write",
                "mixin",
                "uses",
            ],
            extension: "php",
        }
    }

    /// `Prefix\WPLite`.
    pub fn effective_identifier(&self, prefix: &str) -> String {
        format!("{}{}{}", prefix, self.separator, self.placeholder)
    }

    /// Returns true if `path` has the source extension.
    pub fn is_source_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == self.extension)
    }
}
