//! # nsbrand Loader Resolution
//!
//! File: cli/src/core/resolve.rs
//!
//! ## Overview
//!
//! A Rust model of what the generated self-contained loader does at runtime:
//! given a fully qualified class name, find the file that defines it or
//! decline. The build command uses it after a real build to check that every
//! rewritten class file is reachable through the loader it just generated,
//! and warns about the ones that are not (a file whose path does not follow
//! its namespace, for example).
//!
//! The check reads what each file declares: `<declared namespace>\<file stem>`
//! is the name code would ask the loader for, and the file is reachable only
//! if that name resolves back to it. Files without a declaration are not
//! class files and are left out.
//!
//! ## Architecture
//!
//! - `Resolver`: one strategy, qualified name to path or `None`.
//! - `PrefixResolver`: the self-contained loader's strategy. Strips the
//!   namespace prefix, turns separators into path separators, appends the
//!   source extension, and requires the file to exist under its root.
//! - `ResolverChain`: tries resolvers in registration order; the first hit
//!   wins, mirroring a stack of registered autoloaders.
//!
use crate::core::manifest::{FileCategory, Manifest};
use crate::core::rewrite::Rewriter;
use crate::core::syntax::Syntax;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maps a fully qualified name to the file that defines it.
pub trait Resolver: Debug {
    fn resolve(&self, qualified: &str) -> Option<PathBuf>;
}

/// Resolves `<namespace>\Sub\Name` to `<root>/Sub/Name.<ext>`.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    namespace: String,
    separator: char,
    extension: String,
    root: PathBuf,
}

impl PrefixResolver {
    pub fn new(syntax: &Syntax, namespace: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.to_string(),
            separator: syntax.separator,
            extension: syntax.extension.to_string(),
            root: root.into(),
        }
    }
}

impl Resolver for PrefixResolver {
    fn resolve(&self, qualified: &str) -> Option<PathBuf> {
        let rest = qualified
            .strip_prefix(self.namespace.as_str())?
            .strip_prefix(self.separator)?;
        if rest.is_empty() {
            return None;
        }
        let mut path = self.root.clone();
        for segment in rest.split(self.separator) {
            path.push(segment);
        }
        path.set_extension(&self.extension);
        if path.is_file() {
            Some(path)
        } else {
            debug!("{} -> {} (not found)", qualified, path.display());
            None
        }
    }
}

/// Ordered list of resolvers; the first one that answers wins.
#[derive(Debug, Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resolver: impl Resolver + 'static) -> &mut Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl Resolver for ResolverChain {
    fn resolve(&self, qualified: &str) -> Option<PathBuf> {
        self.resolvers.iter().find_map(|r| r.resolve(qualified))
    }
}

/// Normal records of `manifest` the self-contained loader could not load.
///
/// A record is reported when its file cannot be read, or when the name it
/// declares does not resolve to it under `root`.
pub fn unresolvable_files(
    rewriter: &Rewriter,
    syntax: &Syntax,
    root: &Path,
    manifest: &Manifest,
) -> Vec<PathBuf> {
    let mut chain = ResolverChain::new();
    chain.register(PrefixResolver::new(syntax, rewriter.target(), root));

    manifest
        .of_category(FileCategory::Normal)
        .filter(|record| {
            let path = root.join(&record.path);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!("Cannot read {}: {}", path.display(), e);
                    return true;
                }
            };
            let Some(namespace) = rewriter.declared_namespace(&content) else {
                debug!("{} declares no namespace", record.display_path());
                return false;
            };
            let Some(stem) = record.path.file_stem().and_then(|s| s.to_str()) else {
                return true;
            };
            let qualified = format!("{}{}{}", namespace, syntax.separator, stem);
            chain.resolve(&qualified).as_deref() != Some(path.as_path())
        })
        .map(|record| record.path.clone())
        .collect()
}
