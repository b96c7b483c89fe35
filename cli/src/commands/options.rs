//! # nsbrand Option Parser
//!
//! File: cli/src/commands/options.rs
//!
//! ## Overview
//!
//! Turns the tokens after the command name into a key/value map. The grammar
//! is deliberately loose; anything it does not recognize is ignored rather
//! than rejected, and a later occurrence of a key replaces an earlier one.
//!
//! | Token              | Result                                            |
//! |--------------------|---------------------------------------------------|
//! | `--key=value`      | `key -> Value("value")` (everything after the first `=`, may be empty) |
//! | `--key value`      | `key -> Value("value")` when `value` does not start with `--` |
//! | `--key`            | `key -> Flag` when followed by `--...` or nothing |
//! | `-x`               | `x -> Flag` for a single ASCII letter             |
//! | anything else      | ignored                                           |
//!
//! Note that `--key value` consumes `value` even when it looks like a short
//! flag (`--output -x` sets `output` to `-x`).
//!
use crate::core::error::{BrandError, Result};
use std::collections::HashMap;

/// A parsed option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag,
    Value(String),
}

/// Options given after the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: HashMap<String, OptionValue>,
}

impl Options {
    /// # Parse Options (`parse`)
    ///
    /// Scans `tokens` left to right. Never fails.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut values = HashMap::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_ref();
            if let Some(long) = token.strip_prefix("--") {
                if long.is_empty() || long.starts_with('=') {
                    // `--` and `--=x` name no key.
                } else if let Some((key, value)) = long.split_once('=') {
                    values.insert(key.to_string(), OptionValue::Value(value.to_string()));
                } else {
                    let next: Option<&str> = tokens.get(i + 1).map(|t| t.as_ref());
                    match next {
                        Some(next) if !next.starts_with("--") => {
                            values.insert(long.to_string(), OptionValue::Value(next.to_string()));
                            i += 1;
                        }
                        _ => {
                            values.insert(long.to_string(), OptionValue::Flag);
                        }
                    }
                }
            } else if let Some(short) = token.strip_prefix('-') {
                let mut chars = short.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if c.is_ascii_alphabetic() {
                        values.insert(c.to_string(), OptionValue::Flag);
                    }
                }
            }
            i += 1;
        }
        Self { values }
    }

    /// True if `key` was given in any form.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// The value of `key`, if given.
    ///
    /// # Errors
    ///
    /// `BrandError::ArgumentParsing` when `key` was given as a bare flag.
    pub fn value(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Value(v)) => Ok(Some(v.as_str())),
            Some(OptionValue::Flag) => Err(BrandError::ArgumentParsing(format!(
                "--{} requires a value (--{}=<value>)",
                key, key
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &[&str]) -> Options {
        Options::parse(tokens)
    }

    #[test]
    fn test_equals_form() {
        let opts = parse(&["--prefix=Acme", "--output=", "--x=a=b"]);
        assert_eq!(opts.get("prefix"), Some(&OptionValue::Value("Acme".into())));
        assert_eq!(opts.get("output"), Some(&OptionValue::Value(String::new())));
        assert_eq!(opts.value("x").unwrap(), Some("a=b"));
    }

    #[test]
    fn test_space_form_and_flags() {
        let opts = parse(&["--prefix", "Acme", "--dry-run", "--force"]);
        assert_eq!(opts.value("prefix").unwrap(), Some("Acme"));
        assert_eq!(opts.get("dry-run"), Some(&OptionValue::Flag));
        assert_eq!(opts.get("force"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_space_form_consumes_short_flag_lookalike() {
        let opts = parse(&["--output", "-x"]);
        assert_eq!(opts.value("output").unwrap(), Some("-x"));
        assert!(!opts.has("x"));
    }

    #[test]
    fn test_short_flags() {
        let opts = parse(&["-f", "-ab", "-1", "-"]);
        assert!(opts.has("f"));
        assert!(!opts.has("a"));
        assert!(!opts.has("ab"));
        assert!(!opts.has("1"));
    }

    #[test]
    fn test_unrecognized_tokens_are_ignored_and_last_wins() {
        let opts = parse(&["stray", "--prefix=One", "also-stray", "--prefix=Two"]);
        assert_eq!(opts.value("prefix").unwrap(), Some("Two"));
        assert!(!opts.has("stray"));
    }

    #[test]
    fn test_keyless_long_tokens_are_ignored() {
        let opts = parse(&["--", "--=x"]);
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn test_value_of_flag_is_an_error() {
        let opts = parse(&["--prefix"]);
        assert!(opts.has("prefix"));
        let err = opts.value("prefix").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrandError>(),
            Some(BrandError::ArgumentParsing(_))
        ));
    }
}
