//! PHP source scanning.
//!
//! Both platforms keep their settings in plain PHP files. This module does
//! not parse PHP; it pulls out the three statement shapes the adapters
//! need, each anchored to the start of a line so commented-out lines
//! (`// define(...)`, `# $db = ...`) are ignored:
//!
//! - `define('NAME', 'value');`
//! - `$name = 'value';` (optionally `public $name` / `var $name`)
//! - `const NAME = 'value';` or `const NAME = 42;`

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{AdapterError, Result};

const QUOTED: &str = r#"(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")"#;

fn define_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r#"(?m)^\s*define\s*\(\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*,\s*{}\s*\)"#,
            QUOTED
        );
        Regex::new(&pattern).expect("Invalid define pattern")
    })
}

fn var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r#"(?m)^\s*(?:(?:public|var)\s+)?\$([A-Za-z_][A-Za-z0-9_]*)\s*=\s*{}\s*;"#,
            QUOTED
        );
        Regex::new(&pattern).expect("Invalid variable pattern")
    })
}

fn const_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            concat!(
                r#"(?m)^\s*(?:(?:public|protected|private|final)\s+)*"#,
                r#"const\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:{}|(-?\d+))\s*;"#
            ),
            QUOTED
        );
        Regex::new(&pattern).expect("Invalid const pattern")
    })
}

/// Undoes PHP single/double quote escaping for the characters that matter
/// in config values.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\'' | '"' | '\\' | '$')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// First non-empty capture among groups `2..`, unescaped.
fn value_of(caps: &Captures<'_>) -> String {
    caps.iter()
        .skip(2)
        .flatten()
        .next()
        .map(|m| unescape(m.as_str()))
        .unwrap_or_default()
}

/// Settings extracted from one PHP file.
#[derive(Debug, Clone, Default)]
pub struct PhpSettings {
    defines: HashMap<String, String>,
    vars: HashMap<String, String>,
    consts: HashMap<String, String>,
}

impl PhpSettings {
    /// Scans PHP source text.
    pub fn scan(source: &str) -> Self {
        let mut settings = Self::default();

        // A constant can only be defined once; the first definition wins.
        for caps in define_regex().captures_iter(source) {
            settings
                .defines
                .entry(caps[1].to_string())
                .or_insert_with(|| value_of(&caps));
        }
        // Later assignments overwrite earlier ones.
        for caps in var_regex().captures_iter(source) {
            settings.vars.insert(caps[1].to_string(), value_of(&caps));
        }
        for caps in const_regex().captures_iter(source) {
            settings.consts.insert(caps[1].to_string(), value_of(&caps));
        }

        settings
    }

    /// Reads and scans a PHP file. Unreadable files are parse errors.
    pub fn load(path: &Path) -> Result<Self> {
        let source =
            fs::read_to_string(path).map_err(|e| AdapterError::parse(path, e.to_string()))?;
        Ok(Self::scan(&source))
    }

    /// Value of `define('NAME', ...)`.
    pub fn define(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    /// Value of `$name = ...;`.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Value of `const NAME = ...;`.
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.consts.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty() && self.vars.is_empty() && self.consts.is_empty()
    }
}
