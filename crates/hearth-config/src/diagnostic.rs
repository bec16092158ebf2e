// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment failures into miette diagnostics pointing at `hearth.toml`.
//!
//! Unknown keys get a source span and, when a known key is close enough by
//! Jaro-Winkler distance, a "did you mean" hint.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity a known key must exceed before it is offered as a hint.
const HINT_SIMILARITY: f64 = 0.75;

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
#[deny(missing_docs)]
pub enum ConfigError {
    /// A key that no section of the config accepts.
    #[error("`{key}` is not a hearth setting")]
    #[diagnostic(
        code(hearth::config::unknown_key),
        help("{}", unknown_key_hint(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The key as written.
        key: String,
        /// Closest accepted key, if any is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted at that position.
        valid_keys: String,
        /// Location of the key in `src`, when it could be found.
        #[label("unknown here")]
        span: Option<SourceSpan>,
        /// The TOML document the key came from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the key's type.
    #[error("`{key}` has the wrong type ({detail})")]
    #[diagnostic(code(hearth::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        /// Dotted path of the offending key.
        key: String,
        /// What was found instead.
        detail: String,
        /// The type the key requires.
        expected: String,
    },

    /// A required key with no value in any layer.
    #[error("`{key}` must be set")]
    #[diagnostic(
        code(hearth::config::missing_key),
        help("set `{key}` in hearth.toml or through a HEARTH_ environment variable")
    )]
    MissingKey {
        /// Dotted path of the missing key.
        key: String,
    },

    /// A well-typed value outside its accepted range.
    #[error("validation error: {message}")]
    #[diagnostic(code(hearth::config::validation))]
    Validation {
        /// Names the key and the accepted range.
        message: String,
    },

    /// Any other figment failure, carried as text.
    #[error("configuration error: {0}")]
    #[diagnostic(code(hearth::config::other))]
    Other(String),
}

fn unknown_key_hint(suggestion: Option<&str>, valid_keys: &str) -> String {
    let accepted = format!("accepted keys here: {valid_keys}");
    match suggestion {
        Some(key) => format!("perhaps `{key}`? {accepted}"),
        None => accepted,
    }
}

/// A TOML document that fed the figment, kept for span lookups.
#[derive(Debug, Clone)]
#[deny(missing_docs)]
pub struct ConfigSource {
    /// File path, or `<inline>` for a string source.
    pub name: String,
    /// Full TOML text.
    pub content: String,
}

impl ConfigSource {
    /// A source for TOML that did not come from a file.
    pub fn inline(content: &str) -> Self {
        Self {
            name: "<inline>".to_string(),
            content: content.to_string(),
        }
    }

    /// Read `path` if it exists; missing or unreadable files yield `None`.
    pub fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Some(Self {
            name: path.display().to_string(),
            content,
        })
    }

    fn named(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.content.clone())
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[ConfigSource],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert_one(&error, sources))
        .collect()
}

fn convert_one(error: &figment::Error, sources: &[ConfigSource]) -> ConfigError {
    let dotted = error.path.join(".");
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let suggestion = suggest_key(field, &expected[..]);
            let located = origin_of(error, sources).and_then(|source| {
                find_key_offset(&source.content, &error.path, field)
                    .map(|offset| (SourceSpan::new(offset.into(), field.len()), source.named()))
            });
            let (span, src) = located.unzip();
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion,
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: if dotted.is_empty() {
                field.to_string()
            } else {
                format!("{dotted}.{field}")
            },
        },
        Kind::InvalidType(found, expected) | Kind::InvalidValue(found, expected) => {
            ConfigError::InvalidType {
                key: dotted,
                detail: format!("got {found}"),
                expected: expected.clone(),
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

/// The source an error came from. Inline strings carry no path, so a lone
/// source is assumed to be the origin.
fn origin_of<'a>(
    error: &figment::Error,
    sources: &'a [ConfigSource],
) -> Option<&'a ConfigSource> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|meta| meta.source.as_ref())
        .and_then(|source| source.file_path());
    match (file, sources) {
        (Some(path), _) => {
            let wanted = path.display().to_string();
            sources.iter().find(|s| s.name == wanted)
        }
        (None, [only]) => Some(only),
        (None, _) => None,
    }
}

/// Byte offset of `field` in TOML `content`. When `path` names a section the
/// search starts after its `[section]` header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        let is_key = rest
            .strip_prefix(field)
            .and_then(|after| after.chars().next())
            .is_some_and(|c| c == '=' || c == ' ' || c == '\t');
        if is_key {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// Closest entry of `valid_keys` to `unknown`, when it is similar enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key.as_ref()), key.as_ref()))
        .filter(|(score, _)| *score > HINT_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
