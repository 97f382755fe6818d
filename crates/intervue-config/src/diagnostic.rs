// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridges Figment errors to miette diagnostics.
//!
//! Unknown keys get a "did you mean" hint chosen by Jaro-Winkler similarity
//! and, when the offending file is readable, a labelled source span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity floor for suggesting a replacement key.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem ready to be rendered for the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(intervue::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys accepted in the same section.
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(intervue::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(intervue::config::missing_key),
        help("add `{key} = <value>` to intervue.toml")
    )]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(intervue::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(intervue::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by a `figment::Error` into a `ConfigError`.
///
/// `toml_sources` pairs file paths with their contents and is used to
/// attach source spans to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let suggestion = suggest_key(field, expected);
                    let (span, src) = source_span(&error, &section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion,
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: section.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span: None,
                    src: None,
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn source_span(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline sources carry no file metadata; fall back to the only source given.
    let found = match origin {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    let Some((path, content)) = found else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` inside the TOML table named by `section`.
///
/// An empty `section` searches the top level. Only keys at the start of a
/// line followed by whitespace or `=` count as a match.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(table) => {
            let header = format!("[{table}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if section.is_empty() && trimmed.starts_with('[') {
            break;
        }
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.starts_with([' ', '\t', '=']) {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
