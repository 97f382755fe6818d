// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Intervue RAG pipeline.
//!
//! Strict TOML parsing (`deny_unknown_fields`), XDG hierarchy lookup,
//! `INTERVUE_*` environment overrides, and miette diagnostics with typo
//! suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use intervue_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Search backend: {}", config.search.url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::IntervueConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors become diagnostics with typo suggestions; a config that
/// deserializes is then checked by [`validation::validate_config`].
pub fn load_and_validate() -> Result<IntervueConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file and validate it.
///
/// Unlike the hierarchy files, an explicit file must exist.
pub fn load_and_validate_path(path: &Path) -> Result<IntervueConfig, Vec<ConfigError>> {
    if !path.is_file() {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` not found",
            path.display()
        ))]);
    }
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<IntervueConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<IntervueConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<IntervueConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read whichever hierarchy files exist, for source span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::CONFIG_FILE_NAME))
        .unwrap_or_else(|_| loader::CONFIG_FILE_NAME.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
