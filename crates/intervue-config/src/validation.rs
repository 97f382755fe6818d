// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: non-empty endpoints, a judge
//! model the gateway can dispatch, and sane retrieval sizes.

use intervue_core::{MAX_RESULTS, ModelIdentifier};

use crate::diagnostic::ConfigError;
use crate::model::IntervueConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &IntervueConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let endpoints = [
        ("search.url", &config.search.url),
        ("ollama.base_url", &config.ollama.base_url),
        ("openai.base_url", &config.openai.base_url),
    ];
    for (key, value) in endpoints {
        let value = value.trim();
        if value.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !(value.starts_with("http://") || value.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` must start with http:// or https://"),
            });
        }
    }

    if config.search.index_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "search.index_name must not be empty".to_string(),
        });
    }

    if config.search.result_limit == 0 || config.search.result_limit > MAX_RESULTS {
        errors.push(ConfigError::Validation {
            message: format!(
                "search.result_limit must be between 1 and {MAX_RESULTS}, got {}",
                config.search.result_limit
            ),
        });
    }

    if config.search.num_candidates < config.search.result_limit {
        errors.push(ConfigError::Validation {
            message: format!(
                "search.num_candidates ({}) must be at least search.result_limit ({})",
                config.search.num_candidates, config.search.result_limit
            ),
        });
    }

    if config.embedding.model_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "embedding.model_name must not be empty".to_string(),
        });
    }

    if let Err(e) = ModelIdentifier::parse(&config.evaluation.judge_model) {
        errors.push(ConfigError::Validation {
            message: format!("evaluation.judge_model: {e}"),
        });
    }

    if config.provider.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.timeout_secs must be greater than zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level `{}` must be one of: {}",
                config.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
