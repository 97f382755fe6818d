// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Intervue pipeline.

use thiserror::Error;

/// The primary error type used across all Intervue adapter traits and pipeline stages.
#[derive(Debug, Error)]
pub enum IntervueError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Search backend errors (unreachable backend, missing index, non-success status).
    #[error("retrieval error: {message}")]
    Retrieval {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model identifier names a provider with no registered client.
    #[error("unsupported model: {model}")]
    UnsupportedModel { model: String },

    /// LLM provider errors (API failure, malformed response, exhausted retries).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query encoding failed (tokenizer, ONNX session, tensor shape).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntervueError {
    /// Shorthand for a retrieval error without an underlying cause.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a provider error without an underlying cause.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
