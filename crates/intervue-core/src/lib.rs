// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Intervue interview-preparation assistant.
//!
//! This crate provides the error type, the domain types that flow through
//! the retrieve → generate → evaluate pipeline, and the adapter traits that
//! the search, embedding, and provider crates implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::IntervueError;
pub use types::{
    AdapterType, AnswerRecord, Category, Document, GenerationResult, HealthStatus, LengthTier,
    MAX_RESULTS, ModelIdentifier, ProviderKind, RelevanceLabel, RelevanceVerdict,
    RetrievalResult, SearchMode, SearchQuery, TokenUsage,
};

pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter, SearchAdapter};
