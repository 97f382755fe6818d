// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for query vectorisation.

use async_trait::async_trait;

use crate::error::IntervueError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for turning query text into dense vectors.
///
/// The vectors must come from the same model that produced the indexed
/// document vectors, otherwise nearest-neighbour search is meaningless.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Identifier of the underlying sentence-embedding model.
    fn model_name(&self) -> &str;

    /// Generates embeddings for the given input.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, IntervueError>;
}
