// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search adapter trait for the knowledge-base backend.

use async_trait::async_trait;

use crate::error::IntervueError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Document, LexicalQuery, VectorQuery};

/// Adapter for a document search backend.
///
/// Implementations return hits in rank order and must apply the category
/// filter carried by the query.
#[async_trait]
pub trait SearchAdapter: PluginAdapter {
    /// Runs a weighted multi-field text query.
    async fn lexical_search(&self, query: &LexicalQuery) -> Result<Vec<Document>, IntervueError>;

    /// Runs an approximate nearest-neighbour query.
    async fn vector_search(&self, query: &VectorQuery) -> Result<Vec<Document>, IntervueError>;

    /// Returns the embedding model tag recorded with the index, if any.
    async fn index_embedding_model(&self) -> Result<Option<String>, IntervueError> {
        Ok(None)
    }
}
