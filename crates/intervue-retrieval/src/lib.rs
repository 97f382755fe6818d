// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base retrieval for the Intervue pipeline.
//!
//! Provides:
//! - [`OnnxEmbedder`] for query vectors matching the ingestion model
//! - [`ElasticsearchBackend`] speaking the `_search` API
//! - [`Retriever`] which scopes every query to one category and caps the hits

pub mod backend;
pub mod embedder;
pub mod model_manager;
pub mod query;
pub mod retriever;

pub use backend::ElasticsearchBackend;
pub use embedder::{EMBEDDING_DIM, OnnxEmbedder};
pub use model_manager::ModelManager;
pub use retriever::{EmbeddingCheck, Retriever};
