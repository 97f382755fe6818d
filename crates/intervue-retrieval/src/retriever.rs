// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category-scoped candidate retrieval over lexical or vector search.

use std::sync::Arc;

use intervue_config::model::SearchConfig;
use intervue_core::error::IntervueError;
use intervue_core::traits::{EmbeddingAdapter, SearchAdapter};
use intervue_core::types::{
    Document, EmbeddingInput, LexicalQuery, MAX_RESULTS, RetrievalResult, SearchMode, SearchQuery,
    VectorQuery,
};
use tracing::{debug, warn};

/// Result of comparing the index's embedding model with the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingCheck {
    Match,
    Mismatch { index: String, local: String },
    /// The index mapping records no model.
    Untagged,
}

/// Runs one query against the search backend and enforces the category filter.
pub struct Retriever {
    backend: Arc<dyn SearchAdapter>,
    embedder: Option<Arc<dyn EmbeddingAdapter>>,
    result_limit: usize,
    num_candidates: usize,
}

impl Retriever {
    /// Lexical-only retriever with the default limits.
    pub fn new(backend: Arc<dyn SearchAdapter>) -> Self {
        Self {
            backend,
            embedder: None,
            result_limit: MAX_RESULTS,
            num_candidates: 10_000,
        }
    }

    pub fn from_config(backend: Arc<dyn SearchAdapter>, config: &SearchConfig) -> Self {
        Self {
            result_limit: config.result_limit.clamp(1, MAX_RESULTS),
            num_candidates: config.num_candidates,
            ..Self::new(backend)
        }
    }

    /// Enables vector mode.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub async fn retrieve(&self, query: &SearchQuery) -> Result<RetrievalResult, IntervueError> {
        let hits = match query.mode {
            SearchMode::Lexical => {
                self.backend
                    .lexical_search(&LexicalQuery {
                        text: query.text.clone(),
                        category: query.category,
                        size: self.result_limit,
                    })
                    .await?
            }
            SearchMode::Vector => {
                let vector = self.encode(&query.text).await?;
                self.backend
                    .vector_search(&VectorQuery {
                        vector,
                        category: query.category,
                        k: self.result_limit,
                        num_candidates: self.num_candidates,
                    })
                    .await?
            }
        };

        let returned = hits.len();
        let mut documents: Vec<Document> = hits
            .into_iter()
            .filter(|doc| {
                let keep = doc.category == query.category;
                if !keep {
                    warn!(
                        id = %doc.id,
                        expected = query.category.code(),
                        found = doc.category.code(),
                        "dropping document outside requested category"
                    );
                }
                keep
            })
            .collect();
        documents.truncate(self.result_limit);

        debug!(
            mode = %query.mode,
            category = query.category.code(),
            returned,
            kept = documents.len(),
            "retrieval finished"
        );
        Ok(RetrievalResult::new(documents))
    }

    /// Compares the index's recorded embedding model with the local embedder.
    pub async fn verify_embedding_model(&self) -> Result<EmbeddingCheck, IntervueError> {
        let embedder = self.embedder()?;
        let local = embedder.model_name().to_string();
        Ok(match self.backend.index_embedding_model().await? {
            None => EmbeddingCheck::Untagged,
            Some(index) if index == local => EmbeddingCheck::Match,
            Some(index) => EmbeddingCheck::Mismatch { index, local },
        })
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, IntervueError> {
        let output = self
            .embedder()?
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| IntervueError::Embedding("embedder returned no vector".to_string()))
    }

    fn embedder(&self) -> Result<&Arc<dyn EmbeddingAdapter>, IntervueError> {
        self.embedder
            .as_ref()
            .ok_or_else(|| IntervueError::Embedding("no embedding model loaded".to_string()))
    }
}
