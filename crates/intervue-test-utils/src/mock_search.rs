// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory search backend.

use async_trait::async_trait;
use tokio::sync::Mutex;

use intervue_core::IntervueError;
use intervue_core::traits::{PluginAdapter, SearchAdapter};
use intervue_core::types::{
    AdapterType, Document, HealthStatus, LexicalQuery, VectorQuery,
};

/// Serves a fixed corpus in stored order.
///
/// By default the category filter is honoured like a real cluster would.
/// [`MockSearchBackend::ignoring_filter`] simulates a misconfigured index
/// that leaks other categories.
pub struct MockSearchBackend {
    corpus: Vec<Document>,
    apply_filter: bool,
    failure: Option<String>,
    embedding_model: Option<String>,
    lexical_queries: Mutex<Vec<LexicalQuery>>,
    vector_queries: Mutex<Vec<VectorQuery>>,
}

impl MockSearchBackend {
    pub fn new(corpus: Vec<Document>) -> Self {
        Self {
            corpus,
            apply_filter: true,
            failure: None,
            embedding_model: None,
            lexical_queries: Mutex::new(Vec::new()),
            vector_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn ignoring_filter(mut self) -> Self {
        self.apply_filter = false;
        self
    }

    /// Every search fails with a retrieval error.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn with_embedding_model(mut self, name: &str) -> Self {
        self.embedding_model = Some(name.to_string());
        self
    }

    pub async fn lexical_queries(&self) -> Vec<LexicalQuery> {
        self.lexical_queries.lock().await.clone()
    }

    pub async fn vector_queries(&self) -> Vec<VectorQuery> {
        self.vector_queries.lock().await.clone()
    }

    fn select(
        &self,
        category: intervue_core::Category,
        size: usize,
    ) -> Result<Vec<Document>, IntervueError> {
        if let Some(message) = &self.failure {
            return Err(IntervueError::retrieval(message.clone()));
        }
        Ok(self
            .corpus
            .iter()
            .filter(|d| !self.apply_filter || d.category == category)
            .take(size)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PluginAdapter for MockSearchBackend {
    fn name(&self) -> &str {
        "mock-search"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        Ok(match &self.failure {
            Some(message) => HealthStatus::Unhealthy(message.clone()),
            None => HealthStatus::Healthy,
        })
    }
}

#[async_trait]
impl SearchAdapter for MockSearchBackend {
    async fn lexical_search(&self, query: &LexicalQuery) -> Result<Vec<Document>, IntervueError> {
        self.lexical_queries.lock().await.push(query.clone());
        self.select(query.category, query.size)
    }

    async fn vector_search(&self, query: &VectorQuery) -> Result<Vec<Document>, IntervueError> {
        self.vector_queries.lock().await.push(query.clone());
        self.select(query.category, query.k)
    }

    async fn index_embedding_model(&self) -> Result<Option<String>, IntervueError> {
        Ok(self.embedding_model.clone())
    }
}
