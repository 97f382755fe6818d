// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an Elasticsearch-compatible search cluster.

use std::time::Duration;

use async_trait::async_trait;
use intervue_config::model::SearchConfig;
use intervue_core::error::IntervueError;
use intervue_core::traits::{PluginAdapter, SearchAdapter};
use intervue_core::types::{AdapterType, Document, HealthStatus, LexicalQuery, VectorQuery};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::query;

/// Search adapter that talks to `POST /{index}/_search`.
#[derive(Debug, Clone)]
pub struct ElasticsearchBackend {
    client: reqwest::Client,
    base_url: String,
    index_name: String,
    category_field: String,
    vector_field: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Document,
}

impl ElasticsearchBackend {
    pub fn new(config: &SearchConfig) -> Result<Self, IntervueError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IntervueError::Retrieval {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            category_field: config.category_field.clone(),
            vector_field: config.vector_field.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn search(&self, body: &Value) -> Result<Vec<Document>, IntervueError> {
        let url = format!("{}/{}/_search", self.base_url, self.index_name);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| IntervueError::Retrieval {
                message: format!("search backend unreachable at {}: {e}", self.base_url),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IntervueError::retrieval(format!(
                "index `{}` does not exist",
                self.index_name
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntervueError::retrieval(format!(
                "search returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| IntervueError::Retrieval {
            message: format!("malformed search response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let documents: Vec<Document> = parsed.hits.hits.into_iter().map(|h| h.source).collect();
        debug!(index = %self.index_name, hits = documents.len(), "search completed");
        Ok(documents)
    }
}

#[async_trait]
impl PluginAdapter for ElasticsearchBackend {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        let url = format!("{}/{}", self.base_url, self.index_name);
        match self.client.head(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => Ok(
                HealthStatus::Unhealthy(format!("index `{}` not found", self.index_name)),
            ),
            Ok(resp) => Ok(HealthStatus::Degraded(format!(
                "cluster answered {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl SearchAdapter for ElasticsearchBackend {
    async fn lexical_search(&self, query: &LexicalQuery) -> Result<Vec<Document>, IntervueError> {
        self.search(&query::lexical_body(query, &self.category_field))
            .await
    }

    async fn vector_search(&self, query: &VectorQuery) -> Result<Vec<Document>, IntervueError> {
        self.search(&query::vector_body(
            query,
            &self.vector_field,
            &self.category_field,
        ))
        .await
    }

    /// Reads `_meta.embedding_model` from the index mapping.
    async fn index_embedding_model(&self) -> Result<Option<String>, IntervueError> {
        let url = format!("{}/{}/_mapping", self.base_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IntervueError::Retrieval {
                message: format!("failed to read index mapping: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(IntervueError::retrieval(format!(
                "mapping request returned {}",
                response.status()
            )));
        }

        let mapping: Value = response.json().await.map_err(|e| IntervueError::Retrieval {
            message: format!("malformed mapping response: {e}"),
            source: Some(Box::new(e)),
        })?;

        // Keyed by the concrete index name, which differs from an alias.
        Ok(mapping
            .as_object()
            .and_then(|indices| indices.values().next())
            .and_then(|index| index.pointer("/mappings/_meta/embedding_model"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
