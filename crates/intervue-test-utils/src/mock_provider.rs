// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language-model provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use intervue_core::IntervueError;
use intervue_core::traits::{PluginAdapter, ProviderAdapter};
use intervue_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

enum Scripted {
    Text(String),
    Failure(String),
}

/// A provider that replays queued responses in FIFO order.
///
/// When the queue is empty, "mock response" is returned. Every request is
/// recorded so tests can inspect the prompts that were sent.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    usage: TokenUsage,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Text).collect(),
            )),
            requests: Arc::new(Mutex::new(Vec::new())),
            usage: TokenUsage::new(10, 20),
        }
    }

    /// Report this usage on every completion.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(Scripted::Text(text));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: &str) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, IntervueError> {
        self.requests.lock().await.push(request.clone());

        let next = self.responses.lock().await.pop_front();
        let content = match next {
            Some(Scripted::Text(text)) => text,
            Some(Scripted::Failure(message)) => return Err(IntervueError::provider(message)),
            None => "mock response".to_string(),
        };

        Ok(ProviderResponse {
            id: Some(format!("mock-resp-{}", uuid::Uuid::new_v4())),
            content,
            model: request.model,
            usage: self.usage,
        })
    }
}
