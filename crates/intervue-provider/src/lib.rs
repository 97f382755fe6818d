// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model providers for the Intervue pipeline.
//!
//! Both supported providers speak the OpenAI chat-completions protocol, so a
//! single [`ChatProvider`] implements [`ProviderAdapter`] for each of them.
//! [`ModelGateway`] dispatches `<provider>/<model>` identifiers to the
//! registered adapters and times each call.

pub mod client;
pub mod gateway;
pub mod types;

use async_trait::async_trait;
use intervue_config::IntervueConfig;
use intervue_core::IntervueError;
use intervue_core::traits::{PluginAdapter, ProviderAdapter};
use intervue_core::types::{
    AdapterType, HealthStatus, ProviderKind, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{info, warn};

pub use client::{ChatClient, RetryPolicy};
pub use gateway::{KNOWN_MODELS, ModelGateway};

use crate::types::{ChatRequest, ChatResponse, Usage};

/// Environment variable consulted when `openai.api_key` is unset.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// An OpenAI-compatible provider implementing [`ProviderAdapter`].
pub struct ChatProvider {
    kind: ProviderKind,
    client: ChatClient,
}

impl ChatProvider {
    pub fn new(kind: ProviderKind, client: ChatClient) -> Self {
        Self { kind, client }
    }

    /// Local Ollama server from `[ollama]`.
    pub fn ollama(config: &IntervueConfig) -> Result<Self, IntervueError> {
        let client = ChatClient::new(
            &config.ollama.base_url,
            &config.ollama.api_key,
            retry_policy(config),
        )?;
        info!(base_url = %config.ollama.base_url, "Ollama provider initialized");
        Ok(Self::new(ProviderKind::Ollama, client))
    }

    /// Hosted OpenAI from `[openai]`.
    ///
    /// # API Key Resolution
    /// 1. `config.openai.api_key` if set
    /// 2. `OPENAI_API_KEY` environment variable
    /// 3. Returns error if neither is available
    pub fn openai(config: &IntervueConfig) -> Result<Self, IntervueError> {
        let api_key = resolve_api_key(
            config.openai.api_key.as_deref(),
            std::env::var(OPENAI_API_KEY_ENV).ok(),
        )?;
        let client = ChatClient::new(&config.openai.base_url, &api_key, retry_policy(config))?;
        info!(base_url = %config.openai.base_url, "OpenAI provider initialized");
        Ok(Self::new(ProviderKind::OpenAi, client))
    }
}

fn retry_policy(config: &IntervueConfig) -> RetryPolicy {
    RetryPolicy {
        timeout: std::time::Duration::from_secs(config.provider.timeout_secs),
        max_retries: config.provider.max_retries,
        initial_backoff: std::time::Duration::from_millis(config.provider.initial_backoff_ms),
    }
}

fn resolve_api_key(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<String, IntervueError> {
    configured
        .map(str::to_string)
        .or(from_env)
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            IntervueError::Config(format!(
                "OpenAI API key not found: set openai.api_key or {OPENAI_API_KEY_ENV}"
            ))
        })
}

/// Converts the provider's usage block, keeping the total consistent with its parts.
fn normalize_usage(usage: Option<Usage>, model: &str) -> TokenUsage {
    let Some(usage) = usage else {
        warn!(model, "provider response carried no usage report");
        return TokenUsage::default();
    };

    let normalized = TokenUsage::new(usage.prompt_tokens, usage.completion_tokens);
    if let Some(reported) = usage.total_tokens {
        if reported != normalized.total_tokens {
            warn!(
                model,
                reported,
                computed = normalized.total_tokens,
                "provider total_tokens disagrees with prompt + completion"
            );
        }
    }
    normalized
}

fn into_provider_response(response: ChatResponse, requested_model: &str) -> ProviderResponse {
    let model = response
        .model
        .clone()
        .unwrap_or_else(|| requested_model.to_string());
    let usage = normalize_usage(response.usage, &model);
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    ProviderResponse {
        id: response.id,
        content,
        model,
        usage,
    }
}

#[async_trait]
impl PluginAdapter for ChatProvider {
    fn name(&self) -> &str {
        match self.kind {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        }
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    /// Lists models instead of completing, so no tokens are spent.
    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        Ok(match self.client.probe().await {
            Ok(status) if status.is_success() => HealthStatus::Healthy,
            Ok(status) => HealthStatus::Degraded(format!("model listing returned {status}")),
            Err(e) => HealthStatus::Unhealthy(format!("unreachable: {e}")),
        })
    }
}

#[async_trait]
impl ProviderAdapter for ChatProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, IntervueError> {
        let api_request = ChatRequest::single_user(&request.model, request.prompt);
        let response = self.client.complete(&api_request).await?;
        if response.choices.is_empty() {
            return Err(IntervueError::provider(format!(
                "{} returned no choices for model {}",
                self.name(),
                request.model
            )));
        }
        Ok(into_provider_response(response, &request.model))
    }
}
