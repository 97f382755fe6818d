// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes `<provider>/<model>` identifiers to registered provider adapters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use intervue_config::IntervueConfig;
use intervue_core::IntervueError;
use intervue_core::traits::ProviderAdapter;
use intervue_core::types::{GenerationResult, ModelIdentifier, ProviderKind, ProviderRequest};
use tracing::{debug, info, warn};

use crate::ChatProvider;

/// Model identifiers offered to callers, in menu order.
pub const KNOWN_MODELS: &[&str] = &[
    "ollama/phi3.5",
    "ollama/phi3",
    "openai/gpt-3.5-turbo",
    "openai/gpt-4o",
    "openai/gpt-4o-mini",
];

/// Registration table from provider tag to adapter.
#[derive(Default, Clone)]
pub struct ModelGateway {
    providers: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ModelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers Ollama always and OpenAI when an API key is available.
    pub fn from_config(config: &IntervueConfig) -> Result<Self, IntervueError> {
        let mut gateway = Self::new();
        gateway.register(ProviderKind::Ollama, Arc::new(ChatProvider::ollama(config)?));

        match ChatProvider::openai(config) {
            Ok(provider) => gateway.register(ProviderKind::OpenAi, Arc::new(provider)),
            Err(IntervueError::Config(reason)) => {
                warn!(%reason, "OpenAI provider disabled");
            }
            Err(e) => return Err(e),
        }

        Ok(gateway)
    }

    /// Adds or replaces the adapter serving `kind`.
    pub fn register(&mut self, kind: ProviderKind, provider: Arc<dyn ProviderAdapter>) {
        self.providers.insert(kind, provider);
    }

    pub fn is_registered(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Registered adapters, for health reporting.
    pub fn providers(&self) -> impl Iterator<Item = (ProviderKind, &Arc<dyn ProviderAdapter>)> {
        self.providers.iter().map(|(k, v)| (*k, v))
    }

    /// Sends `prompt` to the provider named by `model` and times the call.
    pub async fn generate(
        &self,
        prompt: &str,
        model: &ModelIdentifier,
    ) -> Result<GenerationResult, IntervueError> {
        let provider = self.providers.get(&model.provider()).ok_or_else(|| {
            IntervueError::UnsupportedModel {
                model: model.to_string(),
            }
        })?;

        let start = Instant::now();
        let response = provider
            .complete(ProviderRequest {
                model: model.model_name().to_string(),
                prompt: prompt.to_string(),
            })
            .await?;
        let response_time = start.elapsed().as_secs_f64();

        info!(
            model = %model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            response_time,
            "generation complete"
        );
        debug!(answer_chars = response.content.len(), "generation content received");

        Ok(GenerationResult {
            answer: response.content,
            usage: response.usage,
            response_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervue_core::TokenUsage;
    use intervue_test_utils::MockProvider;

    #[tokio::test]
    async fn dispatches_by_provider_prefix() {
        let ollama = Arc::new(MockProvider::with_responses(vec!["local".into()]));
        let openai = Arc::new(MockProvider::with_responses(vec!["hosted".into()]));

        let mut gateway = ModelGateway::new();
        gateway.register(ProviderKind::Ollama, ollama.clone());
        gateway.register(ProviderKind::OpenAi, openai.clone());

        let model = ModelIdentifier::parse("openai/gpt-4o").unwrap();
        let result = gateway.generate("Explain joins", &model).await.unwrap();
        assert_eq!(result.answer, "hosted");
        assert_eq!(result.usage, TokenUsage::new(10, 20));
        assert!(result.response_time >= 0.0);

        let sent = openai.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "gpt-4o");
        assert_eq!(sent[0].prompt, "Explain joins");
        assert!(ollama.requests().await.is_empty());
    }

    #[tokio::test]
    async fn unregistered_provider_is_unsupported() {
        let mut gateway = ModelGateway::new();
        gateway.register(ProviderKind::Ollama, Arc::new(MockProvider::new()));

        let model = ModelIdentifier::parse("openai/gpt-4o-mini").unwrap();
        let err = gateway.generate("q", &model).await.unwrap_err();
        assert!(
            matches!(err, IntervueError::UnsupportedModel { ref model } if model == "openai/gpt-4o-mini")
        );
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(MockProvider::new());
        provider.add_failure("model not loaded").await;
        let mut gateway = ModelGateway::new();
        gateway.register(ProviderKind::Ollama, provider);

        let model = ModelIdentifier::parse("ollama/phi3").unwrap();
        let err = gateway.generate("q", &model).await.unwrap_err();
        assert!(matches!(err, IntervueError::Provider { .. }));
    }

    #[test]
    fn known_models_all_parse() {
        for raw in KNOWN_MODELS {
            assert!(ModelIdentifier::parse(raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn from_config_without_openai_key_registers_only_ollama() {
        let mut config = IntervueConfig::default();
        config.openai.api_key = None;
        // Only meaningful when the test environment carries no key.
        if std::env::var(crate::OPENAI_API_KEY_ENV).is_err() {
            let gateway = ModelGateway::from_config(&config).unwrap();
            assert!(gateway.is_registered(ProviderKind::Ollama));
            assert!(!gateway.is_registered(ProviderKind::OpenAi));
        }
    }

    #[test]
    fn from_config_with_openai_key_registers_both() {
        let mut config = IntervueConfig::default();
        config.openai.api_key = Some("sk-test".into());
        let gateway = ModelGateway::from_config(&config).unwrap();
        assert!(gateway.is_registered(ProviderKind::Ollama));
        assert!(gateway.is_registered(ProviderKind::OpenAi));
    }
}
