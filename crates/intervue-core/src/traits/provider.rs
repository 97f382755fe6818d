// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for language-model backends (Ollama, OpenAI).

use async_trait::async_trait;

use crate::error::IntervueError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a single language-model provider.
///
/// One prompt in, one completion plus the provider-reported usage out.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest)
    -> Result<ProviderResponse, IntervueError>;
}
