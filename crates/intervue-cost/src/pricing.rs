// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost calculation.
//!
//! Rates are USD per 1,000 tokens.
//!
//! gpt-3.5-turbo:        prompt=$0.0015, completion=$0.002
//! gpt-4o / gpt-4o-mini: prompt=$0.03,   completion=$0.06

use intervue_core::{ModelIdentifier, ProviderKind, TokenUsage};

/// Per-model pricing in USD per thousand tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub prompt_per_ktok: f64,
    pub completion_per_ktok: f64,
}

const GPT_35_TURBO: ModelPricing = ModelPricing {
    prompt_per_ktok: 0.0015,
    completion_per_ktok: 0.002,
};

const GPT_4O: ModelPricing = ModelPricing {
    prompt_per_ktok: 0.03,
    completion_per_ktok: 0.06,
};

/// Look up pricing for a model. `None` means the model is not billed.
///
/// Local models are never billed. Hosted models match on the exact name;
/// unknown hosted models are treated as unpriced rather than guessed.
pub fn get_pricing(model: &ModelIdentifier) -> Option<ModelPricing> {
    match model.provider() {
        ProviderKind::Ollama => None,
        ProviderKind::OpenAi => match model.model_name() {
            "gpt-3.5-turbo" => Some(GPT_35_TURBO),
            "gpt-4o" | "gpt-4o-mini" => Some(GPT_4O),
            _ => None,
        },
    }
}

/// Formula: tokens / 1000 * price for prompt and completion.
pub fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let prompt = (usage.prompt_tokens as f64 / 1000.0) * pricing.prompt_per_ktok;
    let completion = (usage.completion_tokens as f64 / 1000.0) * pricing.completion_per_ktok;
    prompt + completion
}
