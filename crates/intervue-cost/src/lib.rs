// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost estimation for generated answers.
//!
//! Maps a model identifier and the provider-reported token usage to an
//! estimated USD amount. Unpriced models cost zero.

pub mod pricing;

use intervue_core::{ModelIdentifier, TokenUsage};
use tracing::debug;

pub use pricing::{ModelPricing, calculate_cost, get_pricing};

/// Stateless estimator over the static pricing table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl CostEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimated USD cost; always finite and non-negative.
    pub fn estimate(&self, model: &ModelIdentifier, usage: &TokenUsage) -> f64 {
        match get_pricing(model) {
            Some(pricing) => {
                let cost = calculate_cost(usage, &pricing);
                debug!(model = %model, cost, "cost estimated");
                cost
            }
            None => {
                debug!(model = %model, "no pricing for model, cost is zero");
                0.0
            }
        }
    }
}
