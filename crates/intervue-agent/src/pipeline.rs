// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The retrieve → generate → evaluate flow for one question.

use std::sync::Arc;

use intervue_context::PromptBuilder;
use intervue_core::IntervueError;
use intervue_core::types::{
    AnswerRecord, Category, LengthTier, ModelIdentifier, SearchMode, SearchQuery,
};
use intervue_cost::CostEstimator;
use intervue_provider::ModelGateway;
use intervue_retrieval::Retriever;
use tracing::{debug, info};

use crate::evaluator::RelevanceEvaluator;

/// One caller request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRequest {
    pub question: String,
    pub category: Category,
    pub model: ModelIdentifier,
    pub mode: SearchMode,
    pub tier: LengthTier,
}

/// Owns the injected components and runs them in sequence.
pub struct RagPipeline {
    retriever: Retriever,
    prompt_builder: PromptBuilder,
    gateway: Arc<ModelGateway>,
    evaluator: RelevanceEvaluator,
    cost: CostEstimator,
}

impl RagPipeline {
    pub fn new(
        retriever: Retriever,
        gateway: Arc<ModelGateway>,
        evaluator: RelevanceEvaluator,
    ) -> Self {
        Self {
            retriever,
            prompt_builder: PromptBuilder::new(),
            gateway,
            evaluator,
            cost: CostEstimator::new(),
        }
    }

    /// Answer one question and score the answer.
    ///
    /// Cost covers the generation call only; judge tokens are reported
    /// separately in the record.
    pub async fn answer(&self, request: &AnswerRequest) -> Result<AnswerRecord, IntervueError> {
        // Reject both models before touching the search backend.
        for model in [&request.model, self.evaluator.judge_model()] {
            if !self.gateway.is_registered(model.provider()) {
                return Err(IntervueError::UnsupportedModel {
                    model: model.to_string(),
                });
            }
        }

        let retrieved = self
            .retriever
            .retrieve(&SearchQuery {
                text: request.question.clone(),
                category: request.category,
                mode: request.mode,
            })
            .await?;

        let prompt = self.prompt_builder.build(
            &request.question,
            request.category,
            retrieved.documents(),
            request.tier,
        );
        debug!(%prompt, "generation prompt");

        let generation = self.gateway.generate(&prompt, &request.model).await?;
        let verdict = self
            .evaluator
            .evaluate(&request.question, &generation.answer)
            .await?;
        let cost = self.cost.estimate(&request.model, &generation.usage);

        info!(
            model = %request.model,
            category = %request.category,
            mode = %request.mode,
            documents = retrieved.len(),
            relevance = %verdict.label,
            cost,
            "question answered"
        );

        Ok(AnswerRecord::new(&request.model, generation, verdict, cost))
    }
}
