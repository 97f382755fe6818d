// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration for the Intervue assistant.
//!
//! [`RagPipeline`] runs one request through the injected components:
//! - [`Retriever`](intervue_retrieval::Retriever) fetches category-scoped documents
//! - [`PromptBuilder`](intervue_context::PromptBuilder) renders the prompt
//! - [`ModelGateway`](intervue_provider::ModelGateway) generates the answer
//! - [`RelevanceEvaluator`] asks a judge model to score it
//! - [`CostEstimator`](intervue_cost::CostEstimator) prices the generation

pub mod evaluator;
pub mod pipeline;

pub use evaluator::{RelevanceEvaluator, judge_prompt, parse_verdict, strip_code_fence};
pub use pipeline::{AnswerRequest, RagPipeline};
