// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-as-judge relevance scoring for generated answers.
//!
//! The judge is asked for a bare JSON object. Models do not always comply, so
//! parsing runs in stages: strip a surrounding code fence, decode strictly,
//! then fall back to label substrings, and finally give up with
//! [`RelevanceLabel::Unknown`]. Malformed judge output is never an error.

use std::sync::Arc;

use intervue_config::model::EvaluationConfig;
use intervue_core::IntervueError;
use intervue_core::types::{ModelIdentifier, RelevanceLabel, RelevanceVerdict};
use intervue_provider::ModelGateway;
use serde::Deserialize;
use tracing::{debug, warn};

/// Checked in order against unparseable output. Longer labels come first so
/// that `NON_RELEVANT` and `PARTLY_RELEVANT` are not shadowed by their
/// `RELEVANT` suffix.
const FALLBACK_PREDICATES: &[(&str, RelevanceLabel)] = &[
    ("NON_RELEVANT", RelevanceLabel::NonRelevant),
    ("PARTLY_RELEVANT", RelevanceLabel::PartlyRelevant),
    ("RELEVANT", RelevanceLabel::Relevant),
];

const UNPARSEABLE_PREFIX: &str = "Failed to parse evaluation.";

/// Scores answers by asking a judge model through the gateway.
pub struct RelevanceEvaluator {
    gateway: Arc<ModelGateway>,
    judge_model: ModelIdentifier,
}

impl RelevanceEvaluator {
    pub fn new(gateway: Arc<ModelGateway>, judge_model: ModelIdentifier) -> Self {
        Self {
            gateway,
            judge_model,
        }
    }

    pub fn from_config(
        gateway: Arc<ModelGateway>,
        config: &EvaluationConfig,
    ) -> Result<Self, IntervueError> {
        let judge_model = ModelIdentifier::parse(&config.judge_model)?;
        Ok(Self::new(gateway, judge_model))
    }

    pub fn judge_model(&self) -> &ModelIdentifier {
        &self.judge_model
    }

    /// Ask the judge how well `answer` addresses `question`.
    ///
    /// Only a failed judge call is an error; anything the judge says is
    /// turned into a verdict.
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<RelevanceVerdict, IntervueError> {
        let prompt = judge_prompt(question, answer);
        let generation = self.gateway.generate(&prompt, &self.judge_model).await?;
        debug!(raw = %generation.answer, "judge output received");

        let (label, explanation) = parse_verdict(&generation.answer);
        Ok(RelevanceVerdict {
            label,
            explanation,
            usage: generation.usage,
        })
    }
}

/// Render the judge instruction for one question/answer pair.
pub fn judge_prompt(question: &str, answer: &str) -> String {
    format!(
        "You are an expert evaluator for a Retrieval-Augmented Generation (RAG) system.\n\
         Your task is to analyze the relevance of the generated answer to the given question.\n\
         Based on the relevance of the generated answer, you will classify it\n\
         as \"NON_RELEVANT\", \"PARTLY_RELEVANT\", or \"RELEVANT\".\n\
         \n\
         Here is the data for evaluation:\n\
         \n\
         Question: {question}\n\
         Generated Answer: {answer}\n\
         \n\
         Please analyze the content and context of the generated answer in relation to the question\n\
         and provide your evaluation in parsable JSON without using code blocks:\n\
         \n\
         {{\n\
         \x20 \"Relevance\": \"NON_RELEVANT\" | \"PARTLY_RELEVANT\" | \"RELEVANT\",\n\
         \x20 \"Explanation\": \"[Provide a brief explanation for your evaluation]\"\n\
         }}"
    )
}

#[derive(Deserialize)]
struct JudgeVerdict {
    #[serde(rename = "Relevance")]
    relevance: JudgeLabel,
    #[serde(rename = "Explanation")]
    explanation: String,
}

/// The labels a judge may emit. `UNKNOWN` is ours, not the judge's.
#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum JudgeLabel {
    Relevant,
    PartlyRelevant,
    NonRelevant,
}

impl From<JudgeLabel> for RelevanceLabel {
    fn from(label: JudgeLabel) -> Self {
        match label {
            JudgeLabel::Relevant => RelevanceLabel::Relevant,
            JudgeLabel::PartlyRelevant => RelevanceLabel::PartlyRelevant,
            JudgeLabel::NonRelevant => RelevanceLabel::NonRelevant,
        }
    }
}

/// Interpret raw judge output as a label and explanation.
pub fn parse_verdict(raw: &str) -> (RelevanceLabel, String) {
    let body = strip_code_fence(raw);

    match serde_json::from_str::<JudgeVerdict>(body) {
        Ok(verdict) => (verdict.relevance.into(), verdict.explanation),
        Err(e) => {
            warn!(error = %e, "judge output is not a valid verdict, falling back to label search");
            match FALLBACK_PREDICATES
                .iter()
                .find(|(needle, _)| body.contains(needle))
            {
                Some((_, label)) => (*label, body.to_string()),
                None => {
                    warn!("no relevance label found in judge output");
                    (RelevanceLabel::Unknown, format!("{UNPARSEABLE_PREFIX} {body}"))
                }
            }
        }
    }
}

/// Remove a surrounding ``` fence, with or without a language tag.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.split_once('\n') {
        Some((tag, body)) if is_fence_tag(tag) => body,
        _ => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn is_fence_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
