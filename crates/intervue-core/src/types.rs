// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::IntervueError;

/// Upper bound on documents returned by a single retrieval.
pub const MAX_RESULTS: usize = 3;

/// Health status reported by an adapter's health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Search,
    Embedding,
    Provider,
}

// --- Knowledge base ---

/// Interview track a knowledge-base entry belongs to.
///
/// Serialized as the short index code (`de`, `mle`); displayed with the
/// human-readable role name used in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "de")]
    DataEngineer,
    #[serde(rename = "mle")]
    MachineLearningEngineer,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 2] = [Category::DataEngineer, Category::MachineLearningEngineer];

    /// Short code stored in the index's category field.
    pub fn code(&self) -> &'static str {
        match self {
            Category::DataEngineer => "de",
            Category::MachineLearningEngineer => "mle",
        }
    }

    /// Role name interpolated into the coach persona.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::DataEngineer => "data engineer",
            Category::MachineLearningEngineer => "machine learning engineer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Accepts either the index code or the display name, case-insensitively.
impl FromStr for Category {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.code() == needle || c.display_name() == needle)
            .ok_or(strum::ParseError::VariantNotFound)
    }
}

/// A knowledge-base entry as stored in the search index.
///
/// Read-only to the pipeline; produced by the ingestion job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "position")]
    pub category: Category,
    #[serde(
        rename = "question_text_vector",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub embedding: Option<Vec<f32>>,
}

/// Ingestion writes ids either as strings or as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

// --- Retrieval ---

/// How candidate documents are located.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Weighted multi-field keyword match.
    #[default]
    #[strum(to_string = "lexical", serialize = "text")]
    Lexical,
    /// Nearest-neighbour search over question/answer embeddings.
    #[strum(to_string = "vector")]
    Vector,
}

/// One caller question scoped to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub category: Category,
    pub mode: SearchMode,
}

/// Backend-neutral description of a lexical query.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalQuery {
    pub text: String,
    pub category: Category,
    pub size: usize,
}

/// Backend-neutral description of a k-nearest-neighbour query.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub category: Category,
    pub k: usize,
    pub num_candidates: usize,
}

/// Ranked documents for one query. Never holds more than [`MAX_RESULTS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    documents: Vec<Document>,
}

impl RetrievalResult {
    /// Wraps ranked documents, dropping anything past the cap.
    pub fn new(mut documents: Vec<Document>) -> Self {
        documents.truncate(MAX_RESULTS);
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// --- Embedding types ---

/// Input to an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed.
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of each vector.
    pub dimensions: usize,
}

// --- Prompt shaping ---

/// Answer length policy selected by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    #[default]
    #[strum(to_string = "short", serialize = "s")]
    Short,
    #[strum(to_string = "medium", serialize = "m")]
    Medium,
    #[strum(to_string = "long", serialize = "l")]
    Long,
}

impl LengthTier {
    /// Word ceiling stated in the prompt.
    pub fn word_limit(&self) -> u32 {
        match self {
            LengthTier::Short => 200,
            LengthTier::Medium => 500,
            LengthTier::Long => 1000,
        }
    }
}

// --- Model identification ---

/// Language-model providers the gateway can dispatch to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference server.
    #[strum(serialize = "ollama")]
    Ollama,
    /// Hosted OpenAI API.
    #[strum(serialize = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Local models run on caller-owned hardware and are never billed.
    pub fn is_local(&self) -> bool {
        matches!(self, ProviderKind::Ollama)
    }
}

/// A `<provider>/<model-name>` pair such as `openai/gpt-4o-mini`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelIdentifier {
    provider: ProviderKind,
    model_name: String,
}

impl ModelIdentifier {
    pub fn new(provider: ProviderKind, model_name: impl Into<String>) -> Self {
        Self {
            provider,
            model_name: model_name.into(),
        }
    }

    /// Parses `<provider>/<model-name>`. Anything else is unsupported.
    pub fn parse(raw: &str) -> Result<Self, IntervueError> {
        let unsupported = || IntervueError::UnsupportedModel {
            model: raw.to_string(),
        };

        let (prefix, model_name) = raw.trim().split_once('/').ok_or_else(unsupported)?;
        let provider = ProviderKind::from_str(prefix).map_err(|_| unsupported())?;
        if model_name.trim().is_empty() {
            return Err(unsupported());
        }

        Ok(Self::new(provider, model_name.trim()))
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Model name as the provider API expects it (prefix stripped).
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model_name)
    }
}

impl FromStr for ModelIdentifier {
    type Err = IntervueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModelIdentifier {
    type Error = IntervueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModelIdentifier> for String {
    fn from(value: ModelIdentifier) -> Self {
        value.to_string()
    }
}

// --- Provider types ---

/// Token accounting as reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Builds usage whose total is the sum of its parts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// A single-prompt completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Provider-side model name (no provider prefix).
    pub model: String,
    /// The full prompt, sent as one user message.
    pub prompt: String,
}

/// A completed response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: Option<String>,
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// Answer text plus accounting for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub answer: String,
    pub usage: TokenUsage,
    /// Wall-clock seconds between submission and receipt.
    pub response_time: f64,
}

// --- Evaluation ---

/// Judge verdict on how well an answer addresses its question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RelevanceLabel {
    Relevant,
    PartlyRelevant,
    NonRelevant,
    /// The judge output could not be interpreted.
    Unknown,
}

/// Label, rationale, and judge-call accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceVerdict {
    pub label: RelevanceLabel,
    pub explanation: String,
    pub usage: TokenUsage,
}

// --- Result ---

/// Everything the storage collaborator persists for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub answer: String,
    pub response_time: f64,
    pub relevance: RelevanceLabel,
    pub relevance_explanation: String,
    pub model_used: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub eval_prompt_tokens: u32,
    pub eval_completion_tokens: u32,
    pub eval_total_tokens: u32,
    pub cost: f64,
}

impl AnswerRecord {
    pub fn new(
        model: &ModelIdentifier,
        generation: GenerationResult,
        verdict: RelevanceVerdict,
        cost: f64,
    ) -> Self {
        Self {
            answer: generation.answer,
            response_time: generation.response_time,
            relevance: verdict.label,
            relevance_explanation: verdict.explanation,
            model_used: model.to_string(),
            prompt_tokens: generation.usage.prompt_tokens,
            completion_tokens: generation.usage.completion_tokens,
            total_tokens: generation.usage.total_tokens,
            eval_prompt_tokens: verdict.usage.prompt_tokens,
            eval_completion_tokens: verdict.usage.completion_tokens,
            eval_total_tokens: verdict.usage.total_tokens,
            cost,
        }
    }
}
