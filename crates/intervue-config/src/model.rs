// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration structs with strict key checking.
//!
//! Every struct uses `deny_unknown_fields` so typos surface as diagnostics
//! instead of silently falling back to defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Intervue pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervueConfig {
    /// Search backend settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Query embedding model settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Local inference (Ollama) provider settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Hosted OpenAI provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Transport settings shared by all providers.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Answer self-evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for IntervueConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            embedding: EmbeddingConfig::default(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
            provider: ProviderConfig::default(),
            evaluation: EvaluationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Elasticsearch-compatible backend holding the question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Base URL of the search cluster.
    #[serde(default = "default_search_url")]
    pub url: String,

    /// Index the ingestion job writes to.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Keyword field holding the category code.
    #[serde(default = "default_category_field")]
    pub category_field: String,

    /// Dense-vector field built from question and answer text.
    #[serde(default = "default_vector_field")]
    pub vector_field: String,

    /// Candidate pool size for approximate kNN.
    #[serde(default = "default_num_candidates")]
    pub num_candidates: usize,

    /// Documents returned per query (at most 3).
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// HTTP timeout for search requests.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_search_url(),
            index_name: default_index_name(),
            category_field: default_category_field(),
            vector_field: default_vector_field(),
            num_candidates: default_num_candidates(),
            result_limit: default_result_limit(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "http://elasticsearch:9200".to_string()
}

fn default_index_name() -> String {
    "interview-questions".to_string()
}

fn default_category_field() -> String {
    "position".to_string()
}

fn default_vector_field() -> String {
    "question_text_vector".to_string()
}

fn default_num_candidates() -> usize {
    10_000
}

fn default_result_limit() -> usize {
    3
}

fn default_search_timeout_secs() -> u64 {
    30
}

/// Sentence-embedding model used for vector search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Model identifier; must match the model used at ingestion time.
    #[serde(default = "default_embedding_model")]
    pub model_name: String,

    /// Path to the ONNX model file. Defaults to the data directory cache.
    #[serde(default)]
    pub model_path: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_embedding_model(),
            model_path: None,
        }
    }
}

fn default_embedding_model() -> String {
    "multi-qa-MiniLM-L6-cos-v1".to_string()
}

/// Local Ollama server exposing the OpenAI-compatible API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Placeholder credential; Ollama ignores it but the protocol requires one.
    #[serde(default = "default_ollama_key")]
    pub api_key: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            api_key: default_ollama_key(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://ollama:11434/v1/".to_string()
}

fn default_ollama_key() -> String {
    "ollama".to_string()
}

/// Hosted OpenAI API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            api_key: None,
        }
    }
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1/".to_string()
}

/// Timeout and retry policy for provider calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent one.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_provider_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

fn default_provider_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

/// LLM-as-judge relevance scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// `<provider>/<model>` used to judge answers.
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            judge_model: default_judge_model(),
        }
    }
}

fn default_judge_model() -> String {
    "openai/gpt-4o-mini".to_string()
}
