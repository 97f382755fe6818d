// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX query embedder for the sentence-transformer used at ingestion time.
//!
//! Runs `multi-qa-MiniLM-L6-cos-v1` on CPU and produces 384-dimensional,
//! L2-normalized vectors comparable with the indexed document vectors.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use intervue_core::error::IntervueError;
use intervue_core::traits::{EmbeddingAdapter, PluginAdapter};
use intervue_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// Output width of the MiniLM-L6 family.
pub const EMBEDDING_DIM: usize = 384;

/// Sentence embedder backed by an ONNX Runtime session.
pub struct OnnxEmbedder {
    /// ONNX Runtime session (not Send, wrapped in Mutex for safety).
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    model_name: String,
}

// Safety: Session is accessed through Mutex which provides synchronization.
// The tokenizer is thread-safe for encoding operations.
unsafe impl Send for OnnxEmbedder {}
unsafe impl Sync for OnnxEmbedder {}

impl OnnxEmbedder {
    /// Loads `model_path` and the `tokenizer.json` stored next to it.
    pub fn new(model_path: &Path, model_name: impl Into<String>) -> Result<Self, IntervueError> {
        let tokenizer_path = model_path
            .parent()
            .ok_or_else(|| {
                IntervueError::Embedding(format!("invalid model path {}", model_path.display()))
            })?
            .join("tokenizer.json");

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            IntervueError::Embedding(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .map_err(|e| IntervueError::Embedding(format!("failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| IntervueError::Embedding(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| IntervueError::Embedding(format!("failed to set thread count: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                IntervueError::Embedding(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            model_name: model_name.into(),
        })
    }

    /// Embed one query string.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, IntervueError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| IntervueError::Embedding(format!("tokenization failed: {e}")))?;

        let widen = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();
        let input_ids = widen(encoding.get_ids());
        let attention_mask = widen(encoding.get_attention_mask());
        let token_type_ids = widen(encoding.get_type_ids());
        let seq_len = input_ids.len();

        let to_matrix = |name: &str, values: Vec<i64>| {
            Array2::from_shape_vec((1, seq_len), values).map_err(|e| {
                IntervueError::Embedding(format!("failed to shape {name} tensor: {e}"))
            })
        };
        let input_ids_array = to_matrix("input_ids", input_ids)?;
        let attention_mask_array = to_matrix("attention_mask", attention_mask.clone())?;
        let token_type_ids_array = to_matrix("token_type_ids", token_type_ids)?;

        let input_ids_tensor = TensorRef::from_array_view(&input_ids_array)
            .map_err(|e| IntervueError::Embedding(format!("input_ids view failed: {e}")))?;
        let attention_mask_tensor = TensorRef::from_array_view(&attention_mask_array)
            .map_err(|e| IntervueError::Embedding(format!("attention_mask view failed: {e}")))?;
        let token_type_ids_tensor = TensorRef::from_array_view(&token_type_ids_array)
            .map_err(|e| IntervueError::Embedding(format!("token_type_ids view failed: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| IntervueError::Embedding(format!("ONNX session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])
            .map_err(|e| IntervueError::Embedding(format!("ONNX inference failed: {e}")))?;

        // last_hidden_state: [1, seq_len, hidden]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| IntervueError::Embedding(format!("failed to read model output: {e}")))?;

        let hidden_size = shape[shape.len() - 1] as usize;
        let pooled = mean_pool_with_attention(data, &attention_mask, seq_len, hidden_size);
        check_width(l2_normalize(&pooled))
    }
}

/// The index stores [`EMBEDDING_DIM`]-wide vectors; anything else cannot be queried.
fn check_width(vector: Vec<f32>) -> Result<Vec<f32>, IntervueError> {
    if vector.len() != EMBEDDING_DIM {
        return Err(IntervueError::Embedding(format!(
            "model produced {}-dimensional vectors, index expects {EMBEDDING_DIM}",
            vector.len()
        )));
    }
    Ok(vector)
}

/// Average token vectors, ignoring padding positions.
fn mean_pool_with_attention(
    embeddings: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (token, _) in attention_mask
        .iter()
        .enumerate()
        .take(seq_len)
        .filter(|(_, m)| **m > 0)
    {
        let row = &embeddings[token * hidden_size..(token + 1) * hidden_size];
        for (acc, v) in sum.iter_mut().zip(row) {
            *acc += v;
        }
        count += 1.0;
    }

    if count > 0.0 {
        sum.iter_mut().for_each(|v| *v /= count);
    }
    sum
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for OnnxEmbedder {
    fn name(&self) -> &str {
        "onnx-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        match self.session.lock() {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("session lock poisoned: {e}"))),
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, IntervueError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.embed_text(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: EMBEDDING_DIM,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_normalize_general_vector() {
        let n = l2_normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < 0.001);
        assert!((n[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn l2_normalize_zero_vector() {
        assert_eq!(l2_normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn mean_pool_skips_padding() {
        let embeddings = vec![
            1.0, 2.0, 3.0, // real
            9.0, 9.0, 9.0, // padding
        ];
        let result = mean_pool_with_attention(&embeddings, &[1, 0], 2, 3);
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mean_pool_averages_real_tokens() {
        let embeddings = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = mean_pool_with_attention(&embeddings, &[1, 1, 1], 3, 2);
        assert!((result[0] - 3.0).abs() < f32::EPSILON);
        assert!((result[1] - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn foreign_vector_width_is_rejected() {
        assert_eq!(check_width(vec![0.0; EMBEDDING_DIM]).unwrap().len(), EMBEDDING_DIM);
        let err = check_width(vec![0.0; 768]).unwrap_err();
        assert!(matches!(err, IntervueError::Embedding(ref msg) if msg.contains("768")));
    }

    #[test]
    fn missing_model_files_are_embedding_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxEmbedder::new(&dir.path().join("model.onnx"), "multi-qa-MiniLM-L6-cos-v1");
        assert!(matches!(result, Err(IntervueError::Embedding(_))));
    }
}
