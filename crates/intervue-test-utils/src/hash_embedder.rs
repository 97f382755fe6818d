// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedder for tests that exercise vector mode.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use intervue_core::traits::{EmbeddingAdapter, PluginAdapter};
use intervue_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use intervue_core::IntervueError;

/// Hashes character trigrams into a fixed-width, L2-normalized vector.
pub struct HashEmbedder {
    dimensions: usize,
    model_name: String,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_name: "multi-qa-MiniLM-L6-cos-v1".to_string(),
        }
    }

    /// Pretend to be a different model (for tag-mismatch tests).
    pub fn with_model_name(mut self, name: &str) -> Self {
        self.model_name = name.to_string();
        self
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        for gram in chars.windows(3) {
            let mut hasher = DefaultHasher::new();
            gram.hash(&mut hasher);
            v[(hasher.finish() as usize) % self.dimensions] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl PluginAdapter for HashEmbedder {
    fn name(&self) -> &str {
        "hash-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, IntervueError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for HashEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, IntervueError> {
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.vector(t)).collect(),
            dimensions: self.dimensions,
        })
    }
}
