// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run download of the query embedding model.

use std::path::{Path, PathBuf};

use intervue_core::error::IntervueError;
use tracing::info;

const HF_BASE: &str = "https://huggingface.co/sentence-transformers";

/// Resolves and, when missing, fetches the ONNX export of a sentence-transformer.
pub struct ModelManager {
    data_dir: PathBuf,
    model_name: String,
}

impl ModelManager {
    pub fn new(data_dir: PathBuf, model_name: impl Into<String>) -> Self {
        Self {
            data_dir,
            model_name: model_name.into(),
        }
    }

    /// Manager rooted at the platform data directory (`~/.local/share/intervue`).
    pub fn with_default_dir(model_name: impl Into<String>) -> Result<Self, IntervueError> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| IntervueError::Config("no platform data directory".to_string()))?
            .join("intervue");
        Ok(Self::new(data_dir, model_name))
    }

    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("models").join(&self.model_name)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Returns the model path, downloading model and tokenizer on first use.
    pub async fn ensure_model(&self) -> Result<PathBuf, IntervueError> {
        if self.is_model_available() {
            return Ok(self.model_path());
        }

        let model_dir = self.model_dir();
        tokio::fs::create_dir_all(&model_dir).await.map_err(|e| {
            IntervueError::Embedding(format!("failed to create {}: {e}", model_dir.display()))
        })?;

        let repo = format!("{HF_BASE}/{}/resolve/main", self.model_name);
        let files = [
            ("model.onnx", format!("{repo}/onnx/model.onnx")),
            ("tokenizer.json", format!("{repo}/tokenizer.json")),
        ];

        for (filename, url) in &files {
            let dest = model_dir.join(filename);
            if dest.exists() {
                continue;
            }

            info!(model = %self.model_name, file = filename, "downloading embedding model file");
            match download_file(url, &dest).await {
                Ok(size) => info!(file = filename, bytes = size, "download complete"),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&dest).await;
                    return Err(e);
                }
            }
        }

        Ok(self.model_path())
    }
}

async fn download_file(url: &str, dest: &Path) -> Result<usize, IntervueError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| IntervueError::Embedding(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(IntervueError::Embedding(format!(
            "download of {url} failed with status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| IntervueError::Embedding(format!("failed to read {url}: {e}")))?;

    tokio::fs::write(dest, &bytes)
        .await
        .map_err(|e| IntervueError::Embedding(format!("failed to write {}: {e}", dest.display())))?;

    Ok(bytes.len())
}
