// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intervue ask` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use intervue_agent::{AnswerRequest, RagPipeline, RelevanceEvaluator};
use intervue_config::IntervueConfig;
use intervue_core::{IntervueError, SearchMode};
use intervue_provider::ModelGateway;
use intervue_retrieval::{ElasticsearchBackend, ModelManager, OnnxEmbedder, Retriever};
use tracing::info;

use crate::AskArgs;

/// Run one question through the pipeline and print the record as JSON.
pub async fn run_ask(config: &IntervueConfig, args: AskArgs) -> Result<(), IntervueError> {
    let conversation_id = uuid::Uuid::new_v4().to_string();
    info!(%conversation_id, model = %args.model, mode = %args.mode, "answering question");

    let backend = Arc::new(ElasticsearchBackend::new(&config.search)?);
    let mut retriever = Retriever::from_config(backend, &config.search);
    // The ONNX model is only loaded when a vector query needs it.
    if args.mode == SearchMode::Vector {
        retriever = retriever.with_embedder(Arc::new(load_embedder(config).await?));
    }

    let gateway = Arc::new(ModelGateway::from_config(config)?);
    let evaluator = RelevanceEvaluator::from_config(gateway.clone(), &config.evaluation)?;
    let pipeline = RagPipeline::new(retriever, gateway, evaluator);

    let request = AnswerRequest {
        question: args.question,
        category: args.category,
        model: args.model,
        mode: args.mode,
        tier: args.length,
    };
    let record = pipeline.answer(&request).await?;

    let mut output = serde_json::to_value(&record)
        .map_err(|e| IntervueError::Internal(format!("failed to serialize answer: {e}")))?;
    output["conversation_id"] = serde_json::Value::String(conversation_id);
    output["question"] = serde_json::Value::String(request.question);
    output["category"] = serde_json::Value::String(request.category.code().to_string());

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| IntervueError::Internal(format!("failed to serialize answer: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Resolve the model file, downloading it on first use, and open a session.
pub async fn load_embedder(config: &IntervueConfig) -> Result<OnnxEmbedder, IntervueError> {
    let model_name = &config.embedding.model_name;
    let model_path = match &config.embedding.model_path {
        Some(path) => PathBuf::from(path),
        None => {
            ModelManager::with_default_dir(model_name.as_str())?
                .ensure_model()
                .await?
        }
    };
    OnnxEmbedder::new(&model_path, model_name.as_str())
}
