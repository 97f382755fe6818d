// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intervue doctor` command implementation.
//!
//! Checks the environment the pipeline depends on: the search index, the
//! local embedding model and its agreement with the index, and each
//! configured model provider.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use intervue_config::IntervueConfig;
use intervue_core::{HealthStatus, IntervueError, PluginAdapter, ProviderKind};
use intervue_provider::ModelGateway;
use intervue_retrieval::{ElasticsearchBackend, EmbeddingCheck, ModelManager, OnnxEmbedder, Retriever};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `intervue doctor` command. `--plain` disables colored output.
pub async fn run_doctor(config: &IntervueConfig, plain: bool) -> Result<(), IntervueError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let mut results = vec![CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        "valid",
        Instant::now(),
    )];

    let backend = ElasticsearchBackend::new(&config.search).map(Arc::new);
    match &backend {
        Ok(backend) => results.push(check_search(backend.as_ref()).await),
        Err(e) => results.push(CheckResult::new(
            "Search backend",
            CheckStatus::Fail,
            e.to_string(),
            Instant::now(),
        )),
    }

    let (embedding_result, embedder) = check_embedding_model(config);
    results.push(embedding_result);
    if let (Ok(backend), Some(embedder)) = (&backend, embedder) {
        let retriever = Retriever::new(backend.clone()).with_embedder(Arc::new(embedder));
        results.push(check_index_tag(&retriever).await);
    }

    results.extend(check_providers(config).await);

    print_report(&results, use_color);
    Ok(())
}

fn print_report(results: &[CheckResult], use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  intervue doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in results {
        let duration_ms = result.duration.as_millis();
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        let (symbol, message) = if use_color {
            match result.status {
                CheckStatus::Pass => ("✓".green().to_string(), result.message.clone()),
                CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
                CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
            }
        } else {
            let tag = match result.status {
                CheckStatus::Pass => "[OK]  ",
                CheckStatus::Warn => "[WARN]",
                CheckStatus::Fail => "[FAIL]",
            };
            (tag.to_string(), result.message.clone())
        };
        println!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name);
    }

    println!();
    match issues {
        0 => println!("  All checks passed."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
    println!();
}

async fn check_search(backend: &ElasticsearchBackend) -> CheckResult {
    let start = Instant::now();
    let name = "Search backend";
    match backend.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            name,
            CheckStatus::Pass,
            format!("index `{}` reachable", backend.index_name()),
            start,
        ),
        Ok(HealthStatus::Degraded(msg)) => CheckResult::new(name, CheckStatus::Warn, msg, start),
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new(name, CheckStatus::Fail, msg, start),
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

/// Opens the local embedder if its files are present. Never downloads.
fn check_embedding_model(config: &IntervueConfig) -> (CheckResult, Option<OnnxEmbedder>) {
    let start = Instant::now();
    let name = "Embedding model";
    let model_name = &config.embedding.model_name;

    let model_path = match &config.embedding.model_path {
        Some(path) => PathBuf::from(path),
        None => match ModelManager::with_default_dir(model_name.as_str()) {
            Ok(manager) if manager.is_model_available() => manager.model_path(),
            Ok(_) => {
                return (
                    CheckResult::new(
                        name,
                        CheckStatus::Warn,
                        format!("{model_name} not downloaded; vector mode fetches it on first use"),
                        start,
                    ),
                    None,
                );
            }
            Err(e) => return (CheckResult::new(name, CheckStatus::Fail, e.to_string(), start), None),
        },
    };

    match OnnxEmbedder::new(&model_path, model_name.as_str()) {
        Ok(embedder) => (
            CheckResult::new(name, CheckStatus::Pass, format!("{model_name} loaded"), start),
            Some(embedder),
        ),
        Err(e) => (CheckResult::new(name, CheckStatus::Fail, e.to_string(), start), None),
    }
}

async fn check_index_tag(retriever: &Retriever) -> CheckResult {
    let start = Instant::now();
    let name = "Index embeddings";
    match retriever.verify_embedding_model().await {
        Ok(EmbeddingCheck::Match) => {
            CheckResult::new(name, CheckStatus::Pass, "index matches local model", start)
        }
        Ok(EmbeddingCheck::Mismatch { index, local }) => CheckResult::new(
            name,
            CheckStatus::Fail,
            format!("index built with {index}, local model is {local}"),
            start,
        ),
        Ok(EmbeddingCheck::Untagged) => CheckResult::new(
            name,
            CheckStatus::Warn,
            "index mapping records no embedding model",
            start,
        ),
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_providers(config: &IntervueConfig) -> Vec<CheckResult> {
    let start = Instant::now();
    let gateway = match ModelGateway::from_config(config) {
        Ok(gateway) => gateway,
        Err(e) => {
            return vec![CheckResult::new("Providers", CheckStatus::Fail, e.to_string(), start)];
        }
    };

    let mut results = Vec::new();
    for kind in [ProviderKind::Ollama, ProviderKind::OpenAi] {
        let start = Instant::now();
        let name = format!("Provider {kind}");
        let Some((_, provider)) = gateway.providers().find(|(k, _)| *k == kind) else {
            results.push(CheckResult::new(
                &name,
                CheckStatus::Warn,
                format!("not configured; {kind}/* models unavailable"),
                start,
            ));
            continue;
        };
        let result = match provider.health_check().await {
            Ok(HealthStatus::Healthy) => {
                CheckResult::new(&name, CheckStatus::Pass, "reachable", start)
            }
            Ok(HealthStatus::Degraded(msg)) => CheckResult::new(&name, CheckStatus::Warn, msg, start),
            Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new(&name, CheckStatus::Fail, msg, start),
            Err(e) => CheckResult::new(&name, CheckStatus::Fail, e.to_string(), start),
        };
        results.push(result);
    }
    results
}
