// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading, env overrides, and diagnostics.

use std::io::Write;

use figment::Jail;
use intervue_config::diagnostic::suggest_key;
use intervue_config::{
    ConfigError, IntervueConfig, load_and_validate_path, load_and_validate_str,
    load_config_from_str,
};

#[test]
fn full_toml_parses_every_section() {
    let toml = r#"
log_level = "debug"

[search]
url = "http://localhost:9200"
index_name = "qna"
category_field = "track"
vector_field = "qa_vector"
num_candidates = 500
result_limit = 2
timeout_secs = 5

[embedding]
model_name = "multi-qa-MiniLM-L6-cos-v1"
model_path = "/models/multi-qa/model.onnx"

[ollama]
base_url = "http://localhost:11434/v1/"
api_key = "ollama"

[openai]
base_url = "https://api.openai.com/v1/"
api_key = "sk-test"

[provider]
timeout_secs = 60
max_retries = 3
initial_backoff_ms = 250

[evaluation]
judge_model = "ollama/phi3.5"
"#;

    let config = load_and_validate_str(toml).expect("complete config should validate");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.search.index_name, "qna");
    assert_eq!(config.search.category_field, "track");
    assert_eq!(config.search.result_limit, 2);
    assert_eq!(
        config.embedding.model_path.as_deref(),
        Some("/models/multi-qa/model.onnx")
    );
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.provider.max_retries, 3);
    assert_eq!(config.evaluation.judge_model, "ollama/phi3.5");
}

#[test]
fn serialized_defaults_are_sensible() {
    let config = IntervueConfig::default();
    assert_eq!(config.search.url, "http://elasticsearch:9200");
    assert_eq!(config.search.vector_field, "question_text_vector");
    assert_eq!(config.ollama.base_url, "http://ollama:11434/v1/");
    assert_eq!(config.ollama.api_key, "ollama");
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1/");
    assert_eq!(config.provider.timeout_secs, 120);
    assert_eq!(config.provider.initial_backoff_ms, 1000);
    assert_eq!(config.log_level, "info");
}

#[test]
fn env_vars_override_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "intervue.toml",
            r#"
[search]
index_name = "from-file"
"#,
        )?;
        jail.set_env("INTERVUE_SEARCH_INDEX_NAME", "from-env");
        jail.set_env("INTERVUE_OPENAI_API_KEY", "sk-env");
        jail.set_env("INTERVUE_PROVIDER_MAX_RETRIES", "4");

        let config = intervue_config::load_config()?;
        assert_eq!(config.search.index_name, "from-env");
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.provider.max_retries, 4);
        Ok(())
    });
}

#[test]
fn local_file_is_picked_up_from_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "intervue.toml",
            r#"
[evaluation]
judge_model = "openai/gpt-4o"
"#,
        )?;
        let config = intervue_config::load_config()?;
        assert_eq!(config.evaluation.judge_model, "openai/gpt-4o");
        Ok(())
    });
}

#[test]
fn explicit_path_is_loaded_and_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nresult_limit = 1").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should validate");
    assert_eq!(config.search.result_limit, 1);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let errors = load_and_validate_path(std::path::Path::new("/nonexistent/intervue.toml"))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0], ConfigError::Other(msg) if msg.contains("/nonexistent/intervue.toml")),
        "got: {:?}",
        errors[0]
    );
}

#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[storage]
database_path = "intervue.db"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("storage"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_key_suggests_closest_match() {
    let toml = r#"
[search]
index_nme = "qna"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "index_nme"
                && suggestion.as_deref() == Some("index_name")
                && valid_keys.contains("category_field")
        })
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[search]
num_candidates = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn validation_rejects_unsupported_judge() {
    let toml = r#"
[evaluation]
judge_model = "gpt-4o-mini"
"#;

    let errors = load_and_validate_str(toml).expect_err("bare model name should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("judge_model"))
    ));
}

#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["base_url", "api_key"];
    assert!(suggest_key("zzzzzz", valid_keys).is_none());
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "judge_modle".to_string(),
        suggestion: Some("judge_model".to_string()),
        valid_keys: "judge_model".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `judge_model`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("judge_modle"));
}
