// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the retrieve → generate → evaluate pipeline.
//!
//! The first group wires the pipeline from in-memory mocks. The last test
//! runs the real search backend and chat providers against wiremock servers.

use std::sync::Arc;

use intervue_agent::{AnswerRequest, RagPipeline, RelevanceEvaluator};
use intervue_config::IntervueConfig;
use intervue_core::{
    Category, LengthTier, ModelIdentifier, ProviderKind, RelevanceLabel, SearchMode, TokenUsage,
};
use intervue_provider::ModelGateway;
use intervue_retrieval::{ElasticsearchBackend, Retriever};
use intervue_test_utils::{HashEmbedder, MockProvider, MockSearchBackend, fixtures};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JUDGE_RELEVANT: &str =
    r#"{"Relevance": "RELEVANT", "Explanation": "The answer defines data engineering."}"#;

struct Harness {
    pipeline: RagPipeline,
    search: Arc<MockSearchBackend>,
    ollama: Arc<MockProvider>,
    openai: Arc<MockProvider>,
}

impl Harness {
    fn new(search: MockSearchBackend, with_embedder: bool) -> Self {
        let search = Arc::new(search);
        let ollama = Arc::new(MockProvider::new().with_usage(TokenUsage::new(420, 80)));
        let openai = Arc::new(MockProvider::new().with_usage(TokenUsage::new(1000, 500)));

        let mut gateway = ModelGateway::new();
        gateway.register(ProviderKind::Ollama, ollama.clone());
        gateway.register(ProviderKind::OpenAi, openai.clone());
        let gateway = Arc::new(gateway);

        let mut retriever = Retriever::new(search.clone());
        if with_embedder {
            retriever = retriever.with_embedder(Arc::new(HashEmbedder::new(384)));
        }
        let evaluator = RelevanceEvaluator::new(
            gateway.clone(),
            ModelIdentifier::parse("openai/gpt-4o-mini").unwrap(),
        );

        Self {
            pipeline: RagPipeline::new(retriever, gateway, evaluator),
            search,
            ollama,
            openai,
        }
    }
}

fn request(model: &str, mode: SearchMode, tier: LengthTier) -> AnswerRequest {
    AnswerRequest {
        question: "What is Data Engineering?".to_string(),
        category: Category::DataEngineer,
        model: ModelIdentifier::parse(model).unwrap(),
        mode,
        tier,
    }
}

// ---- Lexical, short, local model ----

#[tokio::test]
async fn data_engineering_question_lexical_short() {
    let h = Harness::new(MockSearchBackend::new(fixtures::knowledge_base()), false);
    h.ollama
        .add_response("Data engineering builds the systems that move and store data.".into())
        .await;
    h.openai.add_response(JUDGE_RELEVANT.into()).await;

    let record = h
        .pipeline
        .answer(&request("ollama/phi3.5", SearchMode::Lexical, LengthTier::Short))
        .await
        .unwrap();

    assert_eq!(
        record.answer,
        "Data engineering builds the systems that move and store data."
    );
    assert_eq!(record.model_used, "ollama/phi3.5");
    assert_eq!(record.relevance, RelevanceLabel::Relevant);
    assert_eq!(record.relevance_explanation, "The answer defines data engineering.");
    assert_eq!(
        (record.prompt_tokens, record.completion_tokens, record.total_tokens),
        (420, 80, 500)
    );
    assert_eq!(
        (
            record.eval_prompt_tokens,
            record.eval_completion_tokens,
            record.eval_total_tokens
        ),
        (1000, 500, 1500)
    );
    assert_eq!(record.cost, 0.0);
    assert!(record.response_time >= 0.0);

    let queries = h.search.lexical_queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].text, "What is Data Engineering?");
    assert_eq!(queries[0].category, Category::DataEngineer);
    assert_eq!(queries[0].size, 3);

    let prompt = &h.ollama.requests().await[0].prompt;
    assert!(prompt.contains("helps data engineers prepare for job interviews"));
    assert!(prompt.contains("no more than 200 words"));
    assert!(prompt.contains("QUESTION: What is Data Engineering?"));
    assert!(prompt.contains("question: What is Data Engineering?"));
    assert!(prompt.contains("question: What is ETL?"));
    assert!(prompt.contains("question: What is a data lake?"));
    // Capped at three, so the fourth DE entry is absent.
    assert!(!prompt.contains("Kafka"));
    assert!(!prompt.contains("productionize"));

    let judge = &h.openai.requests().await[0];
    assert_eq!(judge.model, "gpt-4o-mini");
    assert!(judge.prompt.contains("Generated Answer: Data engineering builds"));
}

#[tokio::test]
async fn record_serializes_with_storage_field_names() {
    let h = Harness::new(MockSearchBackend::new(fixtures::knowledge_base()), false);
    h.openai.add_response(JUDGE_RELEVANT.into()).await;

    let record = h
        .pipeline
        .answer(&request("ollama/phi3", SearchMode::Lexical, LengthTier::Short))
        .await
        .unwrap();
    let value = serde_json::to_value(&record).unwrap();

    for key in [
        "answer",
        "response_time",
        "relevance",
        "relevance_explanation",
        "model_used",
        "prompt_tokens",
        "completion_tokens",
        "total_tokens",
        "eval_prompt_tokens",
        "eval_completion_tokens",
        "eval_total_tokens",
        "cost",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["relevance"], "RELEVANT");
    assert_eq!(value["model_used"], "ollama/phi3");
}

// ---- Vector mode ----

#[tokio::test]
async fn vector_mode_drops_leaked_categories() {
    let h = Harness::new(
        MockSearchBackend::new(fixtures::knowledge_base()).ignoring_filter(),
        true,
    );
    h.openai.add_response(JUDGE_RELEVANT.into()).await;

    h.pipeline
        .answer(&request("ollama/phi3.5", SearchMode::Vector, LengthTier::Medium))
        .await
        .unwrap();

    let queries = h.search.vector_queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].vector.len(), 384);
    assert_eq!(queries[0].k, 3);
    assert!(h.search.lexical_queries().await.is_empty());

    let prompt = &h.ollama.requests().await[0].prompt;
    assert!(prompt.contains("no more than 500 words"));
    assert!(prompt.contains("question: What is Data Engineering?"));
    assert!(!prompt.contains("machine learning engineer do"));
}

// ---- Hosted model, fenced judge output ----

#[tokio::test]
async fn hosted_model_cost_and_fenced_verdict() {
    let h = Harness::new(MockSearchBackend::new(fixtures::knowledge_base()), false);
    h.openai.add_response("Data engineering is...".into()).await;
    h.openai
        .add_response(format!("```json\n{JUDGE_RELEVANT}\n```"))
        .await;

    let record = h
        .pipeline
        .answer(&request("openai/gpt-4o", SearchMode::Lexical, LengthTier::Long))
        .await
        .unwrap();

    assert_eq!(record.relevance, RelevanceLabel::Relevant);
    assert!((record.cost - 0.06).abs() < 1e-12, "cost {}", record.cost);
    assert!(h.ollama.requests().await.is_empty());

    let sent = h.openai.requests().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].model, "gpt-4o");
    assert!(sent[0].prompt.contains("no more than 1000 words"));
    assert_eq!(sent[1].model, "gpt-4o-mini");
}

#[tokio::test]
async fn unparseable_verdict_is_unknown_not_an_error() {
    let h = Harness::new(MockSearchBackend::new(fixtures::knowledge_base()), false);
    h.openai.add_response("I am unable to evaluate this.".into()).await;

    let record = h
        .pipeline
        .answer(&request("ollama/phi3.5", SearchMode::Lexical, LengthTier::Short))
        .await
        .unwrap();
    assert_eq!(record.relevance, RelevanceLabel::Unknown);
    assert_eq!(
        record.relevance_explanation,
        "Failed to parse evaluation. I am unable to evaluate this."
    );
}

// ---- Real adapters over HTTP ----

fn chat_completion(model: &str, content: &str, prompt_tokens: u32, completion_tokens: u32) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

#[tokio::test]
async fn full_stack_against_http_backends() {
    let search = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/interview-questions/_search"))
        .and(body_partial_json(json!({
            "query": {"bool": {"filter": {"term": {"position": "de"}}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"hits": [
                {"_source": {
                    "id": 17,
                    "section": "General",
                    "question": "What is Data Engineering?",
                    "text": "Designing systems that collect and move data.",
                    "position": "de"
                }},
                {"_source": {
                    "id": "mle-3",
                    "section": "General",
                    "question": "What is MLOps?",
                    "text": "Operating ML systems.",
                    "position": "mle"
                }}
            ]}
        })))
        .expect(1)
        .mount(&search)
        .await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "phi3.5"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
            "phi3.5",
            "It is the discipline of building data systems.",
            300,
            40,
        )))
        .expect(1)
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
            "gpt-4o-mini",
            r#"{"Relevance": "PARTLY_RELEVANT", "Explanation": "Brief."}"#,
            250,
            20,
        )))
        .expect(1)
        .mount(&llm)
        .await;

    let mut config = IntervueConfig::default();
    config.search.url = search.uri();
    config.ollama.base_url = format!("{}/v1/", llm.uri());
    config.openai.base_url = format!("{}/v1/", llm.uri());
    config.openai.api_key = Some("sk-test".to_string());
    config.provider.max_retries = 0;

    let backend = Arc::new(ElasticsearchBackend::new(&config.search).unwrap());
    let retriever = Retriever::from_config(backend, &config.search);
    let gateway = Arc::new(ModelGateway::from_config(&config).unwrap());
    let evaluator = RelevanceEvaluator::from_config(gateway.clone(), &config.evaluation).unwrap();
    let pipeline = RagPipeline::new(retriever, gateway, evaluator);

    let record = pipeline
        .answer(&request("ollama/phi3.5", SearchMode::Lexical, LengthTier::Short))
        .await
        .unwrap();

    assert_eq!(record.answer, "It is the discipline of building data systems.");
    assert_eq!(record.relevance, RelevanceLabel::PartlyRelevant);
    assert_eq!(record.relevance_explanation, "Brief.");
    assert_eq!(record.total_tokens, 340);
    assert_eq!(record.eval_total_tokens, 270);
    assert_eq!(record.cost, 0.0);
}
