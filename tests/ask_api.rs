//! /ask endpoint tests against deterministic fake providers

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use gutenrag::config::RagConfig;
use gutenrag::providers::{EmbeddingProvider, IndexMatch, LlmProvider, VectorIndex};
use gutenrag::server::{router, state::AppState};
use gutenrag::Result;

struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.1, 0.2, 0.3])
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeLlm;

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        assert!(prompt.contains("Question:"));
        Ok("Captain Ahab.".to_string())
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(gutenrag::Error::llm("model unavailable"))
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct StaticIndex {
    matches: Vec<IndexMatch>,
}

#[async_trait]
impl VectorIndex for StaticIndex {
    async fn query(&self, _embedding: &[f32], k: usize) -> Result<Vec<IndexMatch>> {
        Ok(self.matches.iter().take(k).cloned().collect())
    }

    async fn add(
        &self,
        _ids: &[String],
        _embeddings: &[Vec<f32>],
        _documents: &[String],
        _metadatas: &[HashMap<String, Value>],
    ) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn corpus_matches() -> Vec<IndexMatch> {
    let meta = |chunk_id: &str| {
        HashMap::from([
            ("chunk_id".to_string(), json!(chunk_id)),
            ("book_id".to_string(), json!("moby")),
            ("title".to_string(), json!("Moby Dick")),
        ])
    };
    vec![
        IndexMatch {
            document: "Call me Ishmael.".to_string(),
            metadata: meta("moby_00000"),
        },
        IndexMatch {
            document: "It was the White Whale.".to_string(),
            metadata: meta("moby_00001"),
        },
    ]
}

fn app(matches: Vec<IndexMatch>) -> axum::Router {
    app_with_llm(matches, Arc::new(FakeLlm))
}

fn app_with_llm(matches: Vec<IndexMatch>, llm: Arc<dyn LlmProvider>) -> axum::Router {
    let state = AppState::new(
        Arc::new(RagConfig::default()),
        Arc::new(FakeEmbedder),
        llm,
        Arc::new(StaticIndex { matches }),
    );
    router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_returns_static_ok() {
    let (status, body) = get(app(corpus_matches()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn ask_returns_answer_with_sources() {
    let (status, body) = get(
        app(corpus_matches()),
        "/ask?question=Who%20is%20the%20captain%3F&k=5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "Who is the captain?");
    assert_eq!(body["answer"], "Captain Ahab.");

    let sources = body["sources"].as_array().unwrap();
    // k=5 against an index holding 2 chunks returns exactly 2 sources.
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["chunk_id"], "moby_00000");
    assert_eq!(sources[0]["title"], "Moby Dick");
    assert_eq!(sources[0]["text_snippet"], "Call me Ishmael.");
}

#[tokio::test]
async fn ask_uses_default_k_when_unset() {
    let (status, body) = get(app(corpus_matches()), "/ask?question=anything%3F").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sources"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_retrieval_is_not_found() {
    let (status, body) = get(app(vec![]), "/ask?question=anything%3F").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "empty_retrieval");
    assert_eq!(body["error"]["message"], "No context available.");
}

#[tokio::test]
async fn k_out_of_range_is_rejected() {
    for uri in ["/ask?question=q%3F&k=0", "/ask?question=q%3F&k=21"] {
        let (status, body) = get(app(corpus_matches()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_parameter");
    }
}

#[tokio::test]
async fn blank_question_is_rejected() {
    let (status, body) = get(app(corpus_matches()), "/ask?question=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_parameter");
}

#[tokio::test]
async fn llm_failure_propagates_as_server_error() {
    let (status, body) = get(
        app_with_llm(corpus_matches(), Arc::new(FailingLlm)),
        "/ask?question=anything%3F",
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "llm_error");
}
