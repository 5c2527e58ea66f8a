//! Ollama-based providers for embeddings and answer generation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// HTTP client for a local Ollama server
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    embed_model: String,
    generate_model: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a client from the LLM configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embed_model: config.embed_model.clone(),
            generate_model: config.generate_model.clone(),
            temperature: config.temperature,
        })
    }

    /// Generate an embedding for `text`
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&json!({
                "model": self.embed_model,
                "prompt": text,
            }))
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::embedding(format!(
                "Ollama embedding returned {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Invalid embedding response: {e}")))?;

        if body.embedding.is_empty() {
            return Err(Error::embedding("Ollama returned an empty embedding"));
        }

        Ok(body.embedding)
    }

    /// Generate a completion for `prompt`
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.generate_model,
                "prompt": prompt,
                "stream": false,
                "options": { "temperature": self.temperature },
            }))
            .send()
            .await
            .map_err(|e| Error::llm(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::llm(format!(
                "Ollama generate returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Invalid generate response: {e}")))?;

        Ok(body.response)
    }

    /// Check that the Ollama server is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await;
        Ok(matches!(response, Ok(r) if r.status().is_success()))
    }
}

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
}

impl OllamaEmbedder {
    /// Create an embedder sharing an existing client
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a generator sharing an existing client
    pub fn new(client: Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client.generate(prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
