//! Chroma HTTP client implementing the vector index trait

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::IndexConfig;
use crate::error::{Error, Result};

use super::vector_index::{IndexMatch, VectorIndex};

/// Client for one collection on a Chroma server
pub struct ChromaIndex {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: String,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<HashMap<String, Value>>>>>,
}

impl ChromaIndex {
    /// Connect to the server and get-or-create the configured collection
    pub async fn connect(config: &IndexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}/api/v1/collections"))
            .json(&json!({
                "name": config.collection,
                "get_or_create": true,
            }))
            .send()
            .await
            .map_err(|e| Error::vector_index(format!("Chroma request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::vector_index(format!(
                "Chroma collection setup returned {}",
                response.status()
            )));
        }

        let info: CollectionInfo = response
            .json()
            .await
            .map_err(|e| Error::vector_index(format!("Invalid collection response: {e}")))?;

        tracing::info!(collection = %config.collection, id = %info.id, "Connected to Chroma collection");

        Ok(Self {
            client,
            base_url,
            collection: config.collection.clone(),
            collection_id: info.id,
        })
    }

    /// The collection this client talks to
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorIndex for ChromaIndex {
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<IndexMatch>> {
        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.base_url, self.collection_id
            ))
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": k,
                "include": ["documents", "metadatas"],
            }))
            .send()
            .await
            .map_err(|e| Error::vector_index(format!("Chroma query failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::vector_index(format!(
                "Chroma query returned {}",
                response.status()
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::vector_index(format!("Invalid query response: {e}")))?;

        // Chroma nests results per query embedding; we always send one.
        let documents = body
            .documents
            .and_then(|mut d| (!d.is_empty()).then(|| d.remove(0)))
            .unwrap_or_default();
        let metadatas = body
            .metadatas
            .and_then(|mut m| (!m.is_empty()).then(|| m.remove(0)))
            .unwrap_or_default();

        let matches = documents
            .into_iter()
            .zip(metadatas.into_iter().chain(std::iter::repeat(None)))
            .map(|(document, metadata)| IndexMatch {
                document: document.unwrap_or_default(),
                metadata: metadata.unwrap_or_default(),
            })
            .collect();

        Ok(matches)
    }

    async fn add(
        &self,
        ids: &[String],
        embeddings: &[Vec<f32>],
        documents: &[String],
        metadatas: &[HashMap<String, Value>],
    ) -> Result<()> {
        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/add",
                self.base_url, self.collection_id
            ))
            .json(&json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": documents,
                "metadatas": metadatas,
            }))
            .send()
            .await
            .map_err(|e| Error::vector_index(format!("Chroma add failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::vector_index(format!(
                "Chroma add returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "chroma"
    }
}
