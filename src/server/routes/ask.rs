//! Question-answering endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::retrieval::RetrievedChunk;
use crate::server::state::AppState;

/// Query parameters for `GET /ask`
#[derive(Debug, Deserialize)]
pub struct AskParams {
    /// The question to answer
    pub question: String,
    /// Number of context chunks to retrieve (1-20, default from config)
    pub k: Option<usize>,
}

/// Response for `GET /ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    /// The question as asked
    pub question: String,
    /// The model's answer
    pub answer: String,
    /// The retrieved chunks the answer was grounded on
    pub sources: Vec<RetrievedChunk>,
}

/// GET /ask - answer a question over the corpus
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>> {
    let question = params.question.trim().to_string();
    if question.is_empty() {
        return Err(Error::invalid_parameter("question must not be empty"));
    }

    let k = params.k.unwrap_or(state.config().retrieval.default_k);
    if !(1..=20).contains(&k) {
        return Err(Error::invalid_parameter("k must be between 1 and 20"));
    }

    tracing::info!(k, question = %question, "Query");

    let query_embedding = state.embedder().embed(&question).await?;
    let sources = state.retriever().retrieve(&query_embedding, k).await?;

    if sources.is_empty() {
        return Err(Error::EmptyRetrieval);
    }

    let prompt = PromptBuilder::build_prompt(
        &question,
        &sources,
        state.config().retrieval.max_context_chars,
    );
    let answer = state.llm().generate(&prompt).await?;

    Ok(Json(AskResponse {
        question,
        answer,
        sources,
    }))
}
