//! API routes for the RAG server

pub mod ask;

use axum::{routing::get, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/ask", get(ask::ask))
}
