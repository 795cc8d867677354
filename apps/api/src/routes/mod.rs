pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::chat::handle_chat;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/llm/chat", post(handle_chat))
        .route(
            "/api/llm/analyze-constraints",
            post(handlers::handle_analyze_constraints),
        )
        .route(
            "/api/llm/analyze-conflicts",
            post(handlers::handle_analyze_conflicts),
        )
        .route(
            "/api/llm/explain-schedule",
            post(handlers::handle_explain_schedule),
        )
        .route(
            "/api/llm/optimize-parameters",
            post(handlers::handle_optimize_parameters),
        )
        .fallback(not_found)
        .with_state(state)
}
