// src/routes/mod.rs
pub mod chat;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{chat_handler, health_handler};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/api/chat/message", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
}
