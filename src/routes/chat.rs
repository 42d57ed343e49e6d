use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse, MessageInput},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;

    let message = match payload.into_input() {
        MessageInput::Text(text) => text,
        MessageInput::Missing => return Err(AppError::MessageRequired),
        MessageInput::Unsupported => {
            tracing::warn!("message is not a string, sending fallback reply");
            return Ok(Json(ChatResponse::fallback()));
        }
    };

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);
    let response = state
        .relay
        .generate_response(&message)
        .instrument(span.clone())
        .await;

    span.in_scope(|| {
        tracing::info!(
            success = response.success,
            requires_tutor = response.requires_tutor,
            "chat message relayed"
        );
    });

    Ok(Json(response))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
