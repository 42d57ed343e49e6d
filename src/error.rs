// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Message is required")]
    MessageRequired,

    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A missing message is a normal reply for the client, not an HTTP error.
        let status = match &self {
            AppError::MessageRequired => StatusCode::OK,
            AppError::InvalidBody { status, .. } => *status,
        };
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
