//! Completion providers.
//!
//! The relay only needs "send one message, get one text back or an error",
//! so every backend sits behind [`CompletionProvider`].

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Everything that can go wrong while asking a provider for a completion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("credentials rejected (status {0})")]
    Unauthorized(u16),

    #[error("rate limited")]
    RateLimited,

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub message: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one message and wait for the complete reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
