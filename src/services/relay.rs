// src/services/relay.rs
use std::sync::Arc;

use crate::message::ChatResponse;
use crate::services::completion::{CompletionError, CompletionProvider, CompletionRequest};

pub const SYSTEM_INSTRUCTION: &str = r#"You are the CampusLearn Assistant for Belgium Campus students. Help with:
- Academic topics from uploaded materials
- Platform navigation guides
- Connecting to tutors when needed
- FAQ answers

Be friendly and supportive. If unsure, say "I'll connect you with a tutor."
"#;

pub const TEMPERATURE: f32 = 0.2;
pub const MAX_OUTPUT_TOKENS: u32 = 800;

const TUTOR_PHRASES: [&str; 2] = ["connect you with a tutor", "i'll connect you"];

/// True when the model's reply hands the student over to a human tutor.
pub fn requires_tutor(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    TUTOR_PHRASES.iter().any(|phrase| text_lower.contains(phrase))
}

/// Forwards a message to the completion provider and shapes the reply.
#[derive(Clone)]
pub struct ChatRelay {
    provider: Arc<dyn CompletionProvider>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn build_request(&self, message: &str) -> CompletionRequest {
        CompletionRequest {
            message: message.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }

    /// One provider call, no retry.
    pub async fn try_generate(&self, message: &str) -> Result<String, CompletionError> {
        let request = self.build_request(message);
        self.provider.complete(&request).await
    }

    /// Like [`ChatRelay::try_generate`], but every error becomes the fallback reply.
    pub async fn generate_response(&self, message: &str) -> ChatResponse {
        match self.try_generate(message).await {
            Ok(text) => ChatResponse::answered(text),
            Err(err) => {
                tracing::warn!(error = %err, "completion failed, sending fallback reply");
                ChatResponse::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutor_phrases_are_case_insensitive() {
        assert!(requires_tutor("I'll connect you with a tutor."));
        assert!(requires_tutor("Let me CONNECT YOU WITH A TUTOR right away"));
        assert!(requires_tutor("Sure, I'll connect you to someone."));
        assert!(!requires_tutor("A derivative measures rate of change."));
        assert!(!requires_tutor("Tutors are available on the platform."));
        assert!(!requires_tutor(""));
    }
}
