// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FALLBACK_TEXT: &str = "I'm experiencing technical difficulties. Please try again.";
pub const SERVICE_NAME: &str = "CampusLearn Python API";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    // Kept loose so a wrong type never turns into a body rejection.
    #[serde(default)]
    pub message: Option<Value>,
}

/// What the client actually sent in `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInput {
    /// Absent, `null`, or an empty value (`""`, `false`, `0`, `[]`, `{}`).
    Missing,
    Text(String),
    /// A non-empty value that is not a string. It cannot be relayed.
    Unsupported,
}

impl ChatRequest {
    pub fn into_input(self) -> MessageInput {
        match self.message {
            None | Some(Value::Null) | Some(Value::Bool(false)) => MessageInput::Missing,
            Some(Value::String(text)) if text.is_empty() => MessageInput::Missing,
            Some(Value::String(text)) => MessageInput::Text(text),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => MessageInput::Missing,
            Some(Value::Array(items)) if items.is_empty() => MessageInput::Missing,
            Some(Value::Object(fields)) if fields.is_empty() => MessageInput::Missing,
            Some(_) => MessageInput::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    pub requires_tutor: bool,
    pub success: bool,
}

impl ChatResponse {
    pub fn answered(text: String) -> Self {
        let requires_tutor = crate::services::relay::requires_tutor(&text);
        Self { text, requires_tutor, success: true }
    }

    /// What the client sees whenever the model could not be reached.
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_TEXT.to_string(),
            requires_tutor: true,
            success: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(body: Value) -> MessageInput {
        serde_json::from_value::<ChatRequest>(body).unwrap().into_input()
    }

    #[test]
    fn empty_values_are_missing() {
        for body in [
            json!({}),
            json!({ "message": null }),
            json!({ "message": "" }),
            json!({ "message": false }),
            json!({ "message": 0 }),
            json!({ "message": 0.0 }),
            json!({ "message": [] }),
            json!({ "message": {} }),
        ] {
            assert_eq!(input(body.clone()), MessageInput::Missing, "body: {}", body);
        }
    }

    #[test]
    fn strings_are_text() {
        assert_eq!(input(json!({ "message": "hi" })), MessageInput::Text("hi".to_string()));
        assert_eq!(input(json!({ "message": " " })), MessageInput::Text(" ".to_string()));
    }

    #[test]
    fn other_values_are_unsupported() {
        for body in [
            json!({ "message": 42 }),
            json!({ "message": true }),
            json!({ "message": ["hi"] }),
            json!({ "message": { "text": "hi" } }),
        ] {
            assert_eq!(input(body.clone()), MessageInput::Unsupported, "body: {}", body);
        }
    }
}
