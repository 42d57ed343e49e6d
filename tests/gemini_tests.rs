use campuslearn_chat::services::completion::gemini::{GeminiClient, GeminiConfig};
use campuslearn_chat::services::completion::{
    CompletionError, CompletionProvider, CompletionRequest,
};
use campuslearn_chat::services::relay::ChatRelay;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn fake_handler(
    State(fake): State<FakeGemini>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    fake.captured.lock().await.push(Captured {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });
    (fake.status, fake.reply.clone())
}

/// Start a fake Gemini endpoint and return a client pointed at it.
async fn spawn_fake(status: StatusCode, reply: serde_json::Value) -> (GeminiClient, FakeGemini) {
    let fake = FakeGemini {
        status,
        reply: reply.to_string(),
        captured: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().fallback(fake_handler).with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let mut config = GeminiConfig::new(Some("test-key".to_string()));
    config.api_base = format!("http://{}/v1beta", addr);
    config.model = "test-model".to_string();

    (GeminiClient::new(config).unwrap(), fake)
}

fn text_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_sends_expected_request() {
    let (client, fake) = spawn_fake(StatusCode::OK, text_reply("Hi there!")).await;
    let relay = ChatRelay::new(Arc::new(client));

    let text = relay.try_generate("Hello").await.unwrap();
    assert_eq!(text, "Hi there!");

    let captured = fake.captured.lock().await.clone();
    assert_eq!(captured.len(), 1);
    let call = &captured[0];
    assert_eq!(call.path, "/v1beta/models/test-model:generateContent");
    assert_eq!(call.api_key.as_deref(), Some("test-key"));

    let body = &call.body;
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
    assert!(
        body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are the CampusLearn Assistant")
    );
    assert_eq!(body["generationConfig"]["temperature"], 0.2);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 800);
}

#[tokio::test]
async fn test_tutor_reply_is_flagged_end_to_end() {
    let (client, _fake) =
        spawn_fake(StatusCode::OK, text_reply("I'll connect you with a tutor.")).await;
    let relay = ChatRelay::new(Arc::new(client));

    let resp = relay.generate_response("Can you grade my essay?").await;
    assert!(resp.success);
    assert!(resp.requires_tutor);
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (StatusCode::UNAUTHORIZED, CompletionError::Unauthorized(401)),
        (StatusCode::FORBIDDEN, CompletionError::Unauthorized(403)),
        (StatusCode::TOO_MANY_REQUESTS, CompletionError::RateLimited),
    ];

    for (status, expected) in cases {
        let (client, _fake) = spawn_fake(status, serde_json::json!({ "error": {} })).await;
        let relay = ChatRelay::new(Arc::new(client));
        assert_eq!(relay.try_generate("hi").await, Err(expected));
    }

    let (client, _fake) =
        spawn_fake(StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": "boom" })).await;
    let relay = ChatRelay::new(Arc::new(client));
    match relay.try_generate("hi").await {
        Err(CompletionError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_malformed() {
    let (client, _fake) = spawn_fake(StatusCode::OK, serde_json::json!({ "candidates": [] })).await;
    let relay = ChatRelay::new(Arc::new(client));

    assert!(matches!(
        relay.try_generate("hi").await,
        Err(CompletionError::MalformedResponse(_))
    ));

    let resp = relay.generate_response("hi").await;
    assert!(!resp.success);
    assert!(resp.requires_tutor);
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = GeminiConfig::new(Some("test-key".to_string()));
    config.api_base = format!("http://{}/v1beta", addr);
    let client = GeminiClient::new(config).unwrap();

    let request = CompletionRequest {
        message: "hi".to_string(),
        system_instruction: String::new(),
        temperature: 0.2,
        max_output_tokens: 800,
    };
    assert!(matches!(
        client.complete(&request).await,
        Err(CompletionError::Network(_))
    ));
}
