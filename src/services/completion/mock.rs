//! Canned provider for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CompletionError, CompletionProvider, CompletionRequest};

#[derive(Debug)]
pub struct MockProvider {
    outcome: Result<String, CompletionError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    pub fn failing(error: CompletionError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, CompletionError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// How many times `complete` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(request.clone());
        self.outcome.clone()
    }
}
