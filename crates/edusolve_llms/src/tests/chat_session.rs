use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::chat::ChatSession;
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{
    FinishReason, GenerateRequest, GenerateResponse, Headers, ResponseContent, Role, Usage,
};

fn text_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        content: vec![ResponseContent::Text {
            text: text.to_string(),
        }],
        usage: Usage::default(),
        finish_reason: FinishReason::other(),
        metadata: None,
    }
}

/// Echoes the number of messages it received and records the last request.
struct EchoProvider {
    calls: AtomicUsize,
    last: std::sync::Mutex<Option<GenerateRequest>>,
}

impl EchoProvider {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last: std::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn provider_id(&self) -> &str {
        "echo"
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = format!("seen {}", request.messages.len());
        *self.last.lock().unwrap() = Some(request);
        Ok(text_response(&reply))
    }
}

/// Blocks inside `generate` until released.
struct GatedProvider {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Provider for GatedProvider {
    fn provider_id(&self) -> &str {
        "gated"
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(text_response("done"))
    }
}

struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn provider_id(&self) -> &str {
        "failing"
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        Err(Error::provider_error("unavailable"))
    }
}

#[tokio::test]
async fn test_history_accumulates() {
    let provider = Arc::new(EchoProvider::new());
    let chat = ChatSession::new(provider.clone(), "m", "CORRECTION");

    assert_eq!(chat.send("q1").await.unwrap(), "seen 1");
    assert_eq!(chat.send("q2").await.unwrap(), "seen 3");
    assert_eq!(chat.turn_count().await, 2);

    let history = chat.history().await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Model);
    assert_eq!(history[3].text().as_deref(), Some("seen 3"));

    let last = provider.last.lock().unwrap().clone().unwrap();
    assert_eq!(last.system_instruction.as_deref(), Some("CORRECTION"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_turn_is_not_committed() {
    let chat = ChatSession::new(Arc::new(FailingProvider), "m", "sys");
    assert!(chat.send("q").await.is_err());
    assert!(chat.history().await.is_empty());
}

#[tokio::test]
async fn test_second_turn_rejected_while_in_flight() {
    let provider = Arc::new(GatedProvider {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let chat = Arc::new(ChatSession::new(provider.clone(), "m", "sys"));

    let first = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.send("first").await })
    };
    provider.entered.notified().await;

    let second = chat.send("second").await;
    assert!(matches!(second, Err(Error::TurnInFlight)));

    provider.release.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), "done");
    assert_eq!(chat.turn_count().await, 1);
}
