//! Multi-turn conversation seeded with a system instruction.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateOptions, GenerateRequest, Message};

/// A conversation with one model. Turns are strictly sequential: a call to
/// [`ChatSession::send`] while another is pending fails with
/// [`Error::TurnInFlight`] instead of queueing.
pub struct ChatSession {
    id: Uuid,
    provider: Arc<dyn Provider>,
    model: String,
    system_instruction: String,
    options: GenerateOptions,
    history: Mutex<Vec<Message>>,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider,
            model: model.into(),
            system_instruction: system_instruction.into(),
            options: GenerateOptions::default(),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Send one user message and return the model's reply text.
    ///
    /// The exchange is appended to the history only when the call succeeds,
    /// so a failed turn can be retried without leaving a dangling question.
    pub async fn send(&self, text: impl Into<String>) -> Result<String> {
        let mut history = self.history.try_lock().map_err(|_| Error::TurnInFlight)?;

        let user = Message::user_text(text);
        let mut messages = history.clone();
        messages.push(user.clone());

        let request = GenerateRequest::new(self.model.clone(), messages)
            .with_system_instruction(self.system_instruction.clone())
            .with_options(self.options.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(session = %self.id, turn = history.len() / 2 + 1, "chat turn");

        let response = self.provider.generate(request).await?;
        let reply = response.text();

        history.push(user);
        history.push(Message::model_text(reply.clone()));
        Ok(reply)
    }

    /// Snapshot of the committed history. Waits for an in-flight turn.
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    /// Number of completed exchanges.
    pub async fn turn_count(&self) -> usize {
        self.history.lock().await.len() / 2
    }
}
