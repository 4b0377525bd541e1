use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Linear status used for gating user actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Uploading,
    Processing,
    Solved,
    Error { message: String },
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl SessionStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionStatus::Uploading | SessionStatus::Processing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Uploading => "uploading",
            SessionStatus::Processing => "processing",
            SessionStatus::Solved => "solved",
            SessionStatus::Error { .. } => "error",
        }
    }
}

/// Raw model output for one solve cycle. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Solution {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
