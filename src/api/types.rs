//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to relay a chat turn
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_message: Option<String>,
    /// Existing thread to continue; absent or null starts a new one
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Assistant reply plus the thread to continue with
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub result: String,
    pub thread_id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
