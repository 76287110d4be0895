//! Relay error types

use crate::assistant::{AssistantError, RunStatus};
use crate::state_machine::TransitionError;
use thiserror::Error;

/// Outbound call a failure happened at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CreateThread,
    AddMessage,
    CreateRun,
    GetRun,
    ListMessages,
}

impl Stage {
    /// Prefix of the caller-facing message for upstream HTTP errors
    pub fn error_prefix(self) -> &'static str {
        match self {
            Stage::CreateThread => "OpenAI Error",
            Stage::AddMessage => "Message Error",
            Stage::CreateRun => "Run Error",
            Stage::GetRun => "Run Status Error",
            Stage::ListMessages => "Message Fetch Error",
        }
    }
}

/// Terminal failure of one relayed request; the display text is what the
/// caller sees
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing API credentials")]
    MissingCredentials,

    #[error("Missing user message")]
    MissingMessage,

    #[error("{}: {body}", .stage.error_prefix())]
    Upstream { stage: Stage, body: String },

    #[error("Assistant run failed.")]
    RunFailed { status: RunStatus },

    #[error("Assistant run expired.")]
    RunExpired,

    #[error("Timeout waiting for assistant response.")]
    Timeout { checks: u32 },

    #[error("Unexpected server error.")]
    Unexpected(String),
}

impl RelayError {
    /// Classify an assistant error raised at `stage`
    pub fn from_assistant(stage: Stage, error: AssistantError) -> Self {
        match error.upstream_body() {
            Some(body) => RelayError::Upstream {
                stage,
                body: body.to_string(),
            },
            None => RelayError::Unexpected(format!("{stage:?}: {error}")),
        }
    }

    pub fn run_ended(status: RunStatus) -> Self {
        match status {
            RunStatus::Expired => RelayError::RunExpired,
            status => RelayError::RunFailed { status },
        }
    }
}

impl From<TransitionError> for RelayError {
    fn from(error: TransitionError) -> Self {
        RelayError::Unexpected(error.to_string())
    }
}
