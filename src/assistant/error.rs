//! Assistant API error types

use thiserror::Error;

/// Error from the assistant service, with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
    /// HTTP status of the upstream response, if one was received
    pub status: Option<u16>,
    /// Raw upstream response body, if one was received
    pub body: Option<String>,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Decode, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Unknown, message)
    }

    /// Build an error from a non-success upstream response
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let kind = AssistantErrorKind::from_status(status);
        Self {
            kind,
            message: format!("HTTP {status}: {body}"),
            status: Some(status),
            body: Some(body),
        }
    }

    /// Upstream body if the service answered, `None` for transport failures
    pub fn upstream_body(&self) -> Option<&str> {
        self.status.and(self.body.as_deref())
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    /// Network issues, timeouts
    Network,
    /// Rate limited (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Authentication failed (401, 403)
    Auth,
    /// Bad request (400, 422)
    InvalidRequest,
    /// Unknown thread, run or assistant (404)
    NotFound,
    /// Response body did not match the expected shape
    Decode,
    /// Unknown error
    Unknown,
}

impl AssistantErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            429 => Self::RateLimit,
            400 | 422 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}
