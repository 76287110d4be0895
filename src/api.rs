//! HTTP API for the assistant relay
//!
//! `POST /api/chat` relays one user turn; the browser client is served
//! from embedded assets.

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::assistant::AssistantApi;
use crate::runtime::{ChatRelay, RelayError, Sleeper, TokioSleeper};
use crate::state_machine::PollPolicy;
use axum::http::{header, Method};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when credentials are not configured
    pub assistant: Option<Arc<dyn AssistantApi>>,
    pub sleeper: Arc<dyn Sleeper>,
    pub poll_policy: PollPolicy,
}

impl AppState {
    pub fn new(assistant: Option<Arc<dyn AssistantApi>>, poll_policy: PollPolicy) -> Self {
        Self {
            assistant,
            sleeper: Arc::new(TokioSleeper),
            poll_policy,
        }
    }

    #[cfg(test)]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Relay for one request, or the credentials error
    pub fn relay(&self) -> Result<ChatRelay, RelayError> {
        let api = self
            .assistant
            .clone()
            .ok_or(RelayError::MissingCredentials)?;
        Ok(ChatRelay::new(
            api,
            self.sleeper.clone(),
            self.poll_policy.clone(),
        ))
    }
}

/// Any origin may call the relay with a JSON body
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
