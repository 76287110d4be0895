//! Assistant service abstraction
//!
//! Typed access to the thread/message/run operations of the external
//! assistant service.

mod config;
mod error;
mod openai;
mod types;

pub use config::{AssistantConfig, Credentials};
pub use error::{AssistantError, AssistantErrorKind};
pub use openai::OpenAIAssistant;
pub use types::*;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Operations the relay needs from the assistant service
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty thread
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    /// Append a user turn to a thread
    async fn add_message(&self, thread_id: &str, text: &str)
        -> Result<ThreadMessage, AssistantError>;

    /// Start a run of the configured assistant on a thread
    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError>;

    /// Fetch the current state of a run
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// List the thread's messages, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError>;

    /// Assistant the runs are started with
    fn assistant_id(&self) -> &str;
}

#[async_trait]
impl<T: AssistantApi + ?Sized> AssistantApi for Arc<T> {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        (**self).create_thread().await
    }

    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        (**self).add_message(thread_id, text).await
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError> {
        (**self).create_run(thread_id).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        (**self).get_run(thread_id, run_id).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        (**self).list_messages(thread_id).await
    }

    fn assistant_id(&self) -> &str {
        (**self).assistant_id()
    }
}

/// Logging wrapper for assistant services
pub struct LoggingAssistant {
    inner: Arc<dyn AssistantApi>,
}

impl LoggingAssistant {
    pub fn new(inner: Arc<dyn AssistantApi>) -> Self {
        Self { inner }
    }

    async fn timed<T, F>(&self, operation: &'static str, call: F) -> Result<T, AssistantError>
    where
        T: Send,
        F: Future<Output = Result<T, AssistantError>> + Send,
    {
        let start = Instant::now();
        let result = call.await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    operation,
                    assistant_id = %self.inner.assistant_id(),
                    duration_ms = %duration.as_millis(),
                    "Assistant call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    assistant_id = %self.inner.assistant_id(),
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Assistant call failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl AssistantApi for LoggingAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.timed("create_thread", self.inner.create_thread()).await
    }

    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        self.timed("add_message", self.inner.add_message(thread_id, text))
            .await
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError> {
        self.timed("create_run", self.inner.create_run(thread_id)).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.timed("get_run", self.inner.get_run(thread_id, run_id))
            .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.timed("list_messages", self.inner.list_messages(thread_id))
            .await
    }

    fn assistant_id(&self) -> &str {
        self.inner.assistant_id()
    }
}
