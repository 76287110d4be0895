//! Mock implementations for testing
//!
//! These mocks let the relay and the HTTP layer run without real I/O.

use super::error::Stage;
use super::traits::Sleeper;
use crate::assistant::{
    AssistantApi, AssistantError, MessageBody, Role, Run, RunStatus, Thread, ThreadMessage,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

pub fn assistant_turn(id: &str, created_at: i64, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role: Role::Assistant,
        created_at,
        content: Some(MessageBody::Plain(text.to_string())),
    }
}

pub fn user_turn(id: &str, created_at: i64, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role: Role::User,
        created_at,
        content: Some(MessageBody::Plain(text.to_string())),
    }
}

// ============================================================================
// Mock Assistant
// ============================================================================

/// An outbound call recorded by [`MockAssistant`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateThread,
    AddMessage { thread_id: String, text: String },
    CreateRun { thread_id: String },
    GetRun { thread_id: String, run_id: String },
    ListMessages { thread_id: String },
}

impl Call {
    pub fn thread_id(&self) -> Option<&str> {
        match self {
            Call::CreateThread => None,
            Call::AddMessage { thread_id, .. }
            | Call::CreateRun { thread_id }
            | Call::GetRun { thread_id, .. }
            | Call::ListMessages { thread_id } => Some(thread_id),
        }
    }
}

/// Assistant service double with scripted run statuses.
///
/// Status checks pop the next scripted status and report `queued` once the
/// script is exhausted. A failure registered for a stage is returned (once)
/// instead of performing that call.
pub struct MockAssistant {
    statuses: Mutex<VecDeque<RunStatus>>,
    transcript: Mutex<Vec<ThreadMessage>>,
    failures: Mutex<HashMap<Stage, AssistantError>>,
    /// Record of all calls made
    pub calls: Mutex<Vec<Call>>,
}

impl MockAssistant {
    pub const NEW_THREAD_ID: &'static str = "thread_new";
    pub const RUN_ID: &'static str = "run_mock";
    pub const ASSISTANT_ID: &'static str = "asst_mock";

    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            transcript: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue run statuses returned by successive status checks
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    /// Messages already in the thread
    pub fn with_transcript(self, messages: Vec<ThreadMessage>) -> Self {
        *self.transcript.lock().unwrap() = messages;
        self
    }

    /// Make the call at `stage` fail with `error`
    pub fn fail_at(self, stage: Stage, error: AssistantError) -> Self {
        self.failures.lock().unwrap().insert(stage, error);
        self
    }

    pub fn recorded_calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, stage: Stage, call: Call) -> Result<(), AssistantError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().remove(&stage) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantApi for MockAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.record(Stage::CreateThread, Call::CreateThread)?;
        Ok(Thread {
            id: Self::NEW_THREAD_ID.to_string(),
        })
    }

    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        self.record(
            Stage::AddMessage,
            Call::AddMessage {
                thread_id: thread_id.to_string(),
                text: text.to_string(),
            },
        )?;

        let mut transcript = self.transcript.lock().unwrap();
        let created_at = transcript.iter().map(|m| m.created_at).max().unwrap_or(0) + 1;
        let message = user_turn(&format!("msg_user_{created_at}"), created_at, text);
        transcript.push(message.clone());
        Ok(message)
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, AssistantError> {
        self.record(
            Stage::CreateRun,
            Call::CreateRun {
                thread_id: thread_id.to_string(),
            },
        )?;
        Ok(Run {
            id: Self::RUN_ID.to_string(),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.record(
            Stage::GetRun,
            Call::GetRun {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
            },
        )?;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RunStatus::Queued);
        Ok(Run {
            id: run_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.record(
            Stage::ListMessages,
            Call::ListMessages {
                thread_id: thread_id.to_string(),
            },
        )?;
        let mut messages = self.transcript.lock().unwrap().clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    fn assistant_id(&self) -> &str {
        Self::ASSISTANT_ID
    }
}

// ============================================================================
// Recording Sleeper
// ============================================================================

/// Sleeper that returns immediately and records the requested delays
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::latest_assistant_reply;

    #[tokio::test]
    async fn test_mock_statuses_then_queued() {
        let mock = MockAssistant::new().with_statuses([RunStatus::InProgress]);

        let run = mock.get_run("t", "r").await.unwrap();
        assert_eq!(run.status, RunStatus::InProgress);

        let run = mock.get_run("t", "r").await.unwrap();
        assert_eq!(run.status, RunStatus::Queued);
    }

    #[tokio::test]
    async fn test_mock_failure_fires_once() {
        let mock = MockAssistant::new()
            .fail_at(Stage::CreateThread, AssistantError::from_status(500, "down"));

        assert!(mock.create_thread().await.is_err());
        assert!(mock.create_thread().await.is_ok());
        assert_eq!(mock.recorded_calls(), vec![Call::CreateThread, Call::CreateThread]);
    }

    #[tokio::test]
    async fn test_mock_appends_user_turns() {
        let mock = MockAssistant::new().with_transcript(vec![assistant_turn("a", 3, "earlier")]);

        mock.add_message("t", "new question").await.unwrap();

        let messages = mock.list_messages("t").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].created_at, 4);
        assert_eq!(latest_assistant_reply(&messages), "earlier");
    }

    #[tokio::test]
    async fn test_recording_sleeper() {
        let sleeper = RecordingSleeper::default();
        sleeper.sleep(Duration::from_secs(30)).await;
        assert_eq!(sleeper.recorded(), vec![Duration::from_secs(30)]);
    }
}
