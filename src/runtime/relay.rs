//! Chat relay: one user turn in, one assistant turn out

use super::error::{RelayError, Stage};
use super::traits::Sleeper;
use crate::assistant::{latest_assistant_reply, AssistantApi, Run};
use crate::state_machine::{transition, Effect, Event, PollPolicy, PollState};
use std::sync::Arc;

/// Reply returned to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub result: String,
    pub thread_id: String,
}

/// Relays a chat turn through the assistant service.
///
/// Holds no per-conversation state: continuity comes only from the thread id
/// the caller passes back in.
#[derive(Clone)]
pub struct ChatRelay {
    api: Arc<dyn AssistantApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl ChatRelay {
    pub fn new(api: Arc<dyn AssistantApi>, sleeper: Arc<dyn Sleeper>, policy: PollPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    /// Append `message` to the thread (creating one if `thread_id` is absent
    /// or blank), run the assistant and return its latest reply.
    ///
    /// Nothing is rolled back when a later step fails.
    pub async fn handle(
        &self,
        message: Option<&str>,
        thread_id: Option<&str>,
    ) -> Result<RelayReply, RelayError> {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .ok_or(RelayError::MissingMessage)?;

        let thread_id = match thread_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let thread = self
                    .api
                    .create_thread()
                    .await
                    .map_err(|e| RelayError::from_assistant(Stage::CreateThread, e))?;
                tracing::info!(thread_id = %thread.id, "Created thread");
                thread.id
            }
        };

        self.api
            .add_message(&thread_id, message)
            .await
            .map_err(|e| RelayError::from_assistant(Stage::AddMessage, e))?;

        let run = self
            .api
            .create_run(&thread_id)
            .await
            .map_err(|e| RelayError::from_assistant(Stage::CreateRun, e))?;
        tracing::info!(
            thread_id = %thread_id,
            run_id = %run.id,
            assistant_id = %self.api.assistant_id(),
            "Started run"
        );

        let checks = self.await_run(&thread_id, &run.id).await?;

        let messages = self
            .api
            .list_messages(&thread_id)
            .await
            .map_err(|e| RelayError::from_assistant(Stage::ListMessages, e))?;
        let result = latest_assistant_reply(&messages);

        tracing::info!(
            thread_id = %thread_id,
            run_id = %run.id,
            checks,
            transcript_len = messages.len(),
            "Run completed"
        );

        Ok(RelayReply { result, thread_id })
    }

    /// Drive the polling state machine until the run finishes.
    ///
    /// Returns the number of status checks made.
    async fn await_run(&self, thread_id: &str, run_id: &str) -> Result<u32, RelayError> {
        let mut state = PollState::default();
        let mut event = Event::Start;
        let mut last_run: Option<Run> = None;

        loop {
            let result = transition(&state, &self.policy, event)?;
            state = result.new_state;

            let mut observed = None;
            for effect in result.effects {
                match effect {
                    Effect::Wait { delay } => self.sleeper.sleep(delay).await,
                    Effect::FetchStatus => {
                        let run = self
                            .api
                            .get_run(thread_id, run_id)
                            .await
                            .map_err(|e| RelayError::from_assistant(Stage::GetRun, e))?;
                        tracing::debug!(
                            thread_id,
                            run_id,
                            status = %run.status,
                            check = state.checks() + 1,
                            "Polled run"
                        );
                        observed = Some(Event::StatusObserved { status: run.status });
                        last_run = Some(run);
                    }
                }
            }

            match (state, observed) {
                (PollState::Pending { .. }, Some(next)) => event = next,
                (PollState::Pending { checks }, None) => {
                    return Err(RelayError::Unexpected(format!(
                        "poll produced no status check after {checks} checks"
                    )));
                }
                (PollState::Succeeded { checks }, _) => return Ok(checks),
                (PollState::Failed { status, checks }, _) => {
                    let last_error = last_run.as_ref().and_then(|r| r.last_error.as_ref());
                    tracing::warn!(
                        thread_id,
                        run_id,
                        %status,
                        checks,
                        error_code = ?last_error.and_then(|e| e.code.as_deref()),
                        error_message = ?last_error.and_then(|e| e.message.as_deref()),
                        "Run ended without completing"
                    );
                    return Err(RelayError::run_ended(status));
                }
                (PollState::TimedOut { checks }, _) => {
                    tracing::warn!(
                        thread_id,
                        run_id,
                        checks,
                        max_attempts = self.policy.max_attempts,
                        "Gave up waiting for run"
                    );
                    return Err(RelayError::Timeout { checks });
                }
            }
        }
    }
}
