//! Pure state transition function
//!
//! Given the same state, policy and event this always produces the same
//! outputs, with no I/O side effects.

use super::{Effect, Event, PollPolicy, PollState};
use crate::assistant::RunPhase;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: PollState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: PollState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Stay pending and schedule the next status check
    fn check_again(checks: u32, policy: &PollPolicy) -> Self {
        Self::new(PollState::Pending { checks })
            .with_effect(Effect::wait(policy.schedule.delay_for(checks)))
            .with_effect(Effect::FetchStatus)
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Poll already finished: {0:?}")]
    AlreadyTerminal(PollState),
    #[error("Poll already started after {0} checks")]
    AlreadyStarted(u32),
}

pub fn transition(
    state: &PollState,
    policy: &PollPolicy,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        (terminal, _) if terminal.is_terminal() => Err(TransitionError::AlreadyTerminal(terminal)),

        // A zero cap never checks
        (PollState::Pending { checks: 0 }, Event::Start) if policy.max_attempts == 0 => {
            Ok(TransitionResult::new(PollState::TimedOut { checks: 0 }))
        }

        (PollState::Pending { checks: 0 }, Event::Start) => Ok(TransitionResult::check_again(0, policy)),

        (PollState::Pending { checks }, Event::Start) => Err(TransitionError::AlreadyStarted(checks)),

        (PollState::Pending { checks }, Event::StatusObserved { status }) => {
            let checks = checks.saturating_add(1);
            match status.phase() {
                RunPhase::Succeeded => Ok(TransitionResult::new(PollState::Succeeded { checks })),
                RunPhase::Failed => Ok(TransitionResult::new(PollState::Failed { status, checks })),
                RunPhase::Pending if checks >= policy.max_attempts => {
                    Ok(TransitionResult::new(PollState::TimedOut { checks }))
                }
                RunPhase::Pending => Ok(TransitionResult::check_again(checks, policy)),
            }
        }

        // Unreachable: every non-pending state is terminal
        (state, _) => Err(TransitionError::AlreadyTerminal(state)),
    }
}
