//! Run-completion polling state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The runtime executes the effects and feeds back the observed statuses.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{DelaySchedule, PollPolicy, PollState};
pub use transition::{transition, TransitionError, TransitionResult};
