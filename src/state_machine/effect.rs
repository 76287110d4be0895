//! Effects produced by state transitions

use std::time::Duration;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Sleep before the next status check
    Wait { delay: Duration },

    /// Fetch the run status and report it back as `Event::StatusObserved`
    FetchStatus,
}

impl Effect {
    pub fn wait(delay: Duration) -> Self {
        Effect::Wait { delay }
    }
}
