//! Events that drive a poll

use crate::assistant::RunStatus;

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Run has been started; begin polling
    Start,

    /// A status check returned this status
    StatusObserved { status: RunStatus },
}
