//! Poll state and polling policy

use crate::assistant::RunStatus;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// State of one run-completion poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Still waiting; `checks` status fetches have been made so far
    Pending { checks: u32 },

    /// Run completed (terminal)
    Succeeded { checks: u32 },

    /// Run reached a failure status (terminal)
    Failed { status: RunStatus, checks: u32 },

    /// Attempt cap reached without a terminal status (terminal)
    TimedOut { checks: u32 },
}

impl Default for PollState {
    fn default() -> Self {
        PollState::Pending { checks: 0 }
    }
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Pending { .. })
    }

    pub fn checks(&self) -> u32 {
        match self {
            PollState::Pending { checks }
            | PollState::Succeeded { checks }
            | PollState::Failed { checks, .. }
            | PollState::TimedOut { checks } => *checks,
        }
    }
}

/// Delay before each status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelaySchedule {
    Fixed(Duration),
    /// Per-attempt delays, clamped to the last entry past the end
    Backoff(Vec<Duration>),
}

impl DelaySchedule {
    /// Delay to wait before check number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            DelaySchedule::Fixed(delay) => *delay,
            DelaySchedule::Backoff(delays) => {
                let index = usize::try_from(attempt).unwrap_or(usize::MAX);
                delays
                    .get(index)
                    .or_else(|| delays.last())
                    .copied()
                    .unwrap_or(Duration::ZERO)
            }
        }
    }
}

/// Polling configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub schedule: DelaySchedule,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            schedule: DelaySchedule::Fixed(DEFAULT_DELAY),
        }
    }
}

impl PollPolicy {
    pub fn new(max_attempts: u32, schedule: DelaySchedule) -> Self {
        Self {
            max_attempts,
            schedule,
        }
    }

    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("RELAY_POLL_MAX_ATTEMPTS").ok().as_deref(),
            std::env::var("RELAY_POLL_DELAYS_MS").ok().as_deref(),
        )
    }

    /// Build a policy from raw settings, falling back to defaults on bad input.
    ///
    /// `delays_ms` is a single value for a fixed delay or a comma-separated
    /// list for a backoff schedule.
    pub fn from_values(max_attempts: Option<&str>, delays_ms: Option<&str>) -> Self {
        let defaults = Self::default();

        let max_attempts = match max_attempts.map(str::trim) {
            None | Some("") => defaults.max_attempts,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid RELAY_POLL_MAX_ATTEMPTS, using default");
                defaults.max_attempts
            }),
        };

        let schedule = match delays_ms.map(str::trim) {
            None | Some("") => defaults.schedule,
            Some(raw) => parse_schedule(raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Invalid RELAY_POLL_DELAYS_MS, using default");
                defaults.schedule
            }),
        };

        Self {
            max_attempts,
            schedule,
        }
    }
}

fn parse_schedule(raw: &str) -> Option<DelaySchedule> {
    let delays = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>().ok().map(Duration::from_millis))
        .collect::<Option<Vec<_>>>()?;

    match delays.as_slice() {
        [] => None,
        [single] => Some(DelaySchedule::Fixed(*single)),
        _ => Some(DelaySchedule::Backoff(delays)),
    }
}
