//! Property-based tests for the polling state machine
//!
//! Drives the pure transition function with arbitrary status sequences and
//! policies and checks the polling invariants.

use super::*;
use crate::assistant::{RunPhase, RunStatus};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_status() -> impl Strategy<Value = RunStatus> {
    prop_oneof![
        Just(RunStatus::Queued),
        Just(RunStatus::InProgress),
        Just(RunStatus::RequiresAction),
        Just(RunStatus::Cancelling),
        Just(RunStatus::Cancelled),
        Just(RunStatus::Failed),
        Just(RunStatus::Completed),
        Just(RunStatus::Succeeded),
        Just(RunStatus::Incomplete),
        Just(RunStatus::Expired),
        Just(RunStatus::Unknown),
    ]
}

fn arb_pending_status() -> impl Strategy<Value = RunStatus> {
    prop_oneof![
        Just(RunStatus::Queued),
        Just(RunStatus::InProgress),
        Just(RunStatus::RequiresAction),
        Just(RunStatus::Unknown),
    ]
}

fn arb_schedule() -> impl Strategy<Value = DelaySchedule> {
    prop_oneof![
        (0u64..5000).prop_map(|ms| DelaySchedule::Fixed(Duration::from_millis(ms))),
        prop::collection::vec(0u64..5000, 0..6).prop_map(|delays| DelaySchedule::Backoff(
            delays.into_iter().map(Duration::from_millis).collect()
        )),
    ]
}

fn arb_policy() -> impl Strategy<Value = PollPolicy> {
    (0u32..16, arb_schedule()).prop_map(|(max, schedule)| PollPolicy::new(max, schedule))
}

// ============================================================================
// Driver
// ============================================================================

/// Outcome of running the machine against a status script
struct Trace {
    final_state: PollState,
    fetches: usize,
    waits: Vec<Duration>,
}

/// Run the machine, answering each `FetchStatus` with the next scripted
/// status (repeating `Queued` once the script runs out)
fn drive(policy: &PollPolicy, script: &[RunStatus]) -> Trace {
    let mut statuses = script.iter().copied();
    let mut trace = Trace {
        final_state: PollState::default(),
        fetches: 0,
        waits: vec![],
    };

    let mut event = Event::Start;
    loop {
        let result = transition(&trace.final_state, policy, event).expect("valid transition");
        trace.final_state = result.new_state;

        let mut next = None;
        for effect in result.effects {
            match effect {
                Effect::Wait { delay } => trace.waits.push(delay),
                Effect::FetchStatus => {
                    trace.fetches += 1;
                    next = Some(Event::StatusObserved {
                        status: statuses.next().unwrap_or(RunStatus::Queued),
                    });
                }
            }
        }

        match next {
            Some(e) => event = e,
            None => return trace,
        }
    }
}

fn cap(policy: &PollPolicy) -> usize {
    usize::try_from(policy.max_attempts).unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_always_terminates_within_cap(
        policy in arb_policy(),
        script in prop::collection::vec(arb_status(), 0..20),
    ) {
        let trace = drive(&policy, &script);
        prop_assert!(trace.final_state.is_terminal());
        prop_assert!(trace.fetches <= cap(&policy));
        prop_assert_eq!(trace.fetches, usize::try_from(trace.final_state.checks()).unwrap());
        // Every check is preceded by exactly one wait
        prop_assert_eq!(trace.waits.len(), trace.fetches);
    }

    #[test]
    fn prop_stops_at_first_terminal_status(
        policy in arb_policy(),
        script in prop::collection::vec(arb_status(), 0..20),
    ) {
        let trace = drive(&policy, &script);
        let first_terminal = script
            .iter()
            .position(|s| s.phase() != RunPhase::Pending);

        match first_terminal {
            Some(index) if index < cap(&policy) => {
                prop_assert_eq!(trace.fetches, index + 1);
                match script[index].phase() {
                    RunPhase::Succeeded => prop_assert!(
                        matches!(trace.final_state, PollState::Succeeded { .. }),
                        "expected success, got {:?}",
                        trace.final_state
                    ),
                    RunPhase::Failed => prop_assert_eq!(
                        trace.final_state,
                        PollState::Failed { status: script[index], checks: trace.final_state.checks() }
                    ),
                    RunPhase::Pending => unreachable!(),
                }
            }
            _ => {
                prop_assert_eq!(trace.fetches, cap(&policy));
                prop_assert!(
                    matches!(trace.final_state, PollState::TimedOut { .. }),
                    "expected timeout, got {:?}",
                    trace.final_state
                );
            }
        }
    }

    #[test]
    fn prop_never_succeeds_without_success_status(
        policy in arb_policy(),
        script in prop::collection::vec(arb_pending_status(), 0..20),
    ) {
        let trace = drive(&policy, &script);
        prop_assert_eq!(
            trace.final_state,
            PollState::TimedOut { checks: policy.max_attempts }
        );
    }

    #[test]
    fn prop_waits_follow_schedule(
        policy in arb_policy(),
        script in prop::collection::vec(arb_pending_status(), 0..20),
    ) {
        let trace = drive(&policy, &script);
        for (attempt, delay) in trace.waits.iter().enumerate() {
            let attempt = u32::try_from(attempt).unwrap();
            prop_assert_eq!(*delay, policy.schedule.delay_for(attempt));
        }
    }
}
