//! Runtime for relaying chat turns
//!
//! Executes the outbound calls for one request and drives the polling
//! state machine against the live run.

mod error;
mod relay;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use error::{RelayError, Stage};
pub use relay::{ChatRelay, RelayReply};
pub use traits::*;
