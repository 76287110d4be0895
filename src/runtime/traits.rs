//! Trait abstractions for runtime I/O
//!
//! The outbound service is abstracted by `crate::assistant::AssistantApi`;
//! waiting is abstracted here so polling can be tested without real delays.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Delay strategy used between run status checks
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
