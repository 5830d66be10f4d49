//! Re-review trigger port
//!
//! The watcher calls this when an issue update is judged worth a new review.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Re-review failed for {issue_id}: {message}")]
pub struct TriggerError {
    pub issue_id: String,
    pub message: String,
}

#[async_trait]
pub trait ReviewTrigger: Send + Sync {
    async fn trigger(&self, issue_id: &str, reason: &str) -> Result<(), TriggerError>;
}

/// Trigger that only logs; used when no review pipeline is wired.
pub struct LogOnlyTrigger;

#[async_trait]
impl ReviewTrigger for LogOnlyTrigger {
    async fn trigger(&self, issue_id: &str, reason: &str) -> Result<(), TriggerError> {
        tracing::info!("Re-review requested for issue {}: {}", issue_id, reason);
        Ok(())
    }
}
