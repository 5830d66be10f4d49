//! Issue tracker port
//!
//! Read and comment access to external issues.

use async_trait::async_trait;
use squad_domain::IssueSnapshot;
use thiserror::Error;

/// Errors from the issue tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Tracker command failed: {0}")]
    CommandFailed(String),

    #[error("Failed to parse tracker response: {0}")]
    Parse(String),

    #[error("Tracker not available: {0}")]
    NotAvailable(String),
}

#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch title, description, comments, labels and modification time.
    async fn fetch(&self, issue_id: &str) -> Result<IssueSnapshot, TrackerError>;

    /// Post a comment on the issue.
    async fn post_comment(&self, issue_id: &str, body: &str) -> Result<(), TrackerError>;
}
