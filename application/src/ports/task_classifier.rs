//! Task classifier port

use async_trait::async_trait;
use squad_domain::TaskProfile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier failed: {0}")]
    Failed(String),

    #[error("Invalid task profile: {0}")]
    InvalidProfile(String),

    #[error("Classifier not configured")]
    NotConfigured,
}

/// Produces a [`TaskProfile`] from a free-text task description
#[async_trait]
pub trait TaskClassifier: Send + Sync {
    async fn classify(&self, description: &str) -> Result<TaskProfile, ClassifierError>;
}
