//! Task classification adapters

use super::process::{ProcessError, run_with_input};
use async_trait::async_trait;
use squad_application::{ClassifierError, TaskClassifier};
use squad_domain::TaskProfile;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Runs an external classifier: description on stdin, `TaskProfile` JSON on stdout.
pub struct CommandTaskClassifier {
    command: String,
    timeout: Duration,
}

impl CommandTaskClassifier {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TaskClassifier for CommandTaskClassifier {
    async fn classify(&self, description: &str) -> Result<TaskProfile, ClassifierError> {
        debug!(command = %self.command, "Classifying task");
        let output = run_with_input(
            &self.command,
            description.as_bytes(),
            None,
            &[],
            Some(self.timeout),
        )
        .await
        .map_err(|e| match e {
            ProcessError::Timeout(limit) => {
                ClassifierError::Failed(format!("classifier timed out after {:?}", limit))
            }
            other => ClassifierError::Failed(other.to_string()),
        })?;

        parse_profile(&String::from_utf8_lossy(&output.stdout))
    }
}

pub fn parse_profile(json: &str) -> Result<TaskProfile, ClassifierError> {
    let profile: TaskProfile = serde_json::from_str(json.trim())
        .map_err(|e| ClassifierError::InvalidProfile(e.to_string()))?;
    if let Some((name, value)) = profile
        .dimensions
        .iter()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        return Err(ClassifierError::InvalidProfile(format!(
            "dimension '{}' has importance {} outside [0, 1]",
            name, value
        )));
    }
    Ok(profile)
}

/// Read a pre-classified profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<TaskProfile, ClassifierError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ClassifierError::InvalidProfile(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_profile(&content)
}
