//! Classifier configuration from TOML (`[classifier]` section)

use serde::{Deserialize, Serialize};

/// Raw classifier configuration from TOML
///
/// ```toml
/// [classifier]
/// command = "task-classifier --json"
/// timeout_seconds = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClassifierConfig {
    /// Command that reads a description on stdin and prints a task profile
    pub command: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for FileClassifierConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_seconds: 120,
        }
    }
}
