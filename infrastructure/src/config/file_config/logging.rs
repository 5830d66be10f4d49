//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// dir = "~/.local/state/review-squad/logs"
/// file_prefix = "review-squad.log"
/// filter = "squad_application=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily rolling log files; unset disables file logging
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    /// Extra `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "review-squad.log".to_string(),
            filter: None,
        }
    }
}
