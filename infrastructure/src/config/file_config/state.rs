//! State file locations from TOML (`[state]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "review-squad";

/// Raw state configuration from TOML
///
/// Each path falls back to a file under `dir`, which itself defaults to
/// `$XDG_DATA_HOME/review-squad`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStateConfig {
    pub dir: Option<PathBuf>,
    pub performance_file: Option<PathBuf>,
    pub watch_file: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
}

impl FileStateConfig {
    pub fn state_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(".review-squad"))
        })
    }

    pub fn performance_path(&self) -> PathBuf {
        self.performance_file
            .clone()
            .unwrap_or_else(|| self.state_dir().join("agent_performance.json"))
    }

    pub fn watch_path(&self) -> PathBuf {
        self.watch_file
            .clone()
            .unwrap_or_else(|| self.state_dir().join("watched_issues.json"))
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.event_log
            .clone()
            .unwrap_or_else(|| self.state_dir().join("watch_events.jsonl"))
    }
}
