//! Issue watcher parameters.

use serde::{Deserialize, Serialize};
use squad_domain::ClassificationMode;
use std::time::Duration;

/// Issue watcher control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchParams {
    /// Delay between poll cycles.
    pub interval: Duration,
    pub mode: ClassificationMode,
    /// Post a dated summary comment after a substantial update.
    pub post_summary: bool,
}

impl Default for WatchParams {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            mode: ClassificationMode::Substance,
            post_summary: true,
        }
    }
}

impl WatchParams {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_mode(mut self, mode: ClassificationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_post_summary(mut self, post: bool) -> Self {
        self.post_summary = post;
        self
    }
}
