//! Execution parameters: plan execution control.
//!
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plan execution control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Upper bound on team size passed to the selector.
    pub max_agents: usize,
    /// Timeout for a single agent invocation; `None` waits indefinitely.
    pub agent_timeout: Option<Duration>,
    /// Maximum agents running at once within a phase; `None` is unbounded.
    pub max_concurrency: Option<usize>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_agents: 8,
            agent_timeout: Some(Duration::from_secs(600)),
            max_concurrency: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_agents(mut self, max: usize) -> Self {
        self.max_agents = max;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: Option<usize>) -> Self {
        self.max_concurrency = max.filter(|m| *m > 0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_agents, 8);
        assert_eq!(params.agent_timeout, Some(Duration::from_secs(600)));
        assert_eq!(params.max_concurrency, None);
    }

    #[test]
    fn test_zero_concurrency_means_unbounded() {
        let params = ExecutionParams::default().with_max_concurrency(Some(0));
        assert_eq!(params.max_concurrency, None);
        let params = ExecutionParams::default().with_max_concurrency(Some(2));
        assert_eq!(params.max_concurrency, Some(2));
    }
}
