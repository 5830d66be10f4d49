//! Execution configuration from TOML (`[execution]` section)

use squad_application::ExecutionParams;
use squad_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution configuration from TOML
///
/// ```toml
/// [execution]
/// max_agents = 8
/// agent_timeout_seconds = 600    # 0 waits indefinitely
/// max_concurrency = 4
/// agent_command = "my-agent-runner --agent {agent} --phase {phase}"
/// working_dir = "."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_agents: usize,
    pub agent_timeout_seconds: u64,
    pub max_concurrency: Option<usize>,
    /// Command template run once per agent
    pub agent_command: Option<String>,
    pub working_dir: Option<String>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            max_agents: 8,
            agent_timeout_seconds: 600,
            max_concurrency: None,
            agent_command: None,
            working_dir: None,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let max_agents = if self.max_agents == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                "execution.max_agents cannot be 0, falling back to 8",
            ));
            8
        } else {
            self.max_agents
        };
        let timeout = (self.agent_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.agent_timeout_seconds));

        let params = ExecutionParams::default()
            .with_max_agents(max_agents)
            .with_agent_timeout(timeout)
            .with_max_concurrency(self.max_concurrency);
        (params, issues)
    }

    /// Check the agent command template, if one is configured.
    pub fn validate_command(&self) -> Vec<ConfigIssue> {
        match &self.agent_command {
            Some(command) if command.trim().is_empty() => vec![ConfigIssue::error(
                ConfigIssueCode::MissingValue,
                "execution.agent_command is empty",
            )],
            Some(command) if !command.contains("{agent}") => vec![ConfigIssue::warning(
                ConfigIssueCode::MissingValue,
                "execution.agent_command has no {agent} placeholder; every agent runs the same command",
            )],
            _ => vec![],
        }
    }
}
