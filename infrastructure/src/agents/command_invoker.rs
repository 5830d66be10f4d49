//! Agent invoker that runs an external command per agent
//!
//! The command template may use `{agent}`, `{phase}` and `{phase_name}`.
//! The [`PhaseContext`] is written to stdin as JSON; the command prints its
//! findings to stdout as a JSON array (or an object with a `findings` array).

use super::process::{ProcessError, run_with_input, shell_quote};
use async_trait::async_trait;
use serde::Deserialize;
use squad_application::{AgentInvoker, InvocationError, PhaseContext};
use squad_domain::Finding;
use std::time::Duration;
use tracing::debug;

pub struct CommandAgentInvoker {
    template: String,
    working_dir: Option<String>,
    timeout: Option<Duration>,
}

impl CommandAgentInvoker {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            working_dir: None,
            timeout: None,
        }
    }

    pub fn with_working_dir(mut self, dir: Option<String>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Process-level timeout. The coordinator applies its own per-agent
    /// timeout as well; this one also kills the child.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn render(&self, agent: &str, context: &PhaseContext) -> String {
        self.template
            .replace("{agent}", &shell_quote(agent))
            .replace("{phase}", &context.phase_number.to_string())
            .replace("{phase_name}", &shell_quote(&context.phase_name))
    }
}

#[async_trait]
impl AgentInvoker for CommandAgentInvoker {
    async fn invoke(
        &self,
        agent: &str,
        context: &PhaseContext,
    ) -> Result<Vec<Finding>, InvocationError> {
        let command = self.render(agent, context);
        let payload = serde_json::to_vec(context)
            .map_err(|e| InvocationError::Failed(format!("cannot encode context: {}", e)))?;
        let envs = [
            ("REVIEW_SQUAD_AGENT", agent.to_string()),
            ("REVIEW_SQUAD_PHASE", context.phase_number.to_string()),
        ];

        debug!(agent, phase = context.phase_number, %command, "Invoking agent");
        let output = run_with_input(
            &command,
            &payload,
            self.working_dir.as_deref(),
            &envs,
            self.timeout,
        )
        .await
        .map_err(|e| match e {
            ProcessError::Spawn { message, .. } => InvocationError::Spawn(message),
            ProcessError::Timeout(limit) => InvocationError::Timeout(limit),
            other => InvocationError::Failed(other.to_string()),
        })?;

        let findings = parse_findings(&String::from_utf8_lossy(&output.stdout))?;
        debug!(agent, count = findings.len(), "Agent finished");
        Ok(findings)
    }
}

#[derive(Deserialize)]
struct FindingsEnvelope {
    findings: Vec<Finding>,
}

/// Parse agent stdout. Empty output means no findings.
pub fn parse_findings(stdout: &str) -> Result<Vec<Finding>, InvocationError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| InvocationError::InvalidOutput(e.to_string()));
    }
    serde_json::from_str::<FindingsEnvelope>(trimmed)
        .map(|envelope| envelope.findings)
        .map_err(|e| InvocationError::InvalidOutput(e.to_string()))
}
