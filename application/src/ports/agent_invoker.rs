//! Agent invocation port
//!
//! Defines how the coordinator runs a single reviewer agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use squad_domain::{Finding, TaskProfile};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running an agent
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Agent failed: {0}")]
    Failed(String),

    #[error("Agent timed out after {0:?}")]
    Timeout(Duration),

    #[error("Could not start agent: {0}")]
    Spawn(String),

    #[error("Invalid agent output: {0}")]
    InvalidOutput(String),

    #[error("{0}")]
    Denied(String),
}

/// What an agent is told about the phase it runs in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseContext {
    pub phase_number: u32,
    pub phase_name: String,
    pub task_summary: String,
    pub profile: TaskProfile,
    /// Findings from earlier phases, already deduplicated
    pub prior_findings: Vec<Finding>,
}

/// Runs one agent and returns its findings
///
/// Implementations live in the infrastructure layer. There is no built-in
/// fallback: an agent that cannot run returns an error.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(
        &self,
        agent: &str,
        context: &PhaseContext,
    ) -> Result<Vec<Finding>, InvocationError>;
}
