//! Permission policy for a single agent.

use super::scope::{Action, DenyFamily, ScopeLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Structured denial raised by a hard permission check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Permission denied: agent '{agent_id}' may not {action}. {escalation}")]
pub struct PermissionDenied {
    pub agent_id: String,
    pub action: Action,
    pub escalation: String,
}

/// Immutable permission policy for one agent.
///
/// `prohibited` always wins over `permitted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionPolicy {
    agent_id: String,
    level: ScopeLevel,
    deny: DenyFamily,
    permitted: BTreeSet<Action>,
    prohibited: BTreeSet<Action>,
    escalation: String,
}

impl PermissionPolicy {
    /// Build a policy from a ladder rung and a deny family.
    pub fn new(agent_id: impl Into<String>, level: ScopeLevel, deny: DenyFamily) -> Self {
        let agent_id = agent_id.into();
        let escalation = default_escalation(&agent_id, level);
        Self {
            agent_id,
            level,
            deny,
            permitted: level.actions(),
            prohibited: deny.actions(),
            escalation,
        }
    }

    /// Zero-scope policy synthesized for agents missing from the registry.
    pub fn deny_all(agent_id: impl Into<String>) -> Self {
        let agent_id = agent_id.into();
        let escalation = format!(
            "Agent '{}' has no registered permission policy; register one before it acts.",
            agent_id
        );
        Self {
            agent_id,
            level: ScopeLevel::None,
            deny: DenyFamily::None,
            permitted: BTreeSet::new(),
            prohibited: BTreeSet::new(),
            escalation,
        }
    }

    // ==================== Builder Methods ====================

    /// Grant actions beyond the ladder rung. A deny family still wins.
    pub fn with_extra_permitted(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.permitted.extend(actions);
        self
    }

    /// Prohibit additional actions.
    pub fn with_extra_prohibited(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.prohibited.extend(actions);
        self
    }

    pub fn with_escalation(mut self, message: impl Into<String>) -> Self {
        self.escalation = message.into();
        self
    }

    // ==================== Accessors ====================

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Ladder rung; used for privilege comparisons between policies.
    pub fn privilege(&self) -> ScopeLevel {
        self.level
    }

    pub fn deny_family(&self) -> DenyFamily {
        self.deny
    }

    pub fn permitted(&self) -> &BTreeSet<Action> {
        &self.permitted
    }

    pub fn prohibited(&self) -> &BTreeSet<Action> {
        &self.prohibited
    }

    pub fn escalation(&self) -> &str {
        &self.escalation
    }

    /// Prohibited wins; otherwise allowed iff permitted.
    pub fn allows(&self, action: Action) -> bool {
        if self.prohibited.contains(&action) {
            return false;
        }
        self.permitted.contains(&action)
    }

    /// Actions this policy effectively allows.
    pub fn effective_actions(&self) -> BTreeSet<Action> {
        self.permitted.difference(&self.prohibited).copied().collect()
    }

    pub fn denial(&self, action: Action) -> PermissionDenied {
        PermissionDenied {
            agent_id: self.agent_id.clone(),
            action,
            escalation: self.escalation.clone(),
        }
    }
}

fn default_escalation(agent_id: &str, level: ScopeLevel) -> String {
    format!(
        "Agent '{}' is limited to the {} scope; escalate to a human maintainer.",
        agent_id, level
    )
}
