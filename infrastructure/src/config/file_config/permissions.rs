//! Permission overrides from TOML (`[permissions.<agent>]` tables)

use squad_domain::{
    Action, ConfigIssue, ConfigIssueCode, DenyFamily, PermissionPolicy, ScopeLevel,
};
use serde::{Deserialize, Serialize};

/// One agent's permission override
///
/// ```toml
/// [permissions.release-manager]
/// level = "signer"
/// deny = "no_delete"
/// permitted = ["deploy"]
/// escalation = "Ask #release for approval"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePermissionConfig {
    pub level: String,
    pub deny: String,
    /// Actions added on top of the level
    pub permitted: Vec<String>,
    /// Actions removed regardless of level
    pub prohibited: Vec<String>,
    pub escalation: Option<String>,
}

impl Default for FilePermissionConfig {
    fn default() -> Self {
        Self {
            level: "read_only".to_string(),
            deny: "no_delete_no_deploy".to_string(),
            permitted: Vec::new(),
            prohibited: Vec::new(),
            escalation: None,
        }
    }
}

impl FilePermissionConfig {
    /// Build a policy for `agent`. Any invalid entry drops the whole
    /// override so the agent keeps its category default.
    pub fn to_policy(&self, agent: &str) -> (Option<PermissionPolicy>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let invalid = |field: &str, value: &str, err: String| {
            ConfigIssue::error(
                ConfigIssueCode::InvalidPermission,
                format!("permissions.{}.{}: '{}': {}", agent, field, value, err),
            )
        };

        let level = self
            .level
            .parse::<ScopeLevel>()
            .map_err(|e| issues.push(invalid("level", &self.level, e)))
            .ok();
        let deny = self
            .deny
            .parse::<DenyFamily>()
            .map_err(|e| issues.push(invalid("deny", &self.deny, e)))
            .ok();

        let mut parse_actions = |field: &str, values: &[String]| -> Vec<Action> {
            values
                .iter()
                .filter_map(|v| {
                    v.parse::<Action>()
                        .map_err(|e| issues.push(invalid(field, v, e)))
                        .ok()
                })
                .collect()
        };
        let permitted = parse_actions("permitted", &self.permitted);
        let prohibited = parse_actions("prohibited", &self.prohibited);

        if !issues.is_empty() {
            return (None, issues);
        }
        let (Some(level), Some(deny)) = (level, deny) else {
            return (None, issues);
        };

        let mut policy = PermissionPolicy::new(agent, level, deny)
            .with_extra_permitted(permitted)
            .with_extra_prohibited(prohibited);
        if let Some(ref escalation) = self.escalation {
            policy = policy.with_escalation(escalation.clone());
        }
        (Some(policy), issues)
    }
}
