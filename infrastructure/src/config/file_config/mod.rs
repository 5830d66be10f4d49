//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain and application
//! types by the `to_*` methods, which report problems as [`ConfigIssue`]s.

mod catalog;
mod classifier;
mod execution;
mod logging;
mod output;
mod performance;
mod permissions;
mod selection;
mod state;
mod watcher;

pub use catalog::FileCatalogConfig;
pub use classifier::FileClassifierConfig;
pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use performance::FilePerformanceConfig;
pub use permissions::FilePermissionConfig;
pub use selection::FileSelectionConfig;
pub use state::FileStateConfig;
pub use watcher::FileWatcherConfig;

use serde::{Deserialize, Serialize};
use squad_domain::{ConfigIssue, PermissionPolicy};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Team selection tunables
    pub selection: FileSelectionConfig,
    /// Effectiveness score weights
    pub performance: FilePerformanceConfig,
    /// Issue watcher settings
    pub watcher: FileWatcherConfig,
    /// Plan execution settings
    pub execution: FileExecutionConfig,
    /// External task classifier
    pub classifier: FileClassifierConfig,
    /// Agent catalog location
    pub catalog: FileCatalogConfig,
    /// Per-agent permission overrides
    pub permissions: BTreeMap<String, FilePermissionConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
    /// State file locations
    pub state: FileStateConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.selection.to_tunables().1);
        issues.extend(self.performance.to_weights().1);
        issues.extend(self.watcher.to_params().1);
        issues.extend(self.watcher.to_rules().1);
        issues.extend(self.execution.to_params().1);
        issues.extend(self.execution.validate_command());
        issues.extend(self.permission_overrides().1);
        issues
    }

    /// Valid `[permissions.<agent>]` overrides, in agent order.
    pub fn permission_overrides(&self) -> (Vec<PermissionPolicy>, Vec<ConfigIssue>) {
        let mut policies = Vec::new();
        let mut issues = Vec::new();
        for (agent, entry) in &self.permissions {
            let (policy, entry_issues) = entry.to_policy(agent);
            policies.extend(policy);
            issues.extend(entry_issues);
        }
        (policies, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_domain::{Action, ClassificationMode, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[selection]
coordinator_threshold = 4
strict_exclusion = true

[performance]
min_runs = 10

[watcher]
interval_seconds = 60
mode = "baseline_diff"

[execution]
max_agents = 5
agent_command = "runner --agent {agent}"

[permissions.release-manager]
level = "signer"
permitted = ["deploy"]
deny = "no_delete"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.selection.coordinator_threshold, 4);
        assert!(config.selection.strict_exclusion);
        assert_eq!(config.performance.weights.min_runs, 10);
        assert_eq!(config.watcher.parse_mode().0, ClassificationMode::BaselineDiff);
        assert_eq!(config.execution.to_params().0.max_agents, 5);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);

        let (policies, issues) = config.permission_overrides();
        assert!(issues.is_empty());
        assert!(policies[0].allows(Action::Deploy));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[watcher]\npost_summary = false\n").unwrap();
        assert!(!config.watcher.post_summary);
        assert_eq!(config.watcher.interval_seconds, 300);
        assert_eq!(config.execution.max_agents, 8);
        assert!(config.permissions.is_empty());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[selection]
dimension_threshold = 3.0

[watcher]
mode = "sometimes"
substantial_patterns = ["(bad"]

[permissions.x]
level = "root"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }
}
