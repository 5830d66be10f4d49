//! Selection configuration from TOML (`[selection]` section)

use squad_domain::config::Severity;
use squad_domain::{ConfigIssue, ConfigIssueCode, SelectionTunables, TaskType, TierHours, TierWeights};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw selection configuration from TOML
///
/// # Example
///
/// ```toml
/// [selection]
/// dimension_threshold = 0.3
/// coordinator_threshold = 6
/// strict_exclusion = false
///
/// [selection.domain_agents]
/// payments = "payment-integration"
/// ```
///
/// `domain_agents` and `task_type_agents` extend the built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    pub dimension_threshold: f64,
    pub per_dimension: usize,
    pub per_language: usize,
    pub per_domain: usize,
    pub coordinator_threshold: usize,
    pub coordinator: String,
    pub coordinator_overhead_hours: f64,
    pub generalist: String,
    pub strict_exclusion: bool,
    pub tier_weights: TierWeights,
    pub tier_hours: TierHours,
    pub domain_agents: BTreeMap<String, String>,
    pub task_type_agents: BTreeMap<String, String>,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        let tunables = SelectionTunables::default();
        Self {
            dimension_threshold: tunables.dimension_threshold,
            per_dimension: tunables.per_dimension,
            per_language: tunables.per_language,
            per_domain: tunables.per_domain,
            coordinator_threshold: tunables.coordinator_threshold,
            coordinator: tunables.coordinator,
            coordinator_overhead_hours: tunables.coordinator_overhead_hours,
            generalist: tunables.generalist,
            strict_exclusion: tunables.strict_exclusion,
            tier_weights: tunables.tier_weights,
            tier_hours: tunables.tier_hours,
            domain_agents: BTreeMap::new(),
            task_type_agents: BTreeMap::new(),
        }
    }
}

impl FileSelectionConfig {
    /// Convert to domain tunables. Out-of-range values fall back to defaults.
    pub fn to_tunables(&self) -> (SelectionTunables, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let defaults = SelectionTunables::default();

        let dimension_threshold = if (0.0..=1.0).contains(&self.dimension_threshold) {
            self.dimension_threshold
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "selection.dimension_threshold: {} is outside [0, 1], falling back to {}",
                    self.dimension_threshold, defaults.dimension_threshold
                ),
            ));
            defaults.dimension_threshold
        };

        let coordinator = if self.coordinator.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingValue,
                format!(
                    "selection.coordinator is empty, falling back to '{}'",
                    defaults.coordinator
                ),
            ));
            defaults.coordinator.clone()
        } else {
            self.coordinator.clone()
        };

        let generalist = if self.generalist.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingValue,
                format!(
                    "selection.generalist is empty, falling back to '{}'",
                    defaults.generalist
                ),
            ));
            defaults.generalist.clone()
        } else {
            self.generalist.clone()
        };

        if self.coordinator_overhead_hours < 0.0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange,
                message: "selection.coordinator_overhead_hours cannot be negative".to_string(),
            });
        }

        let mut task_type_agents = defaults.task_type_agents.clone();
        for (task_type, agent) in &self.task_type_agents {
            match task_type.parse::<TaskType>() {
                Ok(parsed) => {
                    task_type_agents.insert(parsed.as_str().to_string(), agent.clone());
                }
                Err(_) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue,
                    format!(
                        "selection.task_type_agents: unknown task type '{}', entry ignored",
                        task_type
                    ),
                )),
            }
        }

        let mut domain_agents = defaults.domain_agents.clone();
        domain_agents.extend(
            self.domain_agents
                .iter()
                .map(|(domain, agent)| (domain.to_lowercase(), agent.clone())),
        );

        let tunables = SelectionTunables {
            dimension_threshold,
            per_dimension: self.per_dimension,
            per_language: self.per_language,
            per_domain: self.per_domain,
            coordinator_threshold: self.coordinator_threshold,
            coordinator,
            coordinator_overhead_hours: self.coordinator_overhead_hours.max(0.0),
            generalist,
            strict_exclusion: self.strict_exclusion,
            tier_weights: self.tier_weights,
            tier_hours: self.tier_hours,
            domain_agents,
            task_type_agents,
            ..defaults
        };
        (tunables, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_domain_tunables() {
        let (tunables, issues) = FileSelectionConfig::default().to_tunables();
        assert!(issues.is_empty());
        assert_eq!(tunables, SelectionTunables::default());
    }

    #[test]
    fn test_tables_extend_defaults() {
        let config: FileSelectionConfig = toml::from_str(
            r#"
strict_exclusion = true

[domain_agents]
Gaming = "game-developer"

[task_type_agents]
bug-fix = "debugger-pro"
"#,
        )
        .unwrap();
        let (tunables, issues) = config.to_tunables();
        assert!(issues.is_empty());
        assert!(tunables.strict_exclusion);
        assert_eq!(tunables.domain_agents["gaming"], "game-developer");
        assert!(tunables.domain_agents.contains_key("security"));
        assert_eq!(tunables.task_type_agents["bug_fix"], "debugger-pro");
    }

    #[test]
    fn test_out_of_range_threshold_falls_back() {
        let config = FileSelectionConfig {
            dimension_threshold: 1.5,
            ..Default::default()
        };
        let (tunables, issues) = config.to_tunables();
        assert_eq!(tunables.dimension_threshold, 0.3);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::OutOfRange);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_unknown_task_type_is_reported() {
        let mut config = FileSelectionConfig::default();
        config
            .task_type_agents
            .insert("rewrite".to_string(), "x".to_string());
        let (_, issues) = config.to_tunables();
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidEnumValue);
    }
}
