//! Watcher configuration from TOML (`[watcher]` section)

use squad_application::WatchParams;
use squad_domain::watch::classify::{DEFAULT_INFORMATIONAL, DEFAULT_SUBSTANTIAL};
use squad_domain::{ClassificationMode, ClassificationRules, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw watcher configuration from TOML
///
/// ```toml
/// [watcher]
/// interval_seconds = 300
/// mode = "substance"            # "substance" or "baseline_diff"
/// post_summary = true
/// threshold = 1.0
/// substantial_patterns = ["merged", "PR #\\d+"]
/// informational_patterns = ["FYI"]
/// repo = "owner/name"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWatcherConfig {
    pub interval_seconds: u64,
    pub mode: String,
    pub post_summary: bool,
    pub threshold: f64,
    pub substantial_patterns: Vec<String>,
    pub informational_patterns: Vec<String>,
    /// Default repository for bare issue numbers
    pub repo: Option<String>,
}

impl Default for FileWatcherConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            mode: "substance".to_string(),
            post_summary: true,
            threshold: 1.0,
            substantial_patterns: DEFAULT_SUBSTANTIAL.iter().map(|p| p.to_string()).collect(),
            informational_patterns: DEFAULT_INFORMATIONAL
                .iter()
                .map(|p| p.to_string())
                .collect(),
            repo: None,
        }
    }
}

impl FileWatcherConfig {
    pub fn parse_mode(&self) -> (ClassificationMode, Vec<ConfigIssue>) {
        match self.mode.to_lowercase().replace('-', "_").as_str() {
            "substance" => (ClassificationMode::Substance, vec![]),
            "baseline_diff" | "baseline" | "diff" => (ClassificationMode::BaselineDiff, vec![]),
            _ => (
                ClassificationMode::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue,
                    format!(
                        "watcher.mode: unknown value '{}', falling back to 'substance' \
                         (valid: substance, baseline_diff)",
                        self.mode
                    ),
                )],
            ),
        }
    }

    /// Compile the classification patterns. An invalid regex is an error and
    /// the built-in rules are used instead.
    pub fn to_rules(&self) -> (ClassificationRules, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let threshold = if self.threshold.is_finite() && self.threshold > 0.0 {
            self.threshold
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "watcher.threshold: {} must be positive, falling back to 1.0",
                    self.threshold
                ),
            ));
            1.0
        };

        match ClassificationRules::new(
            &self.substantial_patterns,
            &self.informational_patterns,
            threshold,
        ) {
            Ok(rules) => (rules, issues),
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidPattern,
                    format!("watcher: {}", e),
                ));
                let mut rules = ClassificationRules::default();
                rules.threshold = threshold;
                (rules, issues)
            }
        }
    }

    pub fn to_params(&self) -> (WatchParams, Vec<ConfigIssue>) {
        let (mode, mut issues) = self.parse_mode();
        let interval = if self.interval_seconds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                "watcher.interval_seconds cannot be 0, falling back to 300",
            ));
            Duration::from_secs(300)
        } else {
            Duration::from_secs(self.interval_seconds)
        };
        let params = WatchParams::default()
            .with_interval(interval)
            .with_mode(mode)
            .with_post_summary(self.post_summary);
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileWatcherConfig::default();
        assert!(config.parse_mode().1.is_empty());
        assert!(config.to_rules().1.is_empty());
        let (params, issues) = config.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.interval, Duration::from_secs(300));
        assert_eq!(params.mode, ClassificationMode::Substance);
    }

    #[test]
    fn test_baseline_mode_aliases() {
        let config = FileWatcherConfig {
            mode: "baseline-diff".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_mode().0, ClassificationMode::BaselineDiff);
    }

    #[test]
    fn test_unknown_mode_warns() {
        let config = FileWatcherConfig {
            mode: "vibes".to_string(),
            ..Default::default()
        };
        let (mode, issues) = config.parse_mode();
        assert_eq!(mode, ClassificationMode::Substance);
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidEnumValue);
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let config = FileWatcherConfig {
            substantial_patterns: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        let (_, issues) = config.to_rules();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidPattern);
    }
}
