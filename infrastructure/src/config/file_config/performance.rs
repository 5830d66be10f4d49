//! Performance configuration from TOML (`[performance]` section)

use squad_domain::{ConfigIssue, ConfigIssueCode, EffectivenessWeights};
use serde::{Deserialize, Serialize};

/// Raw performance configuration from TOML
///
/// ```toml
/// [performance]
/// finding_rate = 0.3
/// critical_hit_rate = 0.4
/// resolution_rate = 0.2
/// duplication_rate = 0.1
/// min_runs = 20
/// low_performer_cutoff = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePerformanceConfig {
    #[serde(flatten)]
    pub weights: EffectivenessWeights,
}

impl FilePerformanceConfig {
    /// Convert to domain weights, replacing invalid values with defaults.
    pub fn to_weights(&self) -> (EffectivenessWeights, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let defaults = EffectivenessWeights::default();
        let mut weights = self.weights;

        let mut check_weight = |name: &str, value: &mut f64, default: f64| {
            if !value.is_finite() || *value < 0.0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange,
                    format!(
                        "performance.{}: {} must be non-negative, falling back to {}",
                        name, value, default
                    ),
                ));
                *value = default;
            }
        };
        check_weight("finding_rate", &mut weights.finding_rate, defaults.finding_rate);
        check_weight(
            "critical_hit_rate",
            &mut weights.critical_hit_rate,
            defaults.critical_hit_rate,
        );
        check_weight(
            "resolution_rate",
            &mut weights.resolution_rate,
            defaults.resolution_rate,
        );
        check_weight(
            "duplication_rate",
            &mut weights.duplication_rate,
            defaults.duplication_rate,
        );

        if weights.findings_per_run <= 0.0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "performance.findings_per_run must be positive, falling back to {}",
                    defaults.findings_per_run
                ),
            ));
            weights.findings_per_run = defaults.findings_per_run;
        }

        if !(0.0..=1.0).contains(&weights.low_performer_cutoff) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "performance.low_performer_cutoff: {} is outside [0, 1], falling back to {}",
                    weights.low_performer_cutoff, defaults.low_performer_cutoff
                ),
            ));
            weights.low_performer_cutoff = defaults.low_performer_cutoff;
        }

        (weights, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: FilePerformanceConfig = toml::from_str("min_runs = 5").unwrap();
        let (weights, issues) = config.to_weights();
        assert!(issues.is_empty());
        assert_eq!(weights.min_runs, 5);
        assert_eq!(weights.critical_hit_rate, 0.4);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config: FilePerformanceConfig =
            toml::from_str("finding_rate = -1.0\nlow_performer_cutoff = 2.0").unwrap();
        let (weights, issues) = config.to_weights();
        assert_eq!(issues.len(), 2);
        assert_eq!(weights.finding_rate, 0.3);
        assert_eq!(weights.low_performer_cutoff, 0.2);
    }
}
