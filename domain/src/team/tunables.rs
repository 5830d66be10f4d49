//! Selection tunables.
//!
//! None of these values come from a model; they are starting points and can
//! be overridden from the `[selection]` config section.

use crate::catalog::ModelTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rank points per model tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            low: 4.0,
            mid: 7.0,
            high: 10.0,
        }
    }
}

impl TierWeights {
    pub fn for_tier(&self, tier: ModelTier) -> f64 {
        match tier {
            ModelTier::Low => self.low,
            ModelTier::Mid => self.mid,
            ModelTier::High => self.high,
        }
    }
}

/// Estimated review hours per model tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierHours {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Default for TierHours {
    fn default() -> Self {
        Self {
            low: 0.5,
            mid: 1.0,
            high: 1.5,
        }
    }
}

impl TierHours {
    pub fn for_tier(&self, tier: ModelTier) -> f64 {
        match tier {
            ModelTier::Low => self.low,
            ModelTier::Mid => self.mid,
            ModelTier::High => self.high,
        }
    }
}

/// Thresholds, weights and lookup tables used by [`TeamSelector`](super::TeamSelector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionTunables {
    /// Dimensions must score strictly above this to pull in reviewers.
    pub dimension_threshold: f64,
    pub per_dimension: usize,
    pub per_language: usize,
    pub per_domain: usize,

    // ==================== Rank Weights ====================
    /// Points for a dimension match, scaled by importance.
    pub dimension_weight: f64,
    pub language_weight: f64,
    pub domain_weight: f64,
    pub tier_weights: TierWeights,

    // ==================== Team Shape ====================
    /// A coordinator joins when more than this many specialists are selected.
    pub coordinator_threshold: usize,
    pub coordinator: String,
    pub peer_to_peer_max: usize,
    pub master_worker_max: usize,
    pub tier_hours: TierHours,
    pub coordinator_overhead_hours: f64,

    // ==================== Lookups ====================
    /// Domain → agent name
    pub domain_agents: BTreeMap<String, String>,
    /// Task type (snake_case) → implementation specialist
    pub task_type_agents: BTreeMap<String, String>,
    /// Fallback implementation agent
    pub generalist: String,

    /// Drop low performers from candidates (advisory otherwise).
    pub strict_exclusion: bool,
}

impl Default for SelectionTunables {
    fn default() -> Self {
        Self {
            dimension_threshold: 0.3,
            per_dimension: 2,
            per_language: 1,
            per_domain: 1,
            dimension_weight: 40.0,
            language_weight: 30.0,
            domain_weight: 20.0,
            tier_weights: TierWeights::default(),
            coordinator_threshold: 6,
            coordinator: "review-coordinator".to_string(),
            peer_to_peer_max: 3,
            master_worker_max: 6,
            tier_hours: TierHours::default(),
            coordinator_overhead_hours: 1.0,
            domain_agents: default_domain_agents(),
            task_type_agents: default_task_type_agents(),
            generalist: "general-purpose".to_string(),
            strict_exclusion: false,
        }
    }
}

fn default_domain_agents() -> BTreeMap<String, String> {
    [
        ("security", "security-auditor"),
        ("authentication", "security-auditor"),
        ("payments", "payment-integration"),
        ("database", "database-optimizer"),
        ("frontend", "frontend-developer"),
        ("mobile", "mobile-developer"),
        ("cloud", "cloud-architect"),
        ("infrastructure", "deployment-engineer"),
        ("machine-learning", "ml-engineer"),
        ("api", "api-documenter"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_task_type_agents() -> BTreeMap<String, String> {
    [
        ("feature", "fullstack-developer"),
        ("bug_fix", "debugger"),
        ("refactor", "refactoring-specialist"),
        ("security", "security-auditor"),
        ("performance", "performance-engineer"),
        ("documentation", "docs-architect"),
        ("testing", "test-automator"),
        ("infrastructure", "deployment-engineer"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tunables = SelectionTunables::default();
        assert_eq!(tunables.dimension_threshold, 0.3);
        assert_eq!(tunables.per_dimension, 2);
        assert_eq!(tunables.coordinator, "review-coordinator");
        assert_eq!(tunables.tier_weights.for_tier(ModelTier::High), 10.0);
        assert_eq!(tunables.task_type_agents["bug_fix"], "debugger");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{"dimension_threshold": 0.5, "tier_hours": {"high": 2.0}}"#;
        let tunables: SelectionTunables = serde_json::from_str(json).unwrap();
        assert_eq!(tunables.dimension_threshold, 0.5);
        assert_eq!(tunables.tier_hours.high, 2.0);
        assert_eq!(tunables.tier_hours.low, 0.5);
        assert_eq!(tunables.per_language, 1);
    }
}
