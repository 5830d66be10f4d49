//! Task profile: the classified description of a code-change task.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of change the task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Feature,
    BugFix,
    Refactor,
    Security,
    Performance,
    Documentation,
    Testing,
    Infrastructure,
    #[default]
    Other,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Feature => "feature",
            TaskType::BugFix => "bug_fix",
            TaskType::Refactor => "refactor",
            TaskType::Security => "security",
            TaskType::Performance => "performance",
            TaskType::Documentation => "documentation",
            TaskType::Testing => "testing",
            TaskType::Infrastructure => "infrastructure",
            TaskType::Other => "other",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "feature" => Ok(TaskType::Feature),
            "bug_fix" | "bugfix" | "bug" | "fix" => Ok(TaskType::BugFix),
            "refactor" | "refactoring" => Ok(TaskType::Refactor),
            "security" => Ok(TaskType::Security),
            "performance" | "perf" => Ok(TaskType::Performance),
            "documentation" | "docs" => Ok(TaskType::Documentation),
            "testing" | "test" | "tests" => Ok(TaskType::Testing),
            "infrastructure" | "infra" => Ok(TaskType::Infrastructure),
            "other" => Ok(TaskType::Other),
            _ => Err(format!("Invalid TaskType: {}", s)),
        }
    }
}

/// Complexity tier assigned by the classifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityTier::Low => write!(f, "low"),
            ComplexityTier::Medium => write!(f, "medium"),
            ComplexityTier::High => write!(f, "high"),
            ComplexityTier::Critical => write!(f, "critical"),
        }
    }
}

/// Classified description of a code-change task.
///
/// `dimensions` maps a review dimension name (e.g. "security") to its
/// importance in `[0, 1]`. A `BTreeMap` keeps iteration order stable so
/// selection is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskProfile {
    pub task_type: TaskType,
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub domains: Vec<String>,
    pub complexity: ComplexityTier,
    pub dimensions: BTreeMap<String, f64>,
}

impl TaskProfile {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            ..Default::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.frameworks.push(framework.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    /// Add a dimension; the importance is clamped into `[0, 1]`.
    pub fn with_dimension(mut self, name: impl Into<String>, importance: f64) -> Self {
        self.dimensions.insert(name.into(), clamp_unit(importance));
        self
    }

    // ==================== Queries ====================

    /// Primary (first detected) language, if any.
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    /// Importance of a dimension, `0.0` if absent.
    pub fn importance(&self, dimension: &str) -> f64 {
        self.dimensions.get(dimension).copied().unwrap_or(0.0)
    }

    /// Dimensions strictly above `threshold`, most important first.
    ///
    /// Ties keep alphabetical order.
    pub fn dimensions_above(&self, threshold: f64) -> Vec<(&str, f64)> {
        let mut dims: Vec<(&str, f64)> = self
            .dimensions
            .iter()
            .filter(|(_, score)| **score > threshold)
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        dims.sort_by(|a, b| b.1.total_cmp(&a.1));
        dims
    }

    /// The highest-importance dimension, if any dimension is scored.
    pub fn top_dimension(&self) -> Option<(&str, f64)> {
        self.dimensions_above(f64::NEG_INFINITY).into_iter().next()
    }

    /// Whether `language` was detected (case-insensitive).
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    /// Whether `domain` was detected (case-insensitive).
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    /// One-line summary used in logs and phase contexts.
    pub fn summary(&self) -> String {
        format!(
            "{} task ({} complexity), languages: [{}], domains: [{}]",
            self.task_type,
            self.complexity,
            self.languages.join(", "),
            self.domains.join(", ")
        )
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_above_sorted_desc() {
        let profile = TaskProfile::new(TaskType::Feature)
            .with_dimension("security", 0.9)
            .with_dimension("performance", 0.3)
            .with_dimension("architecture", 0.6);

        let dims = profile.dimensions_above(0.3);
        assert_eq!(dims, vec![("security", 0.9), ("architecture", 0.6)]);
    }

    #[test]
    fn test_dimension_importance_is_clamped() {
        let profile = TaskProfile::default()
            .with_dimension("security", 1.7)
            .with_dimension("style", -2.0);
        assert_eq!(profile.importance("security"), 1.0);
        assert_eq!(profile.importance("style"), 0.0);
        assert_eq!(profile.importance("missing"), 0.0);
    }

    #[test]
    fn test_top_dimension() {
        let profile = TaskProfile::default()
            .with_dimension("testing", 0.2)
            .with_dimension("security", 0.4);
        assert_eq!(profile.top_dimension(), Some(("security", 0.4)));
        assert_eq!(TaskProfile::default().top_dimension(), None);
    }

    #[test]
    fn test_task_type_from_str() {
        assert_eq!("bug-fix".parse::<TaskType>().ok(), Some(TaskType::BugFix));
        assert_eq!("Docs".parse::<TaskType>().ok(), Some(TaskType::Documentation));
        assert!("unknown".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_deserialize_partial_profile() {
        let json = r#"{"task_type": "security", "languages": ["rust"], "dimensions": {"security": 0.8}}"#;
        let profile: TaskProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.task_type, TaskType::Security);
        assert_eq!(profile.primary_language(), Some("rust"));
        assert_eq!(profile.complexity, ComplexityTier::Medium);
        assert!(profile.domains.is_empty());
    }

    #[test]
    fn test_has_language_case_insensitive() {
        let profile = TaskProfile::default().with_language("Rust");
        assert!(profile.has_language("rust"));
        assert!(!profile.has_language("go"));
    }
}
