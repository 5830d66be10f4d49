//! Deduplication, ordering and grouping of findings.

use super::entities::{Finding, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-severity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Deduplicated findings with groupings (Value Object)
///
/// Groupings hold indices into `findings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFindings {
    pub findings: Vec<Finding>,
    pub by_file: BTreeMap<String, Vec<usize>>,
    pub by_type: BTreeMap<String, Vec<usize>>,
    pub by_agent: BTreeMap<String, Vec<usize>>,
    pub counts: SeverityCounts,
    /// Findings dropped as duplicates, keyed by the reporting agent
    pub duplicates_by_agent: BTreeMap<String, u32>,
}

impl AggregatedFindings {
    /// Collapse findings sharing (file, type) into the most severe one.
    ///
    /// On equal severity the first reported finding wins. The result is
    /// sorted by severity (most severe first), then file, line and agent.
    pub fn aggregate(raw: Vec<Finding>) -> Self {
        let mut kept: Vec<Finding> = Vec::with_capacity(raw.len());
        let mut index: HashMap<(String, String), usize> = HashMap::new();
        let mut duplicates_by_agent: BTreeMap<String, u32> = BTreeMap::new();

        for finding in raw {
            let key = (
                finding.location.file.clone(),
                finding.finding_type.clone(),
            );
            match index.get(&key) {
                Some(&slot) => {
                    let dropped = if finding.severity > kept[slot].severity {
                        std::mem::replace(&mut kept[slot], finding)
                    } else {
                        finding
                    };
                    *duplicates_by_agent.entry(dropped.agent).or_insert(0) += 1;
                }
                None => {
                    index.insert(key, kept.len());
                    kept.push(finding);
                }
            }
        }

        kept.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.location.cmp(&b.location))
                .then_with(|| a.agent.cmp(&b.agent))
        });

        let mut aggregated = Self {
            duplicates_by_agent,
            ..Self::default()
        };
        for (i, finding) in kept.iter().enumerate() {
            aggregated.counts.add(finding.severity);
            aggregated
                .by_file
                .entry(finding.location.file.clone())
                .or_default()
                .push(i);
            aggregated
                .by_type
                .entry(finding.finding_type.clone())
                .or_default()
                .push(i);
            aggregated
                .by_agent
                .entry(finding.agent.clone())
                .or_default()
                .push(i);
        }
        aggregated.findings = kept;
        aggregated
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn for_agent(&self, agent: &str) -> impl Iterator<Item = &Finding> {
        self.by_agent
            .get(agent)
            .into_iter()
            .flatten()
            .map(|&i| &self.findings[i])
    }

    pub fn for_file(&self, file: &str) -> impl Iterator<Item = &Finding> {
        self.by_file
            .get(file)
            .into_iter()
            .flatten()
            .map(|&i| &self.findings[i])
    }

    pub fn duplicates_for(&self, agent: &str) -> u32 {
        self.duplicates_by_agent.get(agent).copied().unwrap_or(0)
    }

    pub fn total_duplicates(&self) -> u32 {
        self.duplicates_by_agent.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::entities::Location;

    fn finding(agent: &str, severity: Severity, kind: &str, location: &str) -> Finding {
        Finding::new(
            agent,
            severity,
            kind,
            format!("{} in {}", kind, location),
            Location::parse(location).unwrap(),
        )
    }

    #[test]
    fn test_same_file_and_type_keeps_highest_severity() {
        let aggregated = AggregatedFindings::aggregate(vec![
            finding("a", Severity::Medium, "xss", "web/form.ts:10"),
            finding("b", Severity::Critical, "xss", "web/form.ts:12"),
            finding("c", Severity::Low, "xss", "web/form.ts"),
        ]);

        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated.findings[0].severity, Severity::Critical);
        assert_eq!(aggregated.findings[0].agent, "b");
        assert_eq!(aggregated.duplicates_for("a"), 1);
        assert_eq!(aggregated.duplicates_for("c"), 1);
        assert_eq!(aggregated.duplicates_for("b"), 0);
        assert_eq!(aggregated.total_duplicates(), 2);
    }

    #[test]
    fn test_equal_severity_keeps_first() {
        let aggregated = AggregatedFindings::aggregate(vec![
            finding("first", Severity::High, "race", "src/pool.rs:3"),
            finding("second", Severity::High, "race", "src/pool.rs:3"),
        ]);
        assert_eq!(aggregated.findings[0].agent, "first");
        assert_eq!(aggregated.duplicates_for("second"), 1);
    }

    #[test]
    fn test_sorted_by_severity_then_location() {
        let aggregated = AggregatedFindings::aggregate(vec![
            finding("a", Severity::Low, "style", "b.rs:1"),
            finding("a", Severity::Critical, "auth", "z.rs:5"),
            finding("b", Severity::High, "leak", "a.rs:9"),
            finding("b", Severity::High, "leak", "a.rs"),
        ]);
        let order: Vec<_> = aggregated
            .findings
            .iter()
            .map(|f| (f.severity, f.location.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, "z.rs:5".to_string()),
                (Severity::High, "a.rs:9".to_string()),
                (Severity::Low, "b.rs:1".to_string()),
            ]
        );
    }

    #[test]
    fn test_groupings_and_counts() {
        let aggregated = AggregatedFindings::aggregate(vec![
            finding("sec", Severity::Critical, "auth", "src/login.rs:4"),
            finding("sec", Severity::Medium, "logging", "src/login.rs:8"),
            finding("perf", Severity::High, "n+1", "src/db.rs:20"),
        ]);

        assert_eq!(aggregated.counts.critical, 1);
        assert_eq!(aggregated.counts.high, 1);
        assert_eq!(aggregated.counts.medium, 1);
        assert_eq!(aggregated.counts.total(), 3);
        assert_eq!(aggregated.for_file("src/login.rs").count(), 2);
        assert_eq!(aggregated.for_agent("perf").count(), 1);
        assert_eq!(aggregated.by_type.len(), 3);
        assert_eq!(aggregated.for_agent("nobody").count(), 0);
    }

    #[test]
    fn test_empty_input() {
        let aggregated = AggregatedFindings::aggregate(Vec::new());
        assert!(aggregated.is_empty());
        assert_eq!(aggregated.counts, SeverityCounts::default());
    }
}
