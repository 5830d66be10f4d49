//! Agent performance records and the effectiveness score.
//!
//! A record's `effectiveness_score` and `is_low_performer` are always derived
//! from its counters; there is no way to set them directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weights and thresholds for the effectiveness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectivenessWeights {
    pub finding_rate: f64,
    pub critical_hit_rate: f64,
    pub resolution_rate: f64,
    /// Subtracted
    pub duplication_rate: f64,
    /// Findings per run that count as a full finding rate
    pub findings_per_run: f64,
    /// Runs required before an agent can be flagged
    pub min_runs: u64,
    pub low_performer_cutoff: f64,
}

impl Default for EffectivenessWeights {
    fn default() -> Self {
        Self {
            finding_rate: 0.3,
            critical_hit_rate: 0.4,
            resolution_rate: 0.2,
            duplication_rate: 0.1,
            findings_per_run: 10.0,
            min_runs: 20,
            low_performer_cutoff: 0.2,
        }
    }
}

/// Counters from one agent run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub findings: u64,
    pub critical: u64,
    pub resolved: u64,
    pub duplicates: u64,
}

impl RunOutcome {
    pub fn new(findings: u64, critical: u64, resolved: u64, duplicates: u64) -> Self {
        Self {
            findings,
            critical,
            resolved,
            duplicates,
        }
    }
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Effectiveness in `[0, 1]` from cumulative counters.
///
/// Zero runs always score zero.
pub fn effectiveness_score(
    total_runs: u64,
    total_findings: u64,
    critical_findings: u64,
    findings_resolved: u64,
    duplicate_findings: u64,
    weights: &EffectivenessWeights,
) -> f64 {
    if total_runs == 0 {
        return 0.0;
    }
    let finding_rate =
        (total_findings as f64 / (total_runs as f64 * weights.findings_per_run)).min(1.0);
    let score = weights.finding_rate * finding_rate
        + weights.critical_hit_rate * rate(critical_findings, total_findings)
        + weights.resolution_rate * rate(findings_resolved, total_findings)
        - weights.duplication_rate * rate(duplicate_findings, total_findings);
    score.clamp(0.0, 1.0)
}

/// Cumulative counters for one agent (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Key of the record in the store; not part of the stored fields
    #[serde(skip)]
    pub agent: String,
    pub total_runs: u64,
    pub total_findings: u64,
    pub critical_findings: u64,
    pub findings_resolved: u64,
    pub duplicate_findings: u64,
    effectiveness_score: f64,
    pub last_updated: NaiveDate,
    is_low_performer: bool,
}

impl AgentRecord {
    pub fn new(agent: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            agent: agent.into(),
            total_runs: 0,
            total_findings: 0,
            critical_findings: 0,
            findings_resolved: 0,
            duplicate_findings: 0,
            effectiveness_score: 0.0,
            last_updated: today,
            is_low_performer: false,
        }
    }

    pub fn effectiveness_score(&self) -> f64 {
        self.effectiveness_score
    }

    pub fn is_low_performer(&self) -> bool {
        self.is_low_performer
    }

    /// Add one run's counters and recompute the derived fields.
    pub fn apply_run(&mut self, outcome: RunOutcome, weights: &EffectivenessWeights, today: NaiveDate) {
        self.total_runs += 1;
        self.total_findings += outcome.findings;
        self.critical_findings += outcome.critical;
        self.findings_resolved += outcome.resolved;
        self.duplicate_findings += outcome.duplicates;
        self.last_updated = today;
        self.recompute(weights);
    }

    /// Credit resolved findings without counting a run.
    pub fn apply_resolutions(&mut self, resolved: u64, weights: &EffectivenessWeights, today: NaiveDate) {
        self.findings_resolved += resolved;
        self.last_updated = today;
        self.recompute(weights);
    }

    /// Re-derive score and flag from the counters.
    pub fn recompute(&mut self, weights: &EffectivenessWeights) {
        self.effectiveness_score = effectiveness_score(
            self.total_runs,
            self.total_findings,
            self.critical_findings,
            self.findings_resolved,
            self.duplicate_findings,
            weights,
        );
        self.is_low_performer = self.total_runs >= weights.min_runs
            && self.effectiveness_score < weights.low_performer_cutoff;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_zero_runs_scores_zero() {
        let w = EffectivenessWeights::default();
        assert_eq!(effectiveness_score(0, 0, 0, 0, 0, &w), 0.0);
        assert_eq!(effectiveness_score(0, 50, 10, 10, 0, &w), 0.0);
    }

    #[test]
    fn test_formula() {
        let w = EffectivenessWeights::default();
        // finding_rate = 20 / (4 * 10) = 0.5; critical 5/20; resolved 10/20; dup 2/20
        let score = effectiveness_score(4, 20, 5, 10, 2, &w);
        let expected = 0.3 * 0.5 + 0.4 * 0.25 + 0.2 * 0.5 - 0.1 * 0.1;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rates_above_one_only_clamp_the_total() {
        let w = EffectivenessWeights::default();
        // finding_rate = 1.0; resolution rate 20/10 = 2.0 is not capped on its own
        let score = effectiveness_score(1, 10, 0, 20, 0, &w);
        assert!((score - 0.7).abs() < 1e-12);

        let mut record = AgentRecord::new("closer", day());
        record.apply_run(RunOutcome::new(10, 0, 0, 0), &w, day());
        record.apply_resolutions(20, &w, day());
        assert!((record.effectiveness_score() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_to_unit_interval() {
        let w = EffectivenessWeights::default();
        let high = effectiveness_score(1, 100, 100, 100, 0, &w);
        assert!(high <= 1.0);
        let low = effectiveness_score(10, 1, 0, 0, 1, &w);
        assert!(low >= 0.0);
        assert_eq!(effectiveness_score(10, 0, 0, 0, 0, &w), 0.0);
    }

    #[test]
    fn test_monotonic_in_resolutions() {
        let w = EffectivenessWeights::default();
        let mut previous = f64::MIN;
        for resolved in 0..=40 {
            let score = effectiveness_score(5, 40, 3, resolved, 4, &w);
            assert!(score >= previous, "dropped at resolved={}", resolved);
            previous = score;
        }
    }

    #[test]
    fn test_low_performer_needs_run_floor() {
        let w = EffectivenessWeights::default();
        let mut record = AgentRecord::new("quiet", day());
        for _ in 0..19 {
            record.apply_run(RunOutcome::default(), &w, day());
            assert!(!record.is_low_performer());
        }
        record.apply_run(RunOutcome::default(), &w, day());
        assert_eq!(record.total_runs, 20);
        assert_eq!(record.effectiveness_score(), 0.0);
        assert!(record.is_low_performer());
    }

    #[test]
    fn test_good_agent_not_flagged() {
        let w = EffectivenessWeights::default();
        let mut record = AgentRecord::new("sharp", day());
        for _ in 0..25 {
            record.apply_run(RunOutcome::new(8, 3, 4, 0), &w, day());
        }
        assert!(record.effectiveness_score() > 0.2);
        assert!(!record.is_low_performer());
    }

    #[test]
    fn test_resolutions_do_not_count_runs() {
        let w = EffectivenessWeights::default();
        let mut record = AgentRecord::new("a", day());
        record.apply_run(RunOutcome::new(10, 0, 0, 0), &w, day());
        let before = record.effectiveness_score();
        record.apply_resolutions(5, &w, day());
        assert_eq!(record.total_runs, 1);
        assert_eq!(record.findings_resolved, 5);
        assert!(record.effectiveness_score() > before);
    }

    #[test]
    fn test_serde_field_names() {
        let record = AgentRecord::new("a", day());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["effectiveness_score"], 0.0);
        assert_eq!(value["is_low_performer"], false);
        assert_eq!(value["last_updated"], "2026-03-14");
        assert!(value.get("agent").is_none());
    }
}
