//! Deterministic markdown report of agent performance.

use super::record::AgentRecord;
use crate::core::string::table_cell;
use std::fmt::Write;

/// Render a ranked markdown table.
///
/// Rows are ordered by score (highest first), then name. Low performers are
/// left out unless `include_low_performers` is set. Output depends only on
/// the records given.
pub fn format_report<'a>(
    records: impl IntoIterator<Item = &'a AgentRecord>,
    top_n: usize,
    include_low_performers: bool,
) -> String {
    let mut rows: Vec<&AgentRecord> = records
        .into_iter()
        .filter(|r| include_low_performers || !r.is_low_performer())
        .collect();
    rows.sort_by(|a, b| {
        b.effectiveness_score()
            .total_cmp(&a.effectiveness_score())
            .then_with(|| a.agent.cmp(&b.agent))
    });
    rows.truncate(top_n);

    let mut out = String::new();
    out.push_str("## Agent Performance\n\n");
    if rows.is_empty() {
        out.push_str("_No agent runs recorded._\n");
        return out;
    }

    out.push_str(
        "| Rank | Agent | Score | Runs | Findings | Critical | Resolved | Duplicates | Status |\n",
    );
    out.push_str("|---:|---|---:|---:|---:|---:|---:|---:|---|\n");
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.3} | {} | {} | {} | {} | {} | {} |",
            i + 1,
            table_cell(&r.agent),
            r.effectiveness_score(),
            r.total_runs,
            r.total_findings,
            r.critical_findings,
            r.findings_resolved,
            r.duplicate_findings,
            if r.is_low_performer() { "low performer" } else { "ok" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::record::{EffectivenessWeights, RunOutcome};
    use chrono::NaiveDate;

    fn record(name: &str, runs: u32, outcome: RunOutcome) -> AgentRecord {
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let w = EffectivenessWeights::default();
        let mut r = AgentRecord::new(name, day);
        for _ in 0..runs {
            r.apply_run(outcome, &w, day);
        }
        r
    }

    #[test]
    fn test_ranked_and_deterministic() {
        let records = vec![
            record("beta", 2, RunOutcome::new(5, 1, 0, 0)),
            record("alpha", 2, RunOutcome::new(5, 1, 0, 0)),
            record("gamma", 2, RunOutcome::new(10, 5, 5, 0)),
        ];
        let report = format_report(&records, 10, true);
        let gamma = report.find("| 1 | gamma |").unwrap();
        let alpha = report.find("| 2 | alpha |").unwrap();
        let beta = report.find("| 3 | beta |").unwrap();
        assert!(gamma < alpha && alpha < beta);
        assert_eq!(report, format_report(&records, 10, true));
    }

    #[test]
    fn test_low_performers_filtered() {
        let records = vec![
            record("idle", 20, RunOutcome::default()),
            record("busy", 3, RunOutcome::new(10, 2, 1, 0)),
        ];
        let with = format_report(&records, 10, true);
        assert!(with.contains("| idle | 0.000 | 20 |"));
        assert!(with.contains("low performer"));

        let without = format_report(&records, 10, false);
        assert!(!without.contains("idle"));
        assert!(without.contains("| 1 | busy |"));
    }

    #[test]
    fn test_top_n_and_empty() {
        let records = vec![
            record("a", 1, RunOutcome::new(1, 0, 0, 0)),
            record("b", 1, RunOutcome::new(2, 0, 0, 0)),
        ];
        let report = format_report(&records, 1, true);
        assert!(report.contains("| 1 | b |"));
        assert!(!report.contains("| a |"));

        let empty: Vec<AgentRecord> = Vec::new();
        assert!(format_report(&empty, 5, true).contains("No agent runs recorded"));
    }
}
