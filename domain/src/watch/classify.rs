//! Substance scoring of issue updates.

use super::entities::{IssueComment, Verdict};
use crate::core::error::DomainError;
use chrono::NaiveDate;
use regex::Regex;

/// Marker embedded in comments posted by the watcher itself.
pub const SELF_MARKER: &str = "<!-- review-squad -->";

pub const DEFAULT_SUBSTANTIAL: &[&str] = &[
    "implemented",
    "merged",
    r"PR #\d+",
    "pull request",
    "fixed",
    "resolved",
    "completed",
    "deployed",
    "committed",
];

pub const DEFAULT_INFORMATIONAL: &[&str] = &[
    "FYI",
    "blocked",
    "question",
    "waiting",
    "any update",
    "on hold",
    "thanks",
];

/// Compiled classification patterns and weights
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    substantial: Vec<(String, Regex)>,
    informational: Vec<(String, Regex)>,
    pub substantial_weight: f64,
    pub informational_penalty: f64,
    pub description_bonus: f64,
    pub threshold: f64,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            substantial: compile_known(DEFAULT_SUBSTANTIAL),
            informational: compile_known(DEFAULT_INFORMATIONAL),
            substantial_weight: 1.0,
            informational_penalty: 0.5,
            description_bonus: 1.0,
            threshold: 1.0,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, DomainError> {
    Regex::new(&format!("(?i){}", pattern)).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn compile_known(patterns: &[&str]) -> Vec<(String, Regex)> {
    patterns
        .iter()
        .filter_map(|p| compile(p).ok().map(|re| (p.to_string(), re)))
        .collect()
}

fn compile_all(patterns: &[String]) -> Result<Vec<(String, Regex)>, DomainError> {
    patterns
        .iter()
        .map(|p| compile(p).map(|re| (p.clone(), re)))
        .collect()
}

impl ClassificationRules {
    /// Build rules from case-insensitive patterns.
    pub fn new(
        substantial: &[String],
        informational: &[String],
        threshold: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            substantial: compile_all(substantial)?,
            informational: compile_all(informational)?,
            threshold,
            ..Self::default()
        })
    }

    /// Score comments plus an optional description change.
    ///
    /// Each substantial pattern found in a comment adds the substantial weight,
    /// each informational one subtracts the penalty. Comments carrying
    /// [`SELF_MARKER`] are ignored.
    pub fn classify<'c>(
        &self,
        comments: impl IntoIterator<Item = &'c IssueComment>,
        description_changed: bool,
    ) -> Verdict {
        let mut score = 0.0;
        let mut hits: Vec<String> = Vec::new();

        for comment in comments {
            if comment.is_self_posted() {
                continue;
            }
            for (pattern, re) in &self.substantial {
                if re.is_match(&comment.body) {
                    score += self.substantial_weight;
                    hits.push(format!("+{}", pattern));
                }
            }
            for (pattern, re) in &self.informational {
                if re.is_match(&comment.body) {
                    score -= self.informational_penalty;
                    hits.push(format!("-{}", pattern));
                }
            }
        }
        if description_changed {
            score += self.description_bonus;
            hits.push("+description changed".to_string());
        }

        let substantial = score >= self.threshold;
        let reason = if hits.is_empty() {
            "no matching signals".to_string()
        } else {
            format!("score {:.1} ({})", score, hits.join(", "))
        };
        Verdict {
            substantial,
            score,
            reason,
        }
    }
}

/// Body of the dated summary comment posted after a substantial update.
pub fn format_update_comment(issue_id: &str, verdict: &Verdict, date: NaiveDate) -> String {
    format!(
        "{}\n**[review-squad] {}** Substantial update detected on #{}: {}. A re-review has been triggered.",
        SELF_MARKER,
        date.format("%Y-%m-%d"),
        issue_id,
        verdict.reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(body: &str) -> IssueComment {
        IssueComment::new("dev", body)
    }

    #[test]
    fn test_merged_pr_is_substantial() {
        let rules = ClassificationRules::default();
        let verdict = rules.classify(&[comment("merged PR #42")], false);
        assert!(verdict.substantial);
        assert_eq!(verdict.score, 2.0);
        assert!(verdict.reason.contains("+merged"));
    }

    #[test]
    fn test_fyi_blocked_is_informational() {
        let rules = ClassificationRules::default();
        let verdict = rules.classify(&[comment("FYI, still blocked")], false);
        assert!(!verdict.substantial);
        assert_eq!(verdict.score, -1.0);
    }

    #[test]
    fn test_case_insensitive_and_description_bonus() {
        let rules = ClassificationRules::default();
        assert!(rules.classify(&[comment("IMPLEMENTED in main")], false).substantial);

        let verdict = rules.classify(&[comment("thanks!")], true);
        assert_eq!(verdict.score, 0.5);
        assert!(!verdict.substantial);

        assert!(rules.classify(std::iter::empty(), true).substantial);
    }

    #[test]
    fn test_own_comments_ignored() {
        let rules = ClassificationRules::default();
        let own = comment(&format!("{} merged and deployed", SELF_MARKER));
        let verdict = rules.classify(&[own], false);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.reason, "no matching signals");
    }

    #[test]
    fn test_custom_rules_and_invalid_pattern() {
        let rules = ClassificationRules::new(
            &["shipped".to_string()],
            &["maybe".to_string()],
            1.0,
        )
        .unwrap();
        assert!(rules.classify(&[comment("Shipped it")], false).substantial);
        assert!(!rules.classify(&[comment("merged")], false).substantial);

        let err = ClassificationRules::new(&["(unclosed".to_string()], &[], 1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern { .. }));
    }

    #[test]
    fn test_update_comment_is_tagged_and_dated() {
        let verdict = Verdict {
            substantial: true,
            score: 2.0,
            reason: "score 2.0 (+merged)".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let body = format_update_comment("42", &verdict, date);
        assert!(body.starts_with(SELF_MARKER));
        assert!(body.contains("[review-squad] 2026-10-17"));
        assert!(body.contains("#42"));
    }
}
