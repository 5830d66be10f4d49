//! Run Review use case
//!
//! Orchestrates one full review: classify (or take a ready profile),
//! select a team, plan, execute, record agent performance and optionally
//! post the results to an issue.

use super::agent_selector::AgentSelector;
use super::execution_coordinator::{ExecutionCoordinator, ExecutionReport};
use super::performance_tracker::PerformanceTracker;
use crate::ports::issue_tracker::{IssueTracker, TrackerError};
use crate::ports::progress::{ExecutionProgress, NoProgress};
use crate::ports::review_trigger::{ReviewTrigger, TriggerError};
use crate::ports::task_classifier::{ClassifierError, TaskClassifier};
use async_trait::async_trait;
use squad_domain::{ExecutionPlan, ReviewTeam, SELF_MARKER, Severity, TaskProfile};
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunReviewError {
    #[error("No task description or profile given")]
    MissingInput,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Input for the RunReview use case
#[derive(Debug, Clone, Default)]
pub struct RunReviewInput {
    pub description: Option<String>,
    /// Skips classification when present
    pub profile: Option<TaskProfile>,
    /// Post the findings summary to this issue
    pub issue_id: Option<String>,
    pub max_agents: usize,
}

impl RunReviewInput {
    pub fn from_description(description: impl Into<String>, max_agents: usize) -> Self {
        Self {
            description: Some(description.into()),
            max_agents,
            ..Self::default()
        }
    }

    pub fn from_profile(profile: TaskProfile, max_agents: usize) -> Self {
        Self {
            profile: Some(profile),
            max_agents,
            ..Self::default()
        }
    }

    pub fn with_issue(mut self, issue_id: impl Into<String>) -> Self {
        self.issue_id = Some(issue_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct RunReviewOutput {
    pub profile: TaskProfile,
    pub team: ReviewTeam,
    pub plan: ExecutionPlan,
    pub report: ExecutionReport,
}

pub struct RunReviewUseCase {
    classifier: Option<Arc<dyn TaskClassifier>>,
    selector: Arc<AgentSelector>,
    coordinator: Arc<ExecutionCoordinator>,
    performance: Arc<PerformanceTracker>,
    tracker: Option<Arc<dyn IssueTracker>>,
    max_agents: usize,
}

impl RunReviewUseCase {
    pub fn new(
        selector: Arc<AgentSelector>,
        coordinator: Arc<ExecutionCoordinator>,
        performance: Arc<PerformanceTracker>,
        max_agents: usize,
    ) -> Self {
        Self {
            classifier: None,
            selector,
            coordinator,
            performance,
            tracker: None,
            max_agents,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TaskClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunReviewInput) -> Result<RunReviewOutput, RunReviewError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunReviewInput,
        progress: &dyn ExecutionProgress,
    ) -> Result<RunReviewOutput, RunReviewError> {
        let profile = self.resolve_profile(&input).await?;
        info!("Reviewing {}", profile.summary());

        let team = self.selector.select_review_team(&profile, input.max_agents);
        let plan = self.coordinator.create_execution_plan(&team, &profile);
        let report = self
            .coordinator
            .execute_with_progress(&plan, &profile, progress)
            .await;

        for (agent, outcome) in &report.agent_outcomes {
            if let Err(e) = self.performance.record_run(agent, *outcome) {
                warn!("Failed to record performance for {}: {}", agent, e);
            }
        }

        if let (Some(issue_id), Some(tracker)) = (&input.issue_id, &self.tracker) {
            let body = review_comment(&team, &report);
            tracker.post_comment(issue_id, &body).await?;
            info!("Posted review summary to issue {}", issue_id);
        }

        Ok(RunReviewOutput {
            profile,
            team,
            plan,
            report,
        })
    }

    async fn resolve_profile(&self, input: &RunReviewInput) -> Result<TaskProfile, RunReviewError> {
        if let Some(profile) = &input.profile {
            return Ok(profile.clone());
        }
        let description = input
            .description
            .as_deref()
            .ok_or(RunReviewError::MissingInput)?;
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(ClassifierError::NotConfigured)?;
        Ok(classifier.classify(description).await?)
    }
}

#[async_trait]
impl ReviewTrigger for RunReviewUseCase {
    /// Re-run the review for an issue, classifying its current text.
    async fn trigger(&self, issue_id: &str, reason: &str) -> Result<(), TriggerError> {
        let to_trigger_error = |message: String| TriggerError {
            issue_id: issue_id.to_string(),
            message,
        };
        let tracker = self
            .tracker
            .as_ref()
            .ok_or_else(|| to_trigger_error("no issue tracker configured".to_string()))?;
        let snapshot = tracker
            .fetch(issue_id)
            .await
            .map_err(|e| to_trigger_error(e.to_string()))?;

        info!("Re-reviewing issue {} ({})", issue_id, reason);
        let description = format!("{}\n\n{}", snapshot.title, snapshot.description);
        let input = RunReviewInput::from_description(description, self.max_agents).with_issue(issue_id);
        self.execute(input)
            .await
            .map(|_| ())
            .map_err(|e| to_trigger_error(e.to_string()))
    }
}

/// Markdown summary posted to an issue after a review.
pub fn review_comment(team: &ReviewTeam, report: &ExecutionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", SELF_MARKER);
    let _ = writeln!(out, "## Review summary\n");
    let _ = writeln!(
        out,
        "Team of {} ({}): {}\n",
        team.total_size,
        team.pattern,
        team.agent_names().join(", ")
    );

    let counts = &report.findings.counts;
    let _ = writeln!(
        out,
        "**{}** findings: {} critical, {} high, {} medium, {} low ({} duplicates removed)\n",
        report.findings.len(),
        counts.critical,
        counts.high,
        counts.medium,
        counts.low,
        report.findings.total_duplicates()
    );

    for severity in Severity::ALL {
        let matching: Vec<_> = report
            .findings
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect();
        if matching.is_empty() {
            continue;
        }
        let _ = writeln!(out, "### {}\n", severity);
        for f in matching {
            let _ = writeln!(
                out,
                "- `{}` **{}**: {} ({})",
                f.location, f.finding_type, f.description, f.agent
            );
        }
        out.push('\n');
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "### Agent failures\n");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "- {} (phase {}): {}",
                failure.agent, failure.phase, failure.cause
            );
        }
    }
    out
}
