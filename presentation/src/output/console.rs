//! Console output formatter for review-squad results

use colored::Colorize;
use serde::Serialize;
use squad_application::{ExecutionReport, PhaseStatus, PollSummary, RunReviewOutput};
use squad_domain::{
    Action, AggregatedFindings, ConfigIssue, ExecutionPlan, IssueRecord, PermissionPolicy,
    ReviewTeam, SelectedAgent, Severity, TaskProfile,
};

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Disable ANSI colors for the rest of the process.
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    // ==================== Team & Plan ====================

    pub fn format_team(team: &ReviewTeam) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Review Team"));
        output.push('\n');

        if team.is_empty() {
            output.push_str(&format!("\n{}\n", "No agents matched this task.".yellow()));
            output.push_str(&Self::footer());
            return output;
        }

        output.push_str(&format!(
            "\n{} {}   {} {}   {} ~{:.2}h\n",
            "Size:".cyan().bold(),
            team.total_size,
            "Pattern:".cyan().bold(),
            team.pattern,
            "Estimate:".cyan().bold(),
            team.estimated_hours
        ));

        for (title, agents) in [
            ("Core reviewers", &team.core),
            ("Language specialists", &team.language),
            ("Domain specialists", &team.domain),
        ] {
            if agents.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(title));
            for agent in agents {
                output.push_str(&Self::agent_line(agent));
            }
        }

        if let Some(ref coordinator) = team.coordinator {
            output.push_str(&Self::section_header("Coordinator"));
            output.push_str(&format!("  {}\n", coordinator.yellow().bold()));
        }

        output.push_str(&Self::footer());
        output
    }

    fn agent_line(agent: &SelectedAgent) -> String {
        format!(
            "  {:<28} {:<5} {:>6.1}  {}\n",
            agent.name.yellow().bold(),
            agent.model_tier.to_string(),
            agent.score,
            agent.reason.to_string().dimmed()
        )
    }

    pub fn format_implementer(agent: &str, profile: &TaskProfile) -> String {
        format!(
            "{} {}\n{} {}\n",
            "Task:".cyan().bold(),
            profile.summary(),
            "Implementer:".cyan().bold(),
            agent.green().bold()
        )
    }

    pub fn format_plan(plan: &ExecutionPlan) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Execution Plan"));
        output.push_str(&format!(
            "\n\n{} {}\n{} {}   {} ~{:.2}h\n",
            "Task:".cyan().bold(),
            plan.task_summary,
            "Pattern:".cyan().bold(),
            plan.pattern,
            "Total:".cyan().bold(),
            plan.total_hours
        ));

        for phase in &plan.phases {
            let mode = if phase.parallel { "parallel" } else { "sequential" };
            let deps = if phase.depends_on.is_empty() {
                String::new()
            } else {
                format!(
                    " after {}",
                    phase
                        .depends_on
                        .iter()
                        .map(|d| format!("#{}", d))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            output.push_str(&Self::section_header(&format!(
                "Phase {}: {}",
                phase.number, phase.name
            )));
            output.push_str(&format!(
                "  {} ({}{}, ~{:.2}h)\n",
                phase.description.dimmed(),
                mode,
                deps,
                phase.estimated_hours
            ));
            for agent in &phase.agents {
                output.push_str(&format!("  * {}\n", agent));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    // ==================== Review Results ====================

    pub fn format_review(result: &RunReviewOutput) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Review Results"));
        output.push_str(&format!(
            "\n\n{} {}\n{} {}\n",
            "Task:".cyan().bold(),
            result.profile.summary(),
            "Team:".cyan().bold(),
            result.team.agent_names().join(", ")
        ));

        output.push_str(&Self::format_phases(&result.report));
        output.push_str(&Self::format_findings(&result.report.findings));

        if !result.report.failures.is_empty() {
            output.push_str(&Self::section_header("Agent Failures"));
            for failure in &result.report.failures {
                output.push_str(&format!(
                    "  {} {} (phase {}): {}\n",
                    "x".red(),
                    failure.agent.bold(),
                    failure.phase,
                    failure.cause
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_phases(report: &ExecutionReport) -> String {
        let mut output = Self::section_header("Phases");
        for phase in &report.phases {
            let status = match phase.status {
                PhaseStatus::Completed => "completed".green(),
                PhaseStatus::PartiallyFailed => "partially failed".yellow(),
                PhaseStatus::Failed => "failed".red(),
            };
            output.push_str(&format!(
                "  {}. {:<20} {:<16} {} ok / {} failed, {} findings\n",
                phase.number,
                phase.name,
                status,
                phase.succeeded.len(),
                phase.failed.len(),
                phase.raw_findings
            ));
        }
        output
    }

    pub fn format_findings(findings: &AggregatedFindings) -> String {
        let mut output = Self::section_header("Findings");
        if findings.is_empty() {
            output.push_str(&format!("  {}\n", "No findings.".green()));
            return output;
        }

        let counts = Severity::ALL
            .iter()
            .map(|s| format!("{} {}", findings.counts.get(*s), s))
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!(
            "  {} ({} duplicates removed)\n\n",
            counts,
            findings.total_duplicates()
        ));

        for finding in &findings.findings {
            let severity = finding.severity.to_string();
            let severity = match finding.severity {
                Severity::Critical => severity.red().bold(),
                Severity::High => severity.red(),
                Severity::Medium => severity.yellow(),
                Severity::Low => severity.normal(),
            };
            output.push_str(&format!(
                "  [{}] {} {} ({})\n",
                severity,
                finding.location.to_string().bold(),
                finding.finding_type,
                finding.agent.dimmed()
            ));
            output.push_str(&Self::indent(&finding.description, "      "));
            output.push('\n');
            if let Some(ref recommendation) = finding.recommendation {
                output.push_str(&format!("      {} {}\n", "->".cyan(), recommendation));
            }
        }
        output
    }

    // ==================== Watcher ====================

    pub fn format_watched(records: &[IssueRecord]) -> String {
        if records.is_empty() {
            return "No watched issues.\n".to_string();
        }
        let mut output = format!("{}\n", "Watched issues".cyan().bold());
        for record in records {
            output.push_str(&format!(
                "  {:<24} {} comments, labels [{}], last seen {}\n",
                record.issue_id.bold(),
                record.comment_count,
                record.labels.join(", "),
                record.last_seen.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        output
    }

    pub fn format_poll(summary: &PollSummary) -> String {
        let mut output = format!(
            "{} {} checked, {} events, {} re-reviews triggered\n",
            "Poll:".cyan().bold(),
            summary.checked,
            summary.events.len(),
            summary.triggered.len()
        );
        for event in &summary.events {
            let verdict = event
                .verdict
                .as_ref()
                .map(|v| {
                    let label = if v.substantial {
                        "substantial"
                    } else {
                        "informational"
                    };
                    format!(" [{} {:.1}: {}]", label, v.score, v.reason)
                })
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} {}: {} -> {}{}\n",
                event.issue_id.bold(),
                event.kind,
                event.old_summary.dimmed(),
                event.new_summary,
                verdict
            ));
        }
        for (issue, error) in &summary.errors {
            output.push_str(&format!("  {} {}: {}\n", "x".red(), issue, error));
        }
        output
    }

    // ==================== Misc ====================

    pub fn format_permission(policy: &PermissionPolicy, action: Action, allowed: bool) -> String {
        let verdict = if allowed {
            "allowed".green().bold()
        } else {
            "denied".red().bold()
        };
        let actions = policy
            .effective_actions()
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut output = format!(
            "{} {} {}: {}\n  level {}, deny {}, actions [{}]\n",
            policy.agent_id().bold(),
            "->".dimmed(),
            action,
            verdict,
            policy.privilege(),
            policy.deny_family(),
            actions
        );
        if !allowed && !policy.escalation().is_empty() {
            output.push_str(&format!("  {} {}\n", "escalation:".yellow(), policy.escalation()));
        }
        output
    }

    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                if issue.is_error() {
                    format!("{} {}\n", "error:".red().bold(), issue.message)
                } else {
                    format!("{} {}\n", "warning:".yellow().bold(), issue.message)
                }
            })
            .collect()
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
