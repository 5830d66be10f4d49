//! Execution plan entities
//!
//! A plan is an ordered list of phases. Phase numbers are contiguous from 1
//! and every phase except the first depends on the phase immediately before
//! it, so running phases in increasing order always satisfies prerequisites.

use crate::task::profile::TaskProfile;
use crate::team::{CoordinationPattern, ReviewTeam, SelectionTunables};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of core agents in the first phase.
pub const CORE_PHASE_SIZE: usize = 3;

/// Fixed estimate for the issue creation phase.
pub const ISSUE_PHASE_HOURS: f64 = 0.25;

/// What a phase does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Top core reviewers, run first
    CoreReview,
    /// Remaining core reviewers plus language and domain specialists
    SpecialistReview,
    /// The coordinator consolidates earlier results
    Coordination,
    /// Findings are turned into tracked issues; no agents
    IssueCreation,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::CoreReview => "core_review",
            PhaseKind::SpecialistReview => "specialist_review",
            PhaseKind::Coordination => "coordination",
            PhaseKind::IssueCreation => "issue_creation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKind::CoreReview => "Core Review",
            PhaseKind::SpecialistReview => "Specialist Review",
            PhaseKind::Coordination => "Coordination",
            PhaseKind::IssueCreation => "Issue Creation",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One scheduling unit of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPhase {
    pub number: u32,
    pub kind: PhaseKind,
    pub name: String,
    pub description: String,
    pub agents: Vec<String>,
    /// Agents have no inter-dependency and may run concurrently
    pub parallel: bool,
    pub depends_on: Vec<u32>,
    pub estimated_hours: f64,
}

impl ExecutionPhase {
    pub fn has_agents(&self) -> bool {
        !self.agents.is_empty()
    }
}

/// Ordered phases plus totals (Entity)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub task_summary: String,
    pub phases: Vec<ExecutionPhase>,
    pub total_hours: f64,
    pub pattern: CoordinationPattern,
}

impl ExecutionPlan {
    /// Build a plan from a team.
    ///
    /// Phases without agents are omitted, except issue creation which is
    /// always present and always last. Never fails: an empty team yields a
    /// plan holding only the issue creation phase.
    pub fn from_team(
        team: &ReviewTeam,
        profile: &TaskProfile,
        tunables: &SelectionTunables,
    ) -> Self {
        let hours_for = |name: &str| {
            team.get(name)
                .map(|a| tunables.tier_hours.for_tier(a.model_tier))
                .unwrap_or(tunables.coordinator_overhead_hours)
        };

        let core: Vec<String> = team.core.iter().map(|a| a.name.clone()).collect();
        let split = core.len().min(CORE_PHASE_SIZE);
        let (first, rest) = core.split_at(split);

        let mut specialists: Vec<String> = rest.to_vec();
        specialists.extend(team.specialists().map(|a| a.name.clone()));

        let mut drafts: Vec<(PhaseKind, Vec<String>, bool, String)> = Vec::new();
        if !first.is_empty() {
            drafts.push((
                PhaseKind::CoreReview,
                first.to_vec(),
                true,
                format!("Primary review of the {} change", profile.task_type),
            ));
        }
        if !specialists.is_empty() {
            drafts.push((
                PhaseKind::SpecialistReview,
                specialists,
                true,
                "Language, domain and secondary dimension review".to_string(),
            ));
        }
        if let Some(coordinator) = &team.coordinator {
            drafts.push((
                PhaseKind::Coordination,
                vec![coordinator.clone()],
                false,
                "Consolidate findings across reviewers".to_string(),
            ));
        }
        drafts.push((
            PhaseKind::IssueCreation,
            Vec::new(),
            false,
            "Record aggregated findings as tracked issues".to_string(),
        ));

        let mut phases = Vec::with_capacity(drafts.len());
        for (index, (kind, agents, parallel, description)) in drafts.into_iter().enumerate() {
            let number = index as u32 + 1;
            let estimated_hours = if kind == PhaseKind::IssueCreation {
                ISSUE_PHASE_HOURS
            } else if parallel {
                agents.iter().map(|a| hours_for(a)).fold(0.0, f64::max)
            } else {
                agents.iter().map(|a| hours_for(a)).sum()
            };
            phases.push(ExecutionPhase {
                number,
                kind,
                name: kind.display_name().to_string(),
                description,
                agents,
                parallel,
                depends_on: if number > 1 { vec![number - 1] } else { Vec::new() },
                estimated_hours,
            });
        }

        let total_hours: f64 = phases.iter().map(|p| p.estimated_hours).sum();
        Self {
            task_summary: profile.summary(),
            phases,
            total_hours: (total_hours * 100.0).round() / 100.0,
            pattern: team.pattern,
        }
    }

    pub fn phase(&self, number: u32) -> Option<&ExecutionPhase> {
        self.phases.iter().find(|p| p.number == number)
    }

    pub fn agent_count(&self) -> usize {
        self.phases.iter().map(|p| p.agents.len()).sum()
    }

    /// One line per phase, for logs and text output.
    pub fn summary(&self) -> String {
        self.phases
            .iter()
            .map(|p| {
                let deps = if p.depends_on.is_empty() {
                    "-".to_string()
                } else {
                    p.depends_on
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                };
                format!(
                    "{}. {} [{}] agents={} deps={} ~{:.2}h",
                    p.number,
                    p.name,
                    if p.parallel { "parallel" } else { "sequential" },
                    p.agents.len(),
                    deps,
                    p.estimated_hours
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
