//! Domain layer for review-squad
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Team selection
//!
//! A [`TaskProfile`] is matched against the [`AgentCatalog`] by
//! [`TeamSelector`], producing a ranked [`ReviewTeam`]. Historical
//! effectiveness (via [`AgentHistory`]) breaks ties between equal matches.
//!
//! ## Execution plans and findings
//!
//! [`ExecutionPlan`] orders the team into dependent phases. Findings from
//! every phase are collapsed by [`AggregatedFindings`].
//!
//! ## Permissions
//!
//! Every agent acts under a [`PermissionPolicy`]; unknown agents are denied.
//!
//! ## Performance and watching
//!
//! [`AgentRecord`] keeps cumulative counters per agent. [`IssueRecord`]
//! baselines let the watcher detect and classify issue updates.

pub mod catalog;
pub mod config;
pub mod core;
pub mod finding;
pub mod performance;
pub mod permission;
pub mod plan;
pub mod task;
pub mod team;
pub mod watch;

// Re-export commonly used types
pub use catalog::{AgentCatalog, AgentCategory, AgentDescriptor, ModelTier};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat};
pub use core::error::DomainError;
pub use finding::{AggregatedFindings, Finding, Location, Severity, SeverityCounts};
pub use performance::{AgentRecord, EffectivenessWeights, RunOutcome, effectiveness_score, format_report};
pub use permission::{
    Action, DenyFamily, PermissionDenied, PermissionPolicy, PermissionRegistry, ScopeLevel,
};
pub use plan::{ExecutionPhase, ExecutionPlan, PhaseKind};
pub use task::profile::{ComplexityTier, TaskProfile, TaskType};
pub use team::{
    AgentHistory, CoordinationPattern, DomainMatch, NoHistory, ReviewTeam, SelectedAgent,
    SelectionReason, SelectionTunables, TeamSelector, TierHours, TierWeights,
};
pub use watch::{
    ChangeKind, ClassificationMode, ClassificationRules, IssueComment, IssueRecord, IssueSnapshot,
    MonitorEvent, SELF_MARKER, Verdict, content_hash, format_update_comment,
};
