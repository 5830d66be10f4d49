//! Application layer for review-squad
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, WatchParams};
pub use ports::{
    agent_invoker::{AgentInvoker, InvocationError, PhaseContext},
    event_log::{EventLog, NoEventLog},
    issue_tracker::{IssueTracker, TrackerError},
    progress::{ExecutionProgress, NoProgress},
    review_trigger::{LogOnlyTrigger, ReviewTrigger, TriggerError},
    state_store::{PerformanceStore, StoreError, WatchStateStore},
    task_classifier::{ClassifierError, TaskClassifier},
};
pub use use_cases::agent_selector::AgentSelector;
pub use use_cases::execution_coordinator::{
    AgentFailure, ExecutionCoordinator, ExecutionReport, PhaseOutcome, PhaseStatus,
};
pub use use_cases::issue_watcher::{IssueWatcher, PollSummary, WatchError};
pub use use_cases::performance_tracker::PerformanceTracker;
pub use use_cases::run_review::{
    RunReviewError, RunReviewInput, RunReviewOutput, RunReviewUseCase, review_comment,
};
