//! Use cases (application services)

pub mod agent_selector;
pub mod execution_coordinator;
pub mod issue_watcher;
pub mod performance_tracker;
pub mod run_review;
