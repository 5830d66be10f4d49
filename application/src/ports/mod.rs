//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_invoker;
pub mod event_log;
pub mod issue_tracker;
pub mod progress;
pub mod review_trigger;
pub mod state_store;
pub mod task_classifier;
