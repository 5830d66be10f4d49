//! Issue tracker adapters.

pub mod github;

pub use github::GhIssueTracker;
