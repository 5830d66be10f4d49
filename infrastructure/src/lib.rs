//! Infrastructure layer for review-squad
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agents;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod tracker;

// Re-export commonly used types
pub use agents::{CommandAgentInvoker, CommandTaskClassifier, load_profile};
pub use catalog::{CatalogError, CatalogLoader};
pub use config::{ConfigError, ConfigLoader, FileConfig, FileOutputConfig};
pub use logging::JsonlEventLog;
pub use persistence::{JsonPerformanceStore, JsonWatchStateStore, atomic_write};
pub use tracker::GhIssueTracker;
