//! Persistent state store ports
//!
//! Both stores hold one JSON document that is loaded whole and rewritten
//! whole. Writes must be atomic so a failed write leaves the previous file
//! intact.

use squad_domain::{AgentRecord, IssueRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from a state store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("State file I/O failed at {path}: {message}")]
    Io { path: String, message: String },

    #[error("State file is corrupt at {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Failed to serialize state: {0}")]
    Serialize(String),
}

/// Per-agent performance records keyed by agent name
pub trait PerformanceStore: Send + Sync {
    /// A missing store loads as empty.
    fn load(&self) -> Result<BTreeMap<String, AgentRecord>, StoreError>;

    fn save(&self, records: &BTreeMap<String, AgentRecord>) -> Result<(), StoreError>;
}

/// Watched issue baselines keyed by issue id
pub trait WatchStateStore: Send + Sync {
    /// A missing store loads as empty.
    fn load(&self) -> Result<BTreeMap<String, IssueRecord>, StoreError>;

    fn save(&self, records: &BTreeMap<String, IssueRecord>) -> Result<(), StoreError>;
}
