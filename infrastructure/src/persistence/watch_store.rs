//! JSON file store for watched issue baselines.

use super::{read_json, write_json};
use squad_application::{StoreError, WatchStateStore};
use squad_domain::IssueRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// `{ "<issue_id>": { registered_at, last_seen, ..., labels } }`
pub struct JsonWatchStateStore {
    path: PathBuf,
}

impl JsonWatchStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WatchStateStore for JsonWatchStateStore {
    fn load(&self) -> Result<BTreeMap<String, IssueRecord>, StoreError> {
        read_json(&self.path)
    }

    fn save(&self, records: &BTreeMap<String, IssueRecord>) -> Result<(), StoreError> {
        write_json(&self.path, records)
    }
}
