//! JSON file store for agent performance records.

use super::{read_json, write_json};
use squad_application::{PerformanceStore, StoreError};
use squad_domain::AgentRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// `{ "<agent>": { total_runs, ..., is_low_performer } }`
pub struct JsonPerformanceStore {
    path: PathBuf,
}

impl JsonPerformanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PerformanceStore for JsonPerformanceStore {
    fn load(&self) -> Result<BTreeMap<String, AgentRecord>, StoreError> {
        read_json(&self.path)
    }

    fn save(&self, records: &BTreeMap<String, AgentRecord>) -> Result<(), StoreError> {
        write_json(&self.path, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use squad_domain::{EffectivenessWeights, RunOutcome};
    use tempfile::TempDir;

    fn record(name: &str) -> AgentRecord {
        let day = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut r = AgentRecord::new(name, day);
        r.apply_run(RunOutcome::new(4, 1, 0, 0), &EffectivenessWeights::default(), day);
        r
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonPerformanceStore::new(dir.path().join("perf.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonPerformanceStore::new(dir.path().join("perf.json"));
        let records = BTreeMap::from([("rust-pro".to_string(), record("rust-pro"))]);

        store.save(&records).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded["rust-pro"].total_runs, 1);
        assert_eq!(loaded["rust-pro"].critical_findings, 1);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["rust-pro"]["total_findings"], 4);
        assert_eq!(raw["rust-pro"]["last_updated"], "2026-02-01");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("perf.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonPerformanceStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }
}
