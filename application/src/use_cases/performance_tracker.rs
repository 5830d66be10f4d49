//! Performance tracker service
//!
//! Owns the per-agent [`AgentRecord`]s for one pipeline. Every mutation is
//! written through the [`PerformanceStore`] immediately, so a crash never
//! loses more than the call in flight.

use crate::ports::state_store::{PerformanceStore, StoreError};
use chrono::{NaiveDate, Utc};
use squad_domain::{AgentHistory, AgentRecord, EffectivenessWeights, RunOutcome, format_report};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub struct PerformanceTracker {
    store: Arc<dyn PerformanceStore>,
    weights: EffectivenessWeights,
    records: Mutex<BTreeMap<String, AgentRecord>>,
}

impl PerformanceTracker {
    /// Load records from `store`.
    ///
    /// A missing or corrupt store starts empty with a warning. Derived
    /// fields are recomputed with `weights`, whatever the file says.
    pub fn open(store: Arc<dyn PerformanceStore>, weights: EffectivenessWeights) -> Self {
        let mut records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Starting with empty performance history: {}", e);
                BTreeMap::new()
            }
        };
        for (name, record) in records.iter_mut() {
            record.agent = name.clone();
            record.recompute(&weights);
        }
        info!("Loaded performance history for {} agents", records.len());

        Self {
            store,
            weights,
            records: Mutex::new(records),
        }
    }

    pub fn weights(&self) -> &EffectivenessWeights {
        &self.weights
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, AgentRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // ==================== Mutations ====================

    /// Add one run's counters for `agent` and persist.
    pub fn record_run(&self, agent: &str, outcome: RunOutcome) -> Result<(), StoreError> {
        let mut records = self.lock();
        let today = Self::today();
        let record = records
            .entry(agent.to_string())
            .or_insert_with(|| AgentRecord::new(agent, today));
        record.apply_run(outcome, &self.weights, today);
        debug!(
            "Recorded run for {}: score {:.3}, runs {}",
            agent,
            record.effectiveness_score(),
            record.total_runs
        );
        if record.is_low_performer() {
            warn!(
                "Agent {} is a low performer (score {:.3} after {} runs)",
                agent,
                record.effectiveness_score(),
                record.total_runs
            );
        }
        self.store.save(&records)
    }

    /// Credit `resolved` findings to `agent` without counting a run.
    pub fn record_resolutions(&self, agent: &str, resolved: u64) -> Result<(), StoreError> {
        let mut records = self.lock();
        let today = Self::today();
        records
            .entry(agent.to_string())
            .or_insert_with(|| AgentRecord::new(agent, today))
            .apply_resolutions(resolved, &self.weights, today);
        self.store.save(&records)
    }

    // ==================== Queries ====================

    pub fn record(&self, agent: &str) -> Option<AgentRecord> {
        self.lock().get(agent).cloned()
    }

    /// All records in name order.
    pub fn records(&self) -> Vec<AgentRecord> {
        self.lock().values().cloned().collect()
    }

    pub fn effectiveness(&self, agent: &str) -> Option<f64> {
        self.lock().get(agent).map(|r| r.effectiveness_score())
    }

    /// Advisory unless `strict`: then true exactly for low performers.
    pub fn is_excluded(&self, agent: &str, strict: bool) -> bool {
        strict && self.lock().get(agent).is_some_and(|r| r.is_low_performer())
    }

    pub fn format_report(&self, top_n: usize, include_low_performers: bool) -> String {
        let records = self.lock();
        format_report(records.values(), top_n, include_low_performers)
    }

    // ==================== Lifecycle ====================

    /// Write the current records to the store.
    pub fn flush(&self) -> Result<(), StoreError> {
        let records = self.lock();
        self.store.save(&records)
    }

    /// Flush and release the tracker.
    pub fn close(self) -> Result<(), StoreError> {
        self.flush()
    }
}

impl AgentHistory for PerformanceTracker {
    fn effectiveness(&self, agent: &str) -> Option<f64> {
        PerformanceTracker::effectiveness(self, agent)
    }

    fn is_excluded(&self, agent: &str, strict: bool) -> bool {
        PerformanceTracker::is_excluded(self, agent, strict)
    }
}
