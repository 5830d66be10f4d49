//! Issue watcher
//!
//! Polls watched issues and decides when an update deserves a re-review.
//! One watcher serves both classification modes:
//!
//! - **baseline diff**: any difference from the stored baseline emits
//!   events and triggers a re-review
//! - **substance**: when the remote modification time advances, new
//!   comments are scored and only substantial updates trigger a re-review
//!   (plus a dated summary comment on the issue)
//!
//! Baselines are persisted after every check, so a restart resumes from the
//! last seen state. A re-review that fails leaves the baseline untouched and
//! is retried on the next cycle. Comments the watcher or a triggered review
//! posted never count as updates.

use crate::config::WatchParams;
use crate::ports::event_log::{EventLog, NoEventLog};
use crate::ports::issue_tracker::{IssueTracker, TrackerError};
use crate::ports::review_trigger::ReviewTrigger;
use crate::ports::state_store::{StoreError, WatchStateStore};
use chrono::{DateTime, Utc};
use squad_domain::{
    ChangeKind, ClassificationMode, ClassificationRules, IssueComment, IssueRecord, IssueSnapshot,
    MonitorEvent, Verdict, format_update_comment,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum WatchError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What one poll cycle did
#[derive(Debug, Default)]
pub struct PollSummary {
    pub checked: usize,
    pub events: Vec<MonitorEvent>,
    /// Issues a re-review was triggered for
    pub triggered: Vec<String>,
    /// Issues that could not be fetched, with the cause
    pub errors: Vec<(String, String)>,
}

pub struct IssueWatcher {
    tracker: Arc<dyn IssueTracker>,
    store: Arc<dyn WatchStateStore>,
    trigger: Arc<dyn ReviewTrigger>,
    events: Arc<dyn EventLog>,
    rules: ClassificationRules,
    params: WatchParams,
    records: Mutex<BTreeMap<String, IssueRecord>>,
}

impl IssueWatcher {
    /// Load baselines from `store`; a missing or corrupt store starts empty.
    pub fn open(
        tracker: Arc<dyn IssueTracker>,
        store: Arc<dyn WatchStateStore>,
        trigger: Arc<dyn ReviewTrigger>,
        params: WatchParams,
    ) -> Self {
        let records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Starting with no watched issues: {}", e);
                BTreeMap::new()
            }
        };
        info!(
            "Watching {} issues ({} mode)",
            records.len(),
            params.mode
        );
        Self {
            tracker,
            store,
            trigger,
            events: Arc::new(NoEventLog),
            rules: ClassificationRules::default(),
            params,
            records: Mutex::new(records),
        }
    }

    pub fn with_rules(mut self, rules: ClassificationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_event_log(mut self, events: Arc<dyn EventLog>) -> Self {
        self.events = events;
        self
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, IssueRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ==================== Registration ====================

    /// Fetch the issue and store its current state as the baseline.
    pub async fn register(&self, issue_id: &str) -> Result<IssueRecord, WatchError> {
        let seen_at = Utc::now();
        let snapshot = self.tracker.fetch(issue_id).await?;
        let record = IssueRecord::from_snapshot(&snapshot, seen_at);
        let mut records = self.lock();
        records.insert(issue_id.to_string(), record.clone());
        self.store.save(&records)?;
        info!("Registered issue {}", issue_id);
        Ok(record)
    }

    /// Stop watching; returns whether the issue was watched.
    pub fn unregister(&self, issue_id: &str) -> Result<bool, StoreError> {
        let mut records = self.lock();
        let removed = records.remove(issue_id).is_some();
        if removed {
            self.store.save(&records)?;
            info!("Unregistered issue {}", issue_id);
        }
        Ok(removed)
    }

    pub fn watched(&self) -> Vec<IssueRecord> {
        self.lock().values().cloned().collect()
    }

    // ==================== Detection ====================

    /// Compare `snapshot` with the baseline, then replace the baseline.
    ///
    /// An unregistered issue is registered and reports nothing. Each call
    /// reports only changes since the previous one.
    pub fn check(
        &self,
        issue_id: &str,
        snapshot: &IssueSnapshot,
    ) -> Result<Vec<MonitorEvent>, StoreError> {
        self.check_seen_at(issue_id, snapshot, Utc::now())
    }

    /// `check` for a snapshot whose fetch started at `seen_at`.
    fn check_seen_at(
        &self,
        issue_id: &str,
        snapshot: &IssueSnapshot,
        seen_at: DateTime<Utc>,
    ) -> Result<Vec<MonitorEvent>, StoreError> {
        let now = Utc::now();
        let mut records = self.lock();
        let events = match records.get_mut(issue_id) {
            Some(record) => {
                let events = record.diff(snapshot, now);
                record.refresh(snapshot, seen_at);
                events
            }
            None => {
                debug!("Auto-registering issue {}", issue_id);
                let mut record = IssueRecord::from_snapshot(snapshot, seen_at);
                record.issue_id = issue_id.to_string();
                records.insert(issue_id.to_string(), record);
                Vec::new()
            }
        };
        self.store.save(&records)?;
        drop(records);

        for event in &events {
            info!(
                "Issue {}: {} ({} -> {})",
                event.issue_id, event.kind, event.old_summary, event.new_summary
            );
            self.events.log(event);
        }
        Ok(events)
    }

    /// Score comments for implementation progress.
    pub fn classify<'c>(
        &self,
        comments: impl IntoIterator<Item = &'c IssueComment>,
        description_changed: bool,
    ) -> Verdict {
        self.rules.classify(comments, description_changed)
    }

    // ==================== Polling ====================

    /// Fetch and evaluate every watched issue once.
    ///
    /// A failure on one issue is logged and does not stop the cycle.
    pub async fn poll_once(&self) -> PollSummary {
        let ids: Vec<String> = self.lock().keys().cloned().collect();
        let mut summary = PollSummary::default();

        for issue_id in ids {
            // watermark taken before the fetch so nothing posted meanwhile is skipped
            let seen_at = Utc::now();
            let snapshot = match self.tracker.fetch(&issue_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Failed to fetch issue {}: {}", issue_id, e);
                    summary.errors.push((issue_id, e.to_string()));
                    continue;
                }
            };
            summary.checked += 1;

            let result = match self.params.mode {
                ClassificationMode::BaselineDiff => {
                    self.poll_baseline(&issue_id, &snapshot, seen_at).await
                }
                ClassificationMode::Substance => {
                    self.poll_substance(&issue_id, &snapshot, seen_at).await
                }
            };
            match result {
                Ok((events, triggered)) => {
                    summary.events.extend(events);
                    if triggered {
                        summary.triggered.push(issue_id);
                    }
                }
                Err(e) => {
                    warn!("Failed to update baseline for issue {}: {}", issue_id, e);
                    summary.errors.push((issue_id, e.to_string()));
                }
            }
        }

        debug!(
            "Poll cycle: {} checked, {} events, {} re-reviews",
            summary.checked,
            summary.events.len(),
            summary.triggered.len()
        );
        summary
    }

    async fn poll_baseline(
        &self,
        issue_id: &str,
        snapshot: &IssueSnapshot,
        seen_at: DateTime<Utc>,
    ) -> Result<(Vec<MonitorEvent>, bool), StoreError> {
        let previous = self.lock().get(issue_id).cloned();
        let events = self.check_seen_at(issue_id, snapshot, seen_at)?;
        if events.is_empty() {
            return Ok((events, false));
        }
        let reason = events
            .iter()
            .map(|e| e.kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let triggered = self.fire(issue_id, &reason).await;
        if !triggered && let Some(previous) = previous {
            let mut records = self.lock();
            if let Some(stored) = records.get_mut(issue_id) {
                *stored = previous;
                self.store.save(&records)?;
                debug!("Kept previous baseline for issue {}", issue_id);
            }
        }
        Ok((events, triggered))
    }

    async fn poll_substance(
        &self,
        issue_id: &str,
        snapshot: &IssueSnapshot,
        seen_at: DateTime<Utc>,
    ) -> Result<(Vec<MonitorEvent>, bool), StoreError> {
        let now = Utc::now();
        let Some(record) = self.lock().get(issue_id).cloned() else {
            return Ok((Vec::new(), false));
        };

        let mut events = Vec::new();
        let mut triggered = false;

        if record.remote_advanced(snapshot) {
            let fresh = record.new_comments(snapshot);
            let description_changed = record.description_changed(snapshot);
            if fresh.is_empty() && !description_changed {
                // nothing external to classify, e.g. our own comments
                debug!("Issue {} advanced without external changes", issue_id);
                self.refresh_baseline(issue_id, snapshot, seen_at)?;
                return Ok((events, false));
            }
            let verdict = self.classify(fresh, description_changed);
            let event = MonitorEvent::new(
                issue_id,
                ChangeKind::RemoteUpdate,
                timestamp_or_never(record.last_modified),
                timestamp_or_never(snapshot.last_modified),
                now,
            )
            .with_verdict(verdict.clone());
            self.events.log(&event);
            events.push(event);

            if verdict.substantial {
                info!("Substantial update on issue {}: {}", issue_id, verdict.reason);
                triggered = self.fire(issue_id, &verdict.reason).await;
                if !triggered {
                    debug!("Kept previous baseline for issue {}", issue_id);
                    return Ok((events, false));
                }
                if self.params.post_summary {
                    let body = format_update_comment(issue_id, &verdict, now.date_naive());
                    if let Err(e) = self.tracker.post_comment(issue_id, &body).await {
                        warn!("Failed to post summary on issue {}: {}", issue_id, e);
                    }
                }
            } else {
                info!("Informational update on issue {}: {}", issue_id, verdict.reason);
            }
        }

        self.refresh_baseline(issue_id, snapshot, seen_at)?;
        Ok((events, triggered))
    }

    fn refresh_baseline(
        &self,
        issue_id: &str,
        snapshot: &IssueSnapshot,
        seen_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut records = self.lock();
        if let Some(stored) = records.get_mut(issue_id) {
            stored.refresh(snapshot, seen_at);
        }
        self.store.save(&records)?;
        Ok(())
    }

    async fn fire(&self, issue_id: &str, reason: &str) -> bool {
        match self.trigger.trigger(issue_id, reason).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Poll until `cancel` fires. Cancellation interrupts the sleep between
    /// cycles; a cycle in progress finishes first.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            "Issue watcher started (every {:?})",
            self.params.interval
        );
        while !cancel.is_cancelled() {
            self.poll_once().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.params.interval) => {}
            }
        }
        info!("Issue watcher stopped");
    }
}

fn timestamp_or_never(at: Option<chrono::DateTime<Utc>>) -> String {
    at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "never".to_string())
}
