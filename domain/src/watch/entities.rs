//! Issue watcher entities

use super::classify::SELF_MARKER;
use crate::core::string::{single_line, truncate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 of `text`.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// One comment on a tracked issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComment {
    #[serde(default)]
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl IssueComment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at: None,
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Whether the watcher or a review it triggered posted this comment.
    pub fn is_self_posted(&self) -> bool {
        self.body.contains(SELF_MARKER)
    }
}

/// Current state of an issue as returned by the tracker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    pub issue_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: Vec<IssueComment>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl IssueSnapshot {
    pub fn new(issue_id: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_comment(mut self, comment: IssueComment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    /// Comments not posted by review-squad itself
    pub fn external_comments(&self) -> impl Iterator<Item = &IssueComment> {
        self.comments.iter().filter(|c| !c.is_self_posted())
    }

    fn latest_comment_at(&self) -> Option<DateTime<Utc>> {
        self.comments.iter().filter_map(|c| c.created_at).max()
    }

    fn sorted_labels(&self) -> Vec<String> {
        let mut labels = self.labels.clone();
        labels.sort();
        labels.dedup();
        labels
    }
}

/// Kind of detected change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    TitleChanged,
    DescriptionChanged,
    NewComment,
    LabelsChanged,
    /// Remote modification time advanced (substance mode)
    RemoteUpdate,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::TitleChanged => "title_changed",
            ChangeKind::DescriptionChanged => "description_changed",
            ChangeKind::NewComment => "new_comment",
            ChangeKind::LabelsChanged => "labels_changed",
            ChangeKind::RemoteUpdate => "remote_update",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Substance classification of an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub substantial: bool,
    pub score: f64,
    pub reason: String,
}

/// One detected change (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    pub issue_id: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub old_summary: String,
    pub new_summary: String,
    #[serde(rename = "timestamp")]
    pub detected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl MonitorEvent {
    pub fn new(
        issue_id: impl Into<String>,
        kind: ChangeKind,
        old_summary: impl Into<String>,
        new_summary: impl Into<String>,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            issue_id: issue_id.into(),
            kind,
            old_summary: old_summary.into(),
            new_summary: new_summary.into(),
            detected_at,
            verdict: None,
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }
}

/// How the watcher decides an update deserves a re-review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Any difference from the stored baseline
    BaselineDiff,
    /// Score new comments for implementation progress
    #[default]
    Substance,
}

impl ClassificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::BaselineDiff => "baseline_diff",
            ClassificationMode::Substance => "substance",
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClassificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "baseline_diff" | "baseline" | "diff" => Ok(ClassificationMode::BaselineDiff),
            "substance" => Ok(ClassificationMode::Substance),
            other => Err(format!("unknown classification mode: {}", other)),
        }
    }
}

/// Stored baseline for one watched issue (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub issue_id: String,
    pub registered_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    pub title_hash: String,
    pub description_hash: String,
    pub comment_count: usize,
    /// Sorted
    pub labels: Vec<String>,
}

impl IssueRecord {
    /// Baseline from `snapshot`, fetched at `seen_at`.
    ///
    /// `comment_count` counts external comments only. `last_seen` never
    /// trails a comment already contained in the snapshot.
    pub fn from_snapshot(snapshot: &IssueSnapshot, seen_at: DateTime<Utc>) -> Self {
        let last_seen = snapshot
            .latest_comment_at()
            .map_or(seen_at, |latest| latest.max(seen_at));
        Self {
            issue_id: snapshot.issue_id.clone(),
            registered_at: seen_at,
            last_seen,
            last_modified: snapshot.last_modified,
            title_hash: content_hash(&snapshot.title),
            description_hash: content_hash(&snapshot.description),
            comment_count: snapshot.external_comments().count(),
            labels: snapshot.sorted_labels(),
        }
    }

    /// One event per differing dimension, without touching the baseline.
    pub fn diff(&self, snapshot: &IssueSnapshot, now: DateTime<Utc>) -> Vec<MonitorEvent> {
        let mut events = Vec::new();
        let id = &self.issue_id;

        if content_hash(&snapshot.title) != self.title_hash {
            events.push(MonitorEvent::new(
                id,
                ChangeKind::TitleChanged,
                short_hash(&self.title_hash),
                truncate(&single_line(&snapshot.title), 80),
                now,
            ));
        }
        if self.description_changed(snapshot) {
            events.push(MonitorEvent::new(
                id,
                ChangeKind::DescriptionChanged,
                short_hash(&self.description_hash),
                short_hash(&content_hash(&snapshot.description)),
                now,
            ));
        }
        let comment_count = snapshot.external_comments().count();
        if comment_count > self.comment_count {
            events.push(MonitorEvent::new(
                id,
                ChangeKind::NewComment,
                format!("{} comments", self.comment_count),
                format!("{} comments", comment_count),
                now,
            ));
        }
        let labels = snapshot.sorted_labels();
        if labels != self.labels {
            events.push(MonitorEvent::new(
                id,
                ChangeKind::LabelsChanged,
                self.labels.join(", "),
                labels.join(", "),
                now,
            ));
        }
        events
    }

    pub fn description_changed(&self, snapshot: &IssueSnapshot) -> bool {
        content_hash(&snapshot.description) != self.description_hash
    }

    /// Whether the remote modification time moved past the stored one.
    pub fn remote_advanced(&self, snapshot: &IssueSnapshot) -> bool {
        match (self.last_modified, snapshot.last_modified) {
            (Some(stored), Some(current)) => current > stored,
            (None, Some(_)) => true,
            (_, None) => false,
        }
    }

    /// External comments created after `last_seen`; undated ones beyond the stored count.
    pub fn new_comments<'s>(&self, snapshot: &'s IssueSnapshot) -> Vec<&'s IssueComment> {
        snapshot
            .external_comments()
            .enumerate()
            .filter(|(i, c)| match c.created_at {
                Some(at) => at > self.last_seen,
                None => *i >= self.comment_count,
            })
            .map(|(_, c)| c)
            .collect()
    }

    /// Replace the baseline with `snapshot`, keeping the registration time.
    pub fn refresh(&mut self, snapshot: &IssueSnapshot, seen_at: DateTime<Utc>) {
        let registered_at = self.registered_at;
        *self = Self::from_snapshot(snapshot, seen_at);
        self.registered_at = registered_at;
    }
}

fn short_hash(hash: &str) -> String {
    format!("sha256:{}", &hash[..hash.len().min(12)])
}
