//! Watched issues: baselines, change events and update classification.

pub mod classify;
pub mod entities;

pub use classify::{ClassificationRules, SELF_MARKER, format_update_comment};
pub use entities::{
    ChangeKind, ClassificationMode, IssueComment, IssueRecord, IssueSnapshot, MonitorEvent,
    Verdict, content_hash,
};
