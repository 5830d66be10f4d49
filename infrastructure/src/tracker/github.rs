//! GitHub issue tracker using the `gh` CLI.
//!
//! Issue ids are either a bare number (`42`, resolved against the default
//! repository) or `owner/repo#42`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use squad_application::{IssueTracker, TrackerError};
use squad_domain::{IssueComment, IssueSnapshot};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

const ISSUE_FIELDS: &str = "title,body,comments,labels,updatedAt";

/// Issue tracker backed by `gh issue view` / `gh issue comment`.
pub struct GhIssueTracker {
    repo: Option<String>,
    working_dir: Option<String>,
}

impl GhIssueTracker {
    /// Create a tracker if `gh` is installed and authenticated.
    pub fn try_new(repo: Option<String>, working_dir: Option<String>) -> Result<Self, TrackerError> {
        if which::which("gh").is_err() {
            return Err(TrackerError::NotAvailable("gh CLI not found".to_string()));
        }

        let mut cmd = std::process::Command::new("gh");
        cmd.arg("auth").arg("status");
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        if let Some(ref dir) = working_dir {
            cmd.current_dir(dir);
        }
        match cmd.status() {
            Ok(status) if status.success() => {
                info!("GitHub issue tracker initialized");
                Ok(Self { repo, working_dir })
            }
            _ => Err(TrackerError::NotAvailable(
                "gh CLI is not authenticated".to_string(),
            )),
        }
    }

    fn command(&self, issue_id: &str, verb: &str) -> Result<Command, TrackerError> {
        let (repo, number) = parse_issue_ref(issue_id)?;
        let mut cmd = Command::new("gh");
        cmd.arg("issue").arg(verb).arg(number.to_string());
        if let Some(repo) = repo.or(self.repo.as_deref()) {
            cmd.arg("--repo").arg(repo);
        }
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

#[async_trait]
impl IssueTracker for GhIssueTracker {
    async fn fetch(&self, issue_id: &str) -> Result<IssueSnapshot, TrackerError> {
        debug!("Fetching issue {}", issue_id);
        let mut cmd = self.command(issue_id, "view")?;
        cmd.arg("--json").arg(ISSUE_FIELDS);

        let output = cmd
            .output()
            .await
            .map_err(|e| TrackerError::CommandFailed(format!("Failed to execute gh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("Could not resolve") || stderr.contains("not found") {
                return Err(TrackerError::NotFound(issue_id.to_string()));
            }
            return Err(TrackerError::CommandFailed(format!(
                "gh issue view failed: {}",
                stderr.trim()
            )));
        }

        parse_issue_json(issue_id, &String::from_utf8_lossy(&output.stdout))
    }

    async fn post_comment(&self, issue_id: &str, body: &str) -> Result<(), TrackerError> {
        let mut cmd = self.command(issue_id, "comment")?;
        cmd.arg("--body-file")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| TrackerError::CommandFailed(format!("Failed to execute gh: {}", e)))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(body.as_bytes())
                .await
                .map_err(|e| TrackerError::CommandFailed(e.to_string()))?;
        }
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TrackerError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TrackerError::CommandFailed(format!(
                "gh issue comment failed: {}",
                stderr.trim()
            )));
        }
        debug!("Commented on issue {}", issue_id);
        Ok(())
    }
}

/// Split `owner/repo#42` or `42` into repository and number.
pub fn parse_issue_ref(issue_id: &str) -> Result<(Option<&str>, u64), TrackerError> {
    let (repo, number) = match issue_id.rsplit_once('#') {
        Some((repo, number)) if !repo.is_empty() => (Some(repo), number),
        Some((_, number)) => (None, number),
        None => (None, issue_id),
    };
    let number = number
        .trim()
        .parse::<u64>()
        .map_err(|_| TrackerError::Parse(format!("invalid issue id: {}", issue_id)))?;
    Ok((repo, number))
}

#[derive(Deserialize)]
struct GhAuthor {
    #[serde(default)]
    login: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhComment {
    #[serde(default)]
    author: Option<GhAuthor>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhIssue {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    comments: Vec<GhComment>,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Convert `gh issue view --json` output to a snapshot.
pub fn parse_issue_json(issue_id: &str, json: &str) -> Result<IssueSnapshot, TrackerError> {
    let issue: GhIssue = serde_json::from_str(json)
        .map_err(|e| TrackerError::Parse(format!("Failed to parse gh output: {}", e)))?;

    Ok(IssueSnapshot {
        issue_id: issue_id.to_string(),
        title: issue.title,
        description: issue.body,
        comments: issue
            .comments
            .into_iter()
            .map(|c| IssueComment {
                author: c.author.map(|a| a.login).unwrap_or_default(),
                body: c.body,
                created_at: c.created_at,
            })
            .collect(),
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        last_modified: issue.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue_ref() {
        assert_eq!(parse_issue_ref("42").unwrap(), (None, 42));
        assert_eq!(parse_issue_ref("#42").unwrap(), (None, 42));
        assert_eq!(
            parse_issue_ref("octo/widgets#7").unwrap(),
            (Some("octo/widgets"), 7)
        );
        assert!(parse_issue_ref("octo/widgets").is_err());
    }

    #[test]
    fn test_parse_issue_json() {
        let json = r#"{
            "title": "Token refresh race",
            "body": "Two tabs refresh at once",
            "updatedAt": "2026-04-02T10:00:00Z",
            "labels": [{"name": "bug"}, {"name": "auth"}],
            "comments": [
                {"author": {"login": "dev"}, "body": "merged PR #9", "createdAt": "2026-04-02T09:59:00Z"},
                {"author": null, "body": "ghost"}
            ]
        }"#;
        let snapshot = parse_issue_json("9", json).unwrap();
        assert_eq!(snapshot.title, "Token refresh race");
        assert_eq!(snapshot.labels, vec!["bug", "auth"]);
        assert_eq!(snapshot.comments.len(), 2);
        assert_eq!(snapshot.comments[0].author, "dev");
        assert!(snapshot.comments[0].created_at.is_some());
        assert_eq!(snapshot.comments[1].author, "");
        assert!(snapshot.last_modified.is_some());
    }

    #[test]
    fn test_parse_issue_json_rejects_garbage() {
        assert!(matches!(
            parse_issue_json("1", "not json"),
            Err(TrackerError::Parse(_))
        ));
    }
}
