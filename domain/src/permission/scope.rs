//! Actions, the scope ladder and deny families.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An action an agent may attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Suggest,
    Write,
    Sign,
    Approve,
    Delete,
    Deploy,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Read,
        Action::Suggest,
        Action::Write,
        Action::Sign,
        Action::Approve,
        Action::Delete,
        Action::Deploy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Suggest => "suggest",
            Action::Write => "write",
            Action::Sign => "sign",
            Action::Approve => "approve",
            Action::Delete => "delete",
            Action::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid Action: {}", s))
    }
}

/// Ordered privilege ladder.
///
/// Each rung includes every action of the rungs below it, so privilege
/// comparisons between policies are always well-defined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// No actions at all. Used for agents missing from the registry.
    None,
    #[default]
    ReadOnly,
    /// read + suggest + write
    Contributor,
    /// contributor + sign
    Signer,
    /// signer + approve
    Approver,
}

impl ScopeLevel {
    pub fn actions(&self) -> BTreeSet<Action> {
        let actions: &[Action] = match self {
            ScopeLevel::None => &[],
            ScopeLevel::ReadOnly => &[Action::Read],
            ScopeLevel::Contributor => &[Action::Read, Action::Suggest, Action::Write],
            ScopeLevel::Signer => &[Action::Read, Action::Suggest, Action::Write, Action::Sign],
            ScopeLevel::Approver => &[
                Action::Read,
                Action::Suggest,
                Action::Write,
                Action::Sign,
                Action::Approve,
            ],
        };
        actions.iter().copied().collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeLevel::None => "none",
            ScopeLevel::ReadOnly => "read_only",
            ScopeLevel::Contributor => "contributor",
            ScopeLevel::Signer => "signer",
            ScopeLevel::Approver => "approver",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScopeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(ScopeLevel::None),
            "read_only" | "readonly" | "read" => Ok(ScopeLevel::ReadOnly),
            "contributor" | "write" => Ok(ScopeLevel::Contributor),
            "signer" | "sign" => Ok(ScopeLevel::Signer),
            "approver" | "approve" => Ok(ScopeLevel::Approver),
            _ => Err(format!("Invalid ScopeLevel: {}", s)),
        }
    }
}

/// Per-family deny list, applied on top of a scope level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyFamily {
    #[default]
    None,
    NoDelete,
    NoDeploy,
    NoDeleteNoDeploy,
}

impl DenyFamily {
    pub fn actions(&self) -> BTreeSet<Action> {
        let actions: &[Action] = match self {
            DenyFamily::None => &[],
            DenyFamily::NoDelete => &[Action::Delete],
            DenyFamily::NoDeploy => &[Action::Deploy],
            DenyFamily::NoDeleteNoDeploy => &[Action::Delete, Action::Deploy],
        };
        actions.iter().copied().collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DenyFamily::None => "none",
            DenyFamily::NoDelete => "no_delete",
            DenyFamily::NoDeploy => "no_deploy",
            DenyFamily::NoDeleteNoDeploy => "no_delete_no_deploy",
        }
    }
}

impl fmt::Display for DenyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DenyFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(DenyFamily::None),
            "no_delete" => Ok(DenyFamily::NoDelete),
            "no_deploy" => Ok(DenyFamily::NoDeploy),
            "no_delete_no_deploy" | "both" => Ok(DenyFamily::NoDeleteNoDeploy),
            _ => Err(format!("Invalid DenyFamily: {}", s)),
        }
    }
}
