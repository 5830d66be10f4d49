//! Team domain entities

use crate::catalog::ModelTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a domain candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainMatch {
    /// Direct domain → agent lookup table hit
    LookupTable,
    /// Free-text search over agent capabilities
    CapabilitySearch,
}

/// Why an agent was selected. Each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SelectionReason {
    Dimension { dimension: String, importance: f64 },
    Language { language: String },
    Domain { domain: String, via: DomainMatch },
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::Dimension {
                dimension,
                importance,
            } => write!(f, "dimension {} ({:.2})", dimension, importance),
            SelectionReason::Language { language } => write!(f, "language {}", language),
            SelectionReason::Domain { domain, via } => match via {
                DomainMatch::LookupTable => write!(f, "domain {}", domain),
                DomainMatch::CapabilitySearch => write!(f, "domain {} (search)", domain),
            },
        }
    }
}

/// One agent on a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAgent {
    pub name: String,
    pub model_tier: ModelTier,
    /// Importance of the dimension this candidate was matched on
    pub dimension_score: f64,
    /// Weighted rank score
    pub score: f64,
    pub reason: SelectionReason,
}

/// Coordination pattern, a pure function of team size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationPattern {
    #[default]
    PeerToPeer,
    MasterWorker,
    Hierarchical,
}

impl CoordinationPattern {
    /// `≤ peer_max` peer-to-peer, `≤ master_worker_max` master-worker, else hierarchical.
    pub fn for_size(size: usize, peer_max: usize, master_worker_max: usize) -> Self {
        if size <= peer_max {
            CoordinationPattern::PeerToPeer
        } else if size <= master_worker_max {
            CoordinationPattern::MasterWorker
        } else {
            CoordinationPattern::Hierarchical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinationPattern::PeerToPeer => "peer-to-peer",
            CoordinationPattern::MasterWorker => "master-worker",
            CoordinationPattern::Hierarchical => "hierarchical",
        }
    }
}

impl fmt::Display for CoordinationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selected review team (Value Object)
///
/// The three lists are disjoint and each is in rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewTeam {
    pub core: Vec<SelectedAgent>,
    pub language: Vec<SelectedAgent>,
    pub domain: Vec<SelectedAgent>,
    pub coordinator: Option<String>,
    pub pattern: CoordinationPattern,
    pub total_size: usize,
    pub estimated_hours: f64,
}

impl ReviewTeam {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total_size == 0
    }

    /// Language and domain specialists, in that order.
    pub fn specialists(&self) -> impl Iterator<Item = &SelectedAgent> {
        self.language.iter().chain(self.domain.iter())
    }

    /// Every selected specialist (core first), excluding the coordinator.
    pub fn selected(&self) -> impl Iterator<Item = &SelectedAgent> {
        self.core.iter().chain(self.specialists())
    }

    /// All agent names including the coordinator.
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.selected().map(|a| a.name.clone()).collect();
        if let Some(coordinator) = &self.coordinator {
            names.push(coordinator.clone());
        }
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected().any(|a| a.name == name) || self.coordinator.as_deref() == Some(name)
    }

    pub fn get(&self, name: &str) -> Option<&SelectedAgent> {
        self.selected().find(|a| a.name == name)
    }
}
