//! Agent descriptors and the catalog that holds them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model tier an agent runs on.
///
/// Ordered `Low < Mid < High` so ranking can compare tiers directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Low,
    #[default]
    Mid,
    High,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Low => "low",
            ModelTier::Mid => "mid",
            ModelTier::High => "high",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "haiku" => Ok(ModelTier::Low),
            "mid" | "medium" | "sonnet" => Ok(ModelTier::Mid),
            "high" | "opus" => Ok(ModelTier::High),
            _ => Err(format!("Invalid ModelTier: {}", s)),
        }
    }
}

/// Broad category of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCategory {
    #[default]
    Reviewer,
    LanguageSpecialist,
    DomainSpecialist,
    Coordinator,
    Generalist,
    Other,
}

impl AgentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Reviewer => "reviewer",
            AgentCategory::LanguageSpecialist => "language_specialist",
            AgentCategory::DomainSpecialist => "domain_specialist",
            AgentCategory::Coordinator => "coordinator",
            AgentCategory::Generalist => "generalist",
            AgentCategory::Other => "other",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared capabilities of one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique agent name
    pub name: String,
    #[serde(default)]
    pub category: AgentCategory,
    #[serde(default)]
    pub description: String,
    /// Review dimensions this agent covers
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub model_tier: ModelTier,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, category: AgentCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            dimensions: Vec::new(),
            languages: Vec::new(),
            domains: Vec::new(),
            model_tier: ModelTier::default(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimensions.push(dimension.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.model_tier = tier;
        self
    }

    // ==================== Capability Queries ====================

    pub fn covers_dimension(&self, dimension: &str) -> bool {
        self.dimensions.iter().any(|d| d.eq_ignore_ascii_case(dimension))
    }

    pub fn speaks(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    pub fn knows_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    /// Free-text capability search over name, description and declared tags.
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self
                .dimensions
                .iter()
                .chain(self.domains.iter())
                .any(|tag| tag.to_lowercase().contains(&term))
    }
}

/// Read-only catalog of agents, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AgentCatalog {
    agents: Vec<AgentDescriptor>,
}

impl AgentCatalog {
    /// Build a catalog. Later duplicates of a name are dropped.
    pub fn new(agents: Vec<AgentDescriptor>) -> Self {
        let mut unique: Vec<AgentDescriptor> = Vec::with_capacity(agents.len());
        for agent in agents {
            if !unique.iter().any(|a| a.name == agent.name) {
                unique.push(agent);
            }
        }
        Self { agents: unique }
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
