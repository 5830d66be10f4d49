//! Agent selector service
//!
//! Wraps [`TeamSelector`] with a shared catalog, tunables and the
//! performance history of the current pipeline.

use squad_domain::{
    AgentCatalog, AgentHistory, NoHistory, ReviewTeam, SelectionTunables, TaskProfile,
    TeamSelector,
};
use std::sync::Arc;
use tracing::info;

pub struct AgentSelector {
    catalog: Arc<AgentCatalog>,
    tunables: SelectionTunables,
    history: Arc<dyn AgentHistory + Send + Sync>,
}

impl AgentSelector {
    pub fn new(catalog: Arc<AgentCatalog>, tunables: SelectionTunables) -> Self {
        Self {
            catalog,
            tunables,
            history: Arc::new(NoHistory),
        }
    }

    pub fn with_history(mut self, history: Arc<dyn AgentHistory + Send + Sync>) -> Self {
        self.history = history;
        self
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn tunables(&self) -> &SelectionTunables {
        &self.tunables
    }

    fn selector(&self) -> TeamSelector<'_> {
        TeamSelector::new(&self.catalog, &self.tunables).with_history(self.history.as_ref())
    }

    /// Never fails; an empty catalog or profile yields an empty team.
    pub fn select_review_team(&self, profile: &TaskProfile, max_agents: usize) -> ReviewTeam {
        let team = self.selector().select_review_team(profile, max_agents);
        info!(
            "Selected {} agents ({}) for {}",
            team.total_size,
            team.pattern,
            profile.task_type
        );
        team
    }

    /// Always returns exactly one agent name.
    pub fn select_implementation_agent(&self, profile: &TaskProfile) -> String {
        let agent = self.selector().select_implementation_agent(profile);
        info!("Implementation agent for {}: {}", profile.task_type, agent);
        agent
    }
}
