//! Team selection algorithm.
//!
//! Candidates are gathered in three buckets (dimension, language, domain),
//! merged by agent name, ranked by a weighted score and cut to size. The
//! selector never fails: an empty catalog or profile yields an empty team.

use super::entities::{
    CoordinationPattern, DomainMatch, ReviewTeam, SelectedAgent, SelectionReason,
};
use super::tunables::SelectionTunables;
use crate::catalog::{AgentCatalog, AgentCategory, AgentDescriptor};
use crate::task::profile::TaskProfile;
use std::cmp::Ordering;
use tracing::debug;

/// Historical performance lookups used to bias selection.
pub trait AgentHistory {
    /// Effectiveness score in `[0, 1]`, `None` if the agent never ran.
    fn effectiveness(&self, agent: &str) -> Option<f64>;

    /// Whether the agent should be dropped from candidates.
    fn is_excluded(&self, agent: &str, strict: bool) -> bool;
}

/// No history: every agent is equally unknown and nothing is excluded.
pub struct NoHistory;

impl AgentHistory for NoHistory {
    fn effectiveness(&self, _agent: &str) -> Option<f64> {
        None
    }

    fn is_excluded(&self, _agent: &str, _strict: bool) -> bool {
        false
    }
}

struct Candidate<'c> {
    agent: &'c AgentDescriptor,
    /// Importance of the dimension this candidate matched; 0 for language/domain.
    dimension_score: f64,
    reason: SelectionReason,
}

/// Ranks catalog agents against a task profile.
pub struct TeamSelector<'a> {
    catalog: &'a AgentCatalog,
    tunables: &'a SelectionTunables,
    history: &'a dyn AgentHistory,
}

impl<'a> TeamSelector<'a> {
    pub fn new(catalog: &'a AgentCatalog, tunables: &'a SelectionTunables) -> Self {
        Self {
            catalog,
            tunables,
            history: &NoHistory,
        }
    }

    pub fn with_history(mut self, history: &'a dyn AgentHistory) -> Self {
        self.history = history;
        self
    }

    /// Select a ranked, deduplicated team of at most `max_agents` agents.
    pub fn select_review_team(&self, profile: &TaskProfile, max_agents: usize) -> ReviewTeam {
        if max_agents == 0 || self.catalog.is_empty() {
            return ReviewTeam::empty();
        }

        let mut candidates = self.dimension_candidates(profile);
        candidates.extend(self.language_candidates(profile));
        candidates.extend(self.domain_candidates(profile));
        let merged = merge_candidates(candidates);

        let mut ranked: Vec<SelectedAgent> = merged
            .into_iter()
            .map(|c| SelectedAgent {
                name: c.agent.name.clone(),
                model_tier: c.agent.model_tier,
                dimension_score: c.dimension_score,
                score: self.rank_score(c.agent, profile),
                reason: c.reason,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| self.effectiveness(&b.name).total_cmp(&self.effectiveness(&a.name)))
                .then_with(|| a.name.cmp(&b.name))
        });

        let capped = ranked.len().min(max_agents);
        let needs_coordinator = capped > self.tunables.coordinator_threshold;
        let specialist_cap = if needs_coordinator {
            max_agents.saturating_sub(1)
        } else {
            max_agents
        };
        truncate_keeping_core(&mut ranked, specialist_cap);

        let coordinator = needs_coordinator.then(|| self.tunables.coordinator.clone());
        let estimated_hours = self.estimate_hours(&ranked, coordinator.is_some());
        let total_size = ranked.len() + usize::from(coordinator.is_some());

        let mut team = ReviewTeam {
            coordinator,
            pattern: CoordinationPattern::for_size(
                total_size,
                self.tunables.peer_to_peer_max,
                self.tunables.master_worker_max,
            ),
            total_size,
            estimated_hours,
            ..ReviewTeam::default()
        };
        for agent in ranked {
            match agent.reason {
                SelectionReason::Dimension { .. } => team.core.push(agent),
                SelectionReason::Language { .. } => team.language.push(agent),
                SelectionReason::Domain { .. } => team.domain.push(agent),
            }
        }

        debug!(
            "Selected team of {} ({} core, {} language, {} domain, coordinator: {:?})",
            team.total_size,
            team.core.len(),
            team.language.len(),
            team.domain.len(),
            team.coordinator
        );
        team
    }

    /// Pick exactly one agent to implement the task.
    ///
    /// Cascade: language specialist for the primary language, task-type
    /// specialist, best agent for the top dimension, then the generalist.
    pub fn select_implementation_agent(&self, profile: &TaskProfile) -> String {
        if let Some(language) = profile.primary_language() {
            let mut specialists: Vec<&AgentDescriptor> = self
                .eligible()
                .filter(|a| a.category == AgentCategory::LanguageSpecialist && a.speaks(language))
                .collect();
            specialists.sort_by(|a, b| self.bucket_order(a, b));
            if let Some(agent) = specialists.first() {
                return agent.name.clone();
            }
        }

        if let Some(name) = self.tunables.task_type_agents.get(profile.task_type.as_str())
            && self.catalog.contains(name)
        {
            return name.clone();
        }

        if let Some((dimension, _)) = profile.top_dimension() {
            let mut matches: Vec<&AgentDescriptor> = self
                .eligible()
                .filter(|a| a.covers_dimension(dimension))
                .collect();
            matches.sort_by(|a, b| self.bucket_order(a, b));
            if let Some(agent) = matches.first() {
                return agent.name.clone();
            }
        }

        self.tunables.generalist.clone()
    }

    // ==================== Candidate Buckets ====================

    fn dimension_candidates(&self, profile: &TaskProfile) -> Vec<Candidate<'a>> {
        let mut out = Vec::new();
        for (dimension, importance) in profile.dimensions_above(self.tunables.dimension_threshold) {
            let mut matches: Vec<&AgentDescriptor> = self
                .eligible()
                .filter(|a| a.covers_dimension(dimension))
                .collect();
            matches.sort_by(|a, b| self.bucket_order(a, b));
            out.extend(
                matches
                    .into_iter()
                    .take(self.tunables.per_dimension)
                    .map(|agent| Candidate {
                        agent,
                        dimension_score: importance,
                        reason: SelectionReason::Dimension {
                            dimension: dimension.to_string(),
                            importance,
                        },
                    }),
            );
        }
        out
    }

    fn language_candidates(&self, profile: &TaskProfile) -> Vec<Candidate<'a>> {
        let mut out = Vec::new();
        for language in &profile.languages {
            let mut matches: Vec<&AgentDescriptor> =
                self.eligible().filter(|a| a.speaks(language)).collect();
            matches.sort_by(|a, b| {
                let a_specialist = a.category == AgentCategory::LanguageSpecialist;
                let b_specialist = b.category == AgentCategory::LanguageSpecialist;
                b_specialist
                    .cmp(&a_specialist)
                    .then_with(|| self.bucket_order(a, b))
            });
            out.extend(
                matches
                    .into_iter()
                    .take(self.tunables.per_language)
                    .map(|agent| Candidate {
                        agent,
                        dimension_score: 0.0,
                        reason: SelectionReason::Language {
                            language: language.clone(),
                        },
                    }),
            );
        }
        out
    }

    fn domain_candidates(&self, profile: &TaskProfile) -> Vec<Candidate<'a>> {
        let mut out = Vec::new();
        for domain in &profile.domains {
            let direct = self
                .tunables
                .domain_agents
                .get(&domain.to_lowercase())
                .and_then(|name| self.catalog.get(name))
                .filter(|agent| self.is_eligible(agent));

            if let Some(agent) = direct {
                out.push(Candidate {
                    agent,
                    dimension_score: 0.0,
                    reason: SelectionReason::Domain {
                        domain: domain.clone(),
                        via: DomainMatch::LookupTable,
                    },
                });
                continue;
            }

            let mut matches: Vec<&AgentDescriptor> = self
                .eligible()
                .filter(|a| a.knows_domain(domain) || a.mentions(domain))
                .collect();
            matches.sort_by(|a, b| {
                b.knows_domain(domain)
                    .cmp(&a.knows_domain(domain))
                    .then_with(|| {
                        let a_specialist = a.category == AgentCategory::DomainSpecialist;
                        let b_specialist = b.category == AgentCategory::DomainSpecialist;
                        b_specialist.cmp(&a_specialist)
                    })
                    .then_with(|| self.bucket_order(a, b))
            });
            out.extend(
                matches
                    .into_iter()
                    .take(self.tunables.per_domain)
                    .map(|agent| Candidate {
                        agent,
                        dimension_score: 0.0,
                        reason: SelectionReason::Domain {
                            domain: domain.clone(),
                            via: DomainMatch::CapabilitySearch,
                        },
                    }),
            );
        }
        out
    }

    // ==================== Scoring ====================

    /// dimension (up to 40) + language (30) + domain (20) + tier (up to 10)
    fn rank_score(&self, agent: &AgentDescriptor, profile: &TaskProfile) -> f64 {
        let t = self.tunables;
        let best_dimension = profile
            .dimensions
            .iter()
            .filter(|(name, _)| agent.covers_dimension(name))
            .map(|(_, importance)| *importance)
            .fold(0.0_f64, f64::max);

        let mut score = best_dimension.clamp(0.0, 1.0) * t.dimension_weight;
        if profile.languages.iter().any(|l| agent.speaks(l)) {
            score += t.language_weight;
        }
        if profile.domains.iter().any(|d| agent.knows_domain(d)) {
            score += t.domain_weight;
        }
        score + t.tier_weights.for_tier(agent.model_tier)
    }

    fn estimate_hours(&self, agents: &[SelectedAgent], with_coordinator: bool) -> f64 {
        let mut hours: f64 = agents
            .iter()
            .map(|a| self.tunables.tier_hours.for_tier(a.model_tier))
            .sum();
        if with_coordinator {
            hours += self.tunables.coordinator_overhead_hours;
        }
        (hours * 100.0).round() / 100.0
    }

    // ==================== Helpers ====================

    fn is_eligible(&self, agent: &AgentDescriptor) -> bool {
        agent.name != self.tunables.coordinator
            && !self
                .history
                .is_excluded(&agent.name, self.tunables.strict_exclusion)
    }

    fn eligible(&self) -> impl Iterator<Item = &'a AgentDescriptor> + '_ {
        self.catalog
            .agents()
            .iter()
            .filter(move |agent| self.is_eligible(agent))
    }

    fn effectiveness(&self, name: &str) -> f64 {
        self.history.effectiveness(name).unwrap_or(0.0)
    }

    /// Higher tier, then better history, then name.
    fn bucket_order(&self, a: &AgentDescriptor, b: &AgentDescriptor) -> Ordering {
        b.model_tier
            .cmp(&a.model_tier)
            .then_with(|| self.effectiveness(&b.name).total_cmp(&self.effectiveness(&a.name)))
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// Deduplicate by name, keeping the higher dimension score (earlier on ties).
fn merge_candidates(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let mut merged: Vec<Candidate<'_>> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match merged
            .iter_mut()
            .find(|existing| existing.agent.name == candidate.agent.name)
        {
            Some(existing) => {
                if candidate.dimension_score > existing.dimension_score {
                    *existing = candidate;
                }
            }
            None => merged.push(candidate),
        }
    }
    merged
}

/// Truncate a ranked list, keeping at least one dimension candidate when one exists.
fn truncate_keeping_core(ranked: &mut Vec<SelectedAgent>, cap: usize) {
    if ranked.len() <= cap {
        return;
    }
    let is_core = |a: &SelectedAgent| matches!(a.reason, SelectionReason::Dimension { .. });
    let best_core = ranked.iter().position(is_core);
    match best_core {
        Some(index) if cap > 0 && index >= cap => {
            let core = ranked.remove(index);
            ranked.truncate(cap - 1);
            ranked.push(core);
        }
        _ => ranked.truncate(cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelTier;
    use crate::task::profile::TaskType;
    use std::collections::{HashMap, HashSet};

    fn reviewer(name: &str, dimension: &str, tier: ModelTier) -> AgentDescriptor {
        AgentDescriptor::new(name, AgentCategory::Reviewer)
            .with_dimension(dimension)
            .with_tier(tier)
    }

    fn catalog() -> AgentCatalog {
        AgentCatalog::new(vec![
            reviewer("security-auditor", "security", ModelTier::High),
            reviewer("appsec-reviewer", "security", ModelTier::Mid),
            reviewer("crypto-checker", "security", ModelTier::Low),
            reviewer("performance-engineer", "performance", ModelTier::High),
            reviewer("architect-reviewer", "architecture", ModelTier::High),
            reviewer("test-automator", "testing", ModelTier::Mid),
            AgentDescriptor::new("rust-pro", AgentCategory::LanguageSpecialist)
                .with_language("rust")
                .with_tier(ModelTier::Mid),
            AgentDescriptor::new("polyglot", AgentCategory::Reviewer)
                .with_language("rust")
                .with_language("go")
                .with_tier(ModelTier::High),
            AgentDescriptor::new("golang-pro", AgentCategory::LanguageSpecialist)
                .with_language("go")
                .with_tier(ModelTier::Low),
            AgentDescriptor::new("payment-integration", AgentCategory::DomainSpecialist)
                .with_domain("payments")
                .with_tier(ModelTier::Mid),
            AgentDescriptor::new("ledger-expert", AgentCategory::DomainSpecialist)
                .with_description("Double-entry accounting and ledger reconciliation")
                .with_tier(ModelTier::Mid),
            AgentDescriptor::new("review-coordinator", AgentCategory::Coordinator)
                .with_dimension("security")
                .with_tier(ModelTier::High),
        ])
    }

    struct FixedHistory {
        scores: HashMap<&'static str, f64>,
        low: HashSet<&'static str>,
    }

    impl AgentHistory for FixedHistory {
        fn effectiveness(&self, agent: &str) -> Option<f64> {
            self.scores.get(agent).copied()
        }

        fn is_excluded(&self, agent: &str, strict: bool) -> bool {
            strict && self.low.contains(agent)
        }
    }

    #[test]
    fn test_core_agents_exceed_threshold() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::new(TaskType::Security)
            .with_dimension("security", 0.9)
            .with_dimension("performance", 0.2);

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);

        assert!(!team.core.is_empty());
        assert!(team.core.iter().all(|a| a.dimension_score > 0.3));
        let names: Vec<_> = team.core.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["security-auditor", "appsec-reviewer"]);
        assert!(!team.contains("performance-engineer"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default().with_dimension("security", 0.3);

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        assert!(team.is_empty());
    }

    #[test]
    fn test_coordinator_is_never_a_candidate() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default().with_dimension("security", 0.9);

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        assert!(team.selected().all(|a| a.name != "review-coordinator"));
        assert!(team.coordinator.is_none());
    }

    #[test]
    fn test_language_prefers_specialist() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default().with_language("rust");

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        let names: Vec<_> = team.language.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["rust-pro"]);
    }

    #[test]
    fn test_domain_lookup_then_capability_search() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_domain("payments")
            .with_domain("ledger");

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        assert_eq!(team.domain.len(), 2);

        let payments = team.get("payment-integration").unwrap();
        assert!(matches!(
            payments.reason,
            SelectionReason::Domain { via: DomainMatch::LookupTable, .. }
        ));
        let ledger = team.get("ledger-expert").unwrap();
        assert!(matches!(
            ledger.reason,
            SelectionReason::Domain { via: DomainMatch::CapabilitySearch, .. }
        ));
    }

    #[test]
    fn test_no_duplicates_and_collision_keeps_dimension() {
        let catalog = AgentCatalog::new(vec![
            AgentDescriptor::new("rust-security", AgentCategory::LanguageSpecialist)
                .with_dimension("security")
                .with_language("rust")
                .with_domain("payments")
                .with_tier(ModelTier::High),
        ]);
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("security", 0.8)
            .with_language("rust")
            .with_domain("payments");

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        assert_eq!(team.total_size, 1);
        assert_eq!(team.core.len(), 1);
        assert!(team.language.is_empty());
        assert!(team.domain.is_empty());
        // 0.8 * 40 + 30 + 20 + 10
        assert!((team.core[0].score - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_collision_between_dimensions_keeps_higher_importance() {
        let catalog = AgentCatalog::new(vec![
            AgentDescriptor::new("generalist-reviewer", AgentCategory::Reviewer)
                .with_dimension("security")
                .with_dimension("performance"),
        ]);
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("performance", 0.5)
            .with_dimension("security", 0.7);

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 5);
        assert_eq!(team.core.len(), 1);
        assert_eq!(
            team.core[0].reason,
            SelectionReason::Dimension {
                dimension: "security".to_string(),
                importance: 0.7
            }
        );
    }

    #[test]
    fn test_size_never_exceeds_max_and_names_unique() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("security", 0.9)
            .with_dimension("performance", 0.8)
            .with_dimension("architecture", 0.7)
            .with_dimension("testing", 0.6)
            .with_language("rust")
            .with_language("go")
            .with_domain("payments")
            .with_domain("ledger");

        for max in 0..12 {
            let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, max);
            assert!(team.total_size <= max, "max {} gave {}", max, team.total_size);
            let names = team.agent_names();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len());
            assert_eq!(names.len(), team.total_size);
        }
    }

    #[test]
    fn test_coordinator_appended_for_large_teams() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("security", 0.9)
            .with_dimension("performance", 0.8)
            .with_dimension("architecture", 0.7)
            .with_dimension("testing", 0.6)
            .with_language("rust")
            .with_language("go")
            .with_domain("payments");

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 9);
        assert_eq!(team.coordinator.as_deref(), Some("review-coordinator"));
        assert_eq!(team.total_size, 9);
        assert_eq!(team.pattern, CoordinationPattern::Hierarchical);
        assert_eq!(team.agent_names().last().unwrap(), "review-coordinator");
    }

    #[test]
    fn test_pattern_follows_final_size() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("security", 0.9)
            .with_dimension("performance", 0.8)
            .with_dimension("architecture", 0.7)
            .with_language("rust");

        let selector = TeamSelector::new(&catalog, &tunables);
        let two = selector.select_review_team(&profile, 2);
        assert_eq!(two.total_size, 2);
        assert_eq!(two.pattern, CoordinationPattern::PeerToPeer);

        let five = selector.select_review_team(&profile, 5);
        assert_eq!(five.total_size, 5);
        assert_eq!(five.pattern, CoordinationPattern::MasterWorker);
    }

    #[test]
    fn test_truncation_keeps_a_core_agent() {
        let catalog = AgentCatalog::new(vec![
            reviewer("style-checker", "style", ModelTier::Low),
            AgentDescriptor::new("rust-pro", AgentCategory::LanguageSpecialist)
                .with_language("rust")
                .with_tier(ModelTier::High),
        ]);
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default()
            .with_dimension("style", 0.31)
            .with_language("rust");

        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 1);
        assert_eq!(team.total_size, 1);
        assert_eq!(team.core.len(), 1);
        assert_eq!(team.core[0].name, "style-checker");
    }

    #[test]
    fn test_hours_estimate() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::default().with_dimension("security", 0.9);

        // security-auditor (high 1.5) + appsec-reviewer (mid 1.0)
        let team = TeamSelector::new(&catalog, &tunables).select_review_team(&profile, 10);
        assert!((team.estimated_hours - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_yield_empty_team() {
        let tunables = SelectionTunables::default();
        let empty = AgentCatalog::default();
        let profile = TaskProfile::default().with_dimension("security", 0.9);
        let team = TeamSelector::new(&empty, &tunables).select_review_team(&profile, 5);
        assert!(team.is_empty());
        assert_eq!(team.pattern, CoordinationPattern::PeerToPeer);

        let catalog = catalog();
        let team = TeamSelector::new(&catalog, &tunables)
            .select_review_team(&TaskProfile::default(), 5);
        assert!(team.is_empty());
        assert_eq!(team.estimated_hours, 0.0);
    }

    #[test]
    fn test_history_breaks_ties_within_bucket() {
        let catalog = AgentCatalog::new(vec![
            reviewer("alpha", "security", ModelTier::Mid),
            reviewer("beta", "security", ModelTier::Mid),
            reviewer("gamma", "security", ModelTier::Mid),
        ]);
        let tunables = SelectionTunables::default();
        let history = FixedHistory {
            scores: HashMap::from([("gamma", 0.9), ("beta", 0.5)]),
            low: HashSet::new(),
        };
        let profile = TaskProfile::default().with_dimension("security", 0.9);

        let team = TeamSelector::new(&catalog, &tunables)
            .with_history(&history)
            .select_review_team(&profile, 5);
        let names: Vec<_> = team.core.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "beta"]);
    }

    #[test]
    fn test_strict_exclusion_drops_low_performers() {
        let catalog = catalog();
        let history = FixedHistory {
            scores: HashMap::new(),
            low: HashSet::from(["security-auditor"]),
        };
        let profile = TaskProfile::default().with_dimension("security", 0.9);

        let advisory = SelectionTunables::default();
        let team = TeamSelector::new(&catalog, &advisory)
            .with_history(&history)
            .select_review_team(&profile, 5);
        assert!(team.contains("security-auditor"));

        let strict = SelectionTunables {
            strict_exclusion: true,
            ..SelectionTunables::default()
        };
        let team = TeamSelector::new(&catalog, &strict)
            .with_history(&history)
            .select_review_team(&profile, 5);
        assert!(!team.contains("security-auditor"));
        assert_eq!(team.core.len(), 2);
    }

    #[test]
    fn test_implementation_agent_cascade() {
        let catalog = catalog();
        let tunables = SelectionTunables::default();
        let selector = TeamSelector::new(&catalog, &tunables);

        let rust = TaskProfile::new(TaskType::Feature).with_language("rust");
        assert_eq!(selector.select_implementation_agent(&rust), "rust-pro");

        let testing = TaskProfile::new(TaskType::Testing).with_language("cobol");
        assert_eq!(selector.select_implementation_agent(&testing), "test-automator");

        let perf = TaskProfile::new(TaskType::Other).with_dimension("performance", 0.4);
        assert_eq!(
            selector.select_implementation_agent(&perf),
            "performance-engineer"
        );

        let nothing = TaskProfile::new(TaskType::Other);
        assert_eq!(selector.select_implementation_agent(&nothing), "general-purpose");
    }

    #[test]
    fn test_implementation_agent_with_empty_catalog() {
        let empty = AgentCatalog::default();
        let tunables = SelectionTunables::default();
        let profile = TaskProfile::new(TaskType::BugFix).with_language("rust");
        assert_eq!(
            TeamSelector::new(&empty, &tunables).select_implementation_agent(&profile),
            "general-purpose"
        );
    }
}
