//! Read-only permission registry.

use super::policy::{PermissionDenied, PermissionPolicy};
use super::scope::{Action, DenyFamily, ScopeLevel};
use crate::catalog::{AgentCatalog, AgentCategory};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Immutable mapping from agent id to [`PermissionPolicy`].
///
/// Loaded once; a policy change produces a new registry via
/// [`with_policy`](Self::with_policy).
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    policies: HashMap<String, PermissionPolicy>,
}

impl PermissionRegistry {
    pub fn from_policies(policies: impl IntoIterator<Item = PermissionPolicy>) -> Self {
        let policies = policies
            .into_iter()
            .map(|p| (p.agent_id().to_string(), p))
            .collect();
        Self { policies }
    }

    /// Default policies derived from each agent's category.
    ///
    /// | Category | Level | Deny |
    /// |----------|-------|------|
    /// | coordinator | signer | no_delete_no_deploy |
    /// | reviewer / language / domain specialist | contributor | no_delete_no_deploy |
    /// | generalist / other | read_only | no_delete_no_deploy |
    pub fn for_catalog(catalog: &AgentCatalog) -> Self {
        Self::from_policies(catalog.agents().iter().map(|agent| {
            let level = match agent.category {
                AgentCategory::Coordinator => ScopeLevel::Signer,
                AgentCategory::Reviewer
                | AgentCategory::LanguageSpecialist
                | AgentCategory::DomainSpecialist => ScopeLevel::Contributor,
                AgentCategory::Generalist | AgentCategory::Other => ScopeLevel::ReadOnly,
            };
            PermissionPolicy::new(&agent.name, level, DenyFamily::NoDeleteNoDeploy)
        }))
    }

    /// Return a new registry with `policy` added or replaced.
    pub fn with_policy(&self, policy: PermissionPolicy) -> Self {
        let mut policies = self.policies.clone();
        policies.insert(policy.agent_id().to_string(), policy);
        Self { policies }
    }

    /// Return a new registry with every policy in `overrides` added or replaced.
    pub fn with_policies(&self, overrides: impl IntoIterator<Item = PermissionPolicy>) -> Self {
        let mut policies = self.policies.clone();
        for policy in overrides {
            policies.insert(policy.agent_id().to_string(), policy);
        }
        Self { policies }
    }

    /// Policy for `agent_id`; unknown ids get a synthesized deny-all policy.
    pub fn policy(&self, agent_id: &str) -> Cow<'_, PermissionPolicy> {
        match self.policies.get(agent_id) {
            Some(policy) => Cow::Borrowed(policy),
            None => Cow::Owned(PermissionPolicy::deny_all(agent_id)),
        }
    }

    pub fn is_registered(&self, agent_id: &str) -> bool {
        self.policies.contains_key(agent_id)
    }

    /// Soft check: returns `false` and logs on denial.
    pub fn allows(&self, agent_id: &str, action: Action) -> bool {
        let policy = self.policy(agent_id);
        let allowed = policy.allows(action);
        if allowed {
            debug!("Permission granted: {} may {}", agent_id, action);
        } else if !self.is_registered(agent_id) {
            warn!(
                "Permission denied: {} is not registered (attempted {})",
                agent_id, action
            );
        } else {
            warn!(
                "Permission denied: {} may not {} (scope {}, deny {})",
                agent_id,
                action,
                policy.privilege(),
                policy.deny_family()
            );
        }
        allowed
    }

    /// Hard check: returns a structured denial for the attempted action.
    pub fn require(&self, agent_id: &str, action: Action) -> Result<(), PermissionDenied> {
        if self.allows(agent_id, action) {
            Ok(())
        } else {
            Err(self.policy(agent_id).denial(action))
        }
    }

    /// Registered agent ids, sorted.
    pub fn agent_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AgentDescriptor;

    fn registry() -> PermissionRegistry {
        PermissionRegistry::from_policies([
            PermissionPolicy::new("reviewer", ScopeLevel::Contributor, DenyFamily::NoDeleteNoDeploy),
            PermissionPolicy::new("release", ScopeLevel::Approver, DenyFamily::NoDeploy)
                .with_extra_permitted([Action::Deploy, Action::Delete]),
        ])
    }

    #[test]
    fn test_allows_within_scope() {
        let registry = registry();
        assert!(registry.allows("reviewer", Action::Read));
        assert!(registry.allows("reviewer", Action::Write));
        assert!(!registry.allows("reviewer", Action::Sign));
    }

    #[test]
    fn test_prohibited_and_permitted_denies() {
        let registry = registry();
        assert!(!registry.allows("release", Action::Deploy));
        assert!(registry.allows("release", Action::Delete));
    }

    #[test]
    fn test_unknown_agent_is_fail_closed() {
        let registry = registry();
        for action in Action::ALL {
            assert!(!registry.allows("stranger", action));
        }
        assert!(!registry.is_registered("stranger"));
    }

    #[test]
    fn test_require_returns_structured_denial() {
        let registry = registry();
        assert!(registry.require("reviewer", Action::Suggest).is_ok());

        let err = registry.require("reviewer", Action::Delete).unwrap_err();
        assert_eq!(err.agent_id, "reviewer");
        assert_eq!(err.action, Action::Delete);
        assert!(err.escalation.contains("contributor"));

        let err = registry.require("stranger", Action::Read).unwrap_err();
        assert!(err.escalation.contains("no registered permission policy"));
    }

    #[test]
    fn test_with_policy_does_not_mutate_original() {
        let original = registry();
        let updated = original.with_policy(PermissionPolicy::new(
            "reviewer",
            ScopeLevel::ReadOnly,
            DenyFamily::None,
        ));
        assert!(original.allows("reviewer", Action::Write));
        assert!(!updated.allows("reviewer", Action::Write));
    }

    #[test]
    fn test_for_catalog_uses_category_defaults() {
        let catalog = AgentCatalog::new(vec![
            AgentDescriptor::new("review-coordinator", AgentCategory::Coordinator),
            AgentDescriptor::new("rust-pro", AgentCategory::LanguageSpecialist),
            AgentDescriptor::new("helper", AgentCategory::Generalist),
        ]);
        let registry = PermissionRegistry::for_catalog(&catalog);

        assert_eq!(registry.policy("review-coordinator").privilege(), ScopeLevel::Signer);
        assert_eq!(registry.policy("rust-pro").privilege(), ScopeLevel::Contributor);
        assert_eq!(registry.policy("helper").privilege(), ScopeLevel::ReadOnly);
        assert!(!registry.allows("review-coordinator", Action::Deploy));
        assert!(registry.policy("rust-pro").privilege() < registry.policy("review-coordinator").privilege());
    }

    #[test]
    fn test_agent_ids_sorted() {
        assert_eq!(registry().agent_ids(), vec!["release", "reviewer"]);
    }
}
