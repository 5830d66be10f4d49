//! Execution coordinator
//!
//! Builds a phased plan from a team and runs it through the
//! [`AgentInvoker`]. Phases run strictly in order; agents within a parallel
//! phase are fanned out on a [`JoinSet`]. A failing agent or phase is
//! recorded and execution carries on, so [`execute_plan`](ExecutionCoordinator::execute_plan)
//! always returns a report.

use crate::config::ExecutionParams;
use crate::ports::agent_invoker::{AgentInvoker, InvocationError, PhaseContext};
use crate::ports::progress::{ExecutionProgress, NoProgress};
use serde::{Deserialize, Serialize};
use squad_domain::{
    Action, AggregatedFindings, ExecutionPhase, ExecutionPlan, Finding, PermissionRegistry,
    ReviewTeam, RunOutcome, SelectionTunables, Severity, TaskProfile,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Outcome of one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Completed,
    PartiallyFailed,
    Failed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Completed => "completed",
            PhaseStatus::PartiallyFailed => "partially_failed",
            PhaseStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One agent that did not produce findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent: String,
    pub phase: u32,
    pub cause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub number: u32,
    pub name: String,
    pub status: PhaseStatus,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub raw_findings: usize,
}

/// Result of executing a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub task_summary: String,
    pub total_hours: f64,
    pub phases: Vec<PhaseOutcome>,
    pub failures: Vec<AgentFailure>,
    pub failed_phases: Vec<u32>,
    pub findings: AggregatedFindings,
    pub raw_finding_count: usize,
    /// Per-agent counters for agents that ran successfully
    pub agent_outcomes: BTreeMap<String, RunOutcome>,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn phase(&self, number: u32) -> Option<&PhaseOutcome> {
        self.phases.iter().find(|p| p.number == number)
    }
}

type AgentResult = (String, Result<Vec<Finding>, InvocationError>);

pub struct ExecutionCoordinator {
    invoker: Arc<dyn AgentInvoker>,
    permissions: Arc<PermissionRegistry>,
    tunables: SelectionTunables,
    params: ExecutionParams,
}

impl ExecutionCoordinator {
    pub fn new(
        invoker: Arc<dyn AgentInvoker>,
        permissions: Arc<PermissionRegistry>,
        tunables: SelectionTunables,
    ) -> Self {
        Self {
            invoker,
            permissions,
            tunables,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn create_execution_plan(&self, team: &ReviewTeam, profile: &TaskProfile) -> ExecutionPlan {
        let plan = ExecutionPlan::from_team(team, profile, &self.tunables);
        debug!("Execution plan:\n{}", plan.summary());
        plan
    }

    /// Execute with default (no-op) progress
    pub async fn execute_plan(&self, plan: &ExecutionPlan, profile: &TaskProfile) -> ExecutionReport {
        self.execute_with_progress(plan, profile, &NoProgress).await
    }

    /// Execute every phase in order, then aggregate findings.
    pub async fn execute_with_progress(
        &self,
        plan: &ExecutionPlan,
        profile: &TaskProfile,
        progress: &dyn ExecutionProgress,
    ) -> ExecutionReport {
        info!(
            "Executing plan with {} phases ({} agents)",
            plan.phases.len(),
            plan.agent_count()
        );

        let mut report = ExecutionReport {
            task_summary: plan.task_summary.clone(),
            total_hours: plan.total_hours,
            ..ExecutionReport::default()
        };
        let mut raw: Vec<Finding> = Vec::new();

        for phase in &plan.phases {
            progress.on_phase_start(phase);
            info!("Phase {}: {}", phase.number, phase.name);

            let context = PhaseContext {
                phase_number: phase.number,
                phase_name: phase.name.clone(),
                task_summary: plan.task_summary.clone(),
                profile: profile.clone(),
                prior_findings: AggregatedFindings::aggregate(raw.clone()).findings,
            };

            let results = self.run_phase(phase, context, progress).await;
            let outcome = self.collect_phase(phase, results, &mut report, &mut raw);
            if outcome.status != PhaseStatus::Completed {
                warn!(
                    "Phase {} ({}) {}: {} of {} agents failed",
                    phase.number,
                    phase.name,
                    outcome.status,
                    outcome.failed.len(),
                    phase.agents.len()
                );
            }
            if outcome.status == PhaseStatus::Failed {
                report.failed_phases.push(phase.number);
            }
            report.phases.push(outcome);
            progress.on_phase_complete(phase);
        }

        report.raw_finding_count = raw.len();
        report.findings = AggregatedFindings::aggregate(raw);
        for (agent, duplicates) in &report.findings.duplicates_by_agent {
            if let Some(outcome) = report.agent_outcomes.get_mut(agent) {
                outcome.duplicates = u64::from(*duplicates);
            }
        }

        info!(
            "Execution finished: {} findings ({} raw), {} agent failures",
            report.findings.len(),
            report.raw_finding_count,
            report.failures.len()
        );
        report
    }

    /// Run every agent of a phase and wait for all of them.
    async fn run_phase(
        &self,
        phase: &ExecutionPhase,
        context: PhaseContext,
        progress: &dyn ExecutionProgress,
    ) -> Vec<AgentResult> {
        let mut results = Vec::with_capacity(phase.agents.len());
        let mut runnable = Vec::new();

        for agent in &phase.agents {
            if self.permissions.allows(agent, Action::Read) {
                runnable.push(agent.clone());
            } else {
                let denial = self.permissions.policy(agent).denial(Action::Read);
                progress.on_agent_complete(phase, agent, false);
                results.push((agent.clone(), Err(InvocationError::Denied(denial.to_string()))));
            }
        }

        if phase.parallel {
            results.extend(self.run_parallel(phase, runnable, Arc::new(context), progress).await);
        } else {
            for agent in runnable {
                let result = Self::invoke_one(
                    Arc::clone(&self.invoker),
                    &agent,
                    &context,
                    self.params.agent_timeout,
                )
                .await;
                progress.on_agent_complete(phase, &agent, result.is_ok());
                results.push((agent, result));
            }
        }
        results
    }

    async fn run_parallel(
        &self,
        phase: &ExecutionPhase,
        agents: Vec<String>,
        context: Arc<PhaseContext>,
        progress: &dyn ExecutionProgress,
    ) -> Vec<AgentResult> {
        let semaphore = self.params.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut join_set = JoinSet::new();
        let mut names: HashMap<tokio::task::Id, String> = HashMap::new();

        for agent in agents {
            let invoker = Arc::clone(&self.invoker);
            let context = Arc::clone(&context);
            let semaphore = semaphore.clone();
            let timeout = self.params.agent_timeout;
            let name = agent.clone();

            let handle = join_set.spawn(async move {
                let _permit = match semaphore {
                    Some(s) => s.acquire_owned().await.ok(),
                    None => None,
                };
                let result = Self::invoke_one(invoker, &name, &context, timeout).await;
                (name, result)
            });
            names.insert(handle.id(), agent);
        }

        let mut results = Vec::with_capacity(names.len());
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (agent, result))) => {
                    progress.on_agent_complete(phase, &agent, result.is_ok());
                    results.push((agent, result));
                }
                Err(e) => {
                    let agent = names
                        .get(&e.id())
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string());
                    warn!("Agent task {} did not finish: {}", agent, e);
                    progress.on_agent_complete(phase, &agent, false);
                    results.push((agent, Err(InvocationError::Failed(e.to_string()))));
                }
            }
        }
        results
    }

    async fn invoke_one(
        invoker: Arc<dyn AgentInvoker>,
        agent: &str,
        context: &PhaseContext,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<Finding>, InvocationError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, invoker.invoke(agent, context))
                .await
                .unwrap_or(Err(InvocationError::Timeout(limit))),
            None => invoker.invoke(agent, context).await,
        }
    }

    /// Fold one phase's results into the report.
    fn collect_phase(
        &self,
        phase: &ExecutionPhase,
        results: Vec<AgentResult>,
        report: &mut ExecutionReport,
        raw: &mut Vec<Finding>,
    ) -> PhaseOutcome {
        let mut outcome = PhaseOutcome {
            number: phase.number,
            name: phase.name.clone(),
            status: PhaseStatus::Completed,
            succeeded: Vec::new(),
            failed: Vec::new(),
            raw_findings: 0,
        };

        for (agent, result) in results {
            match result {
                Ok(findings) => {
                    debug!("Agent {} returned {} findings", agent, findings.len());
                    let entry = report.agent_outcomes.entry(agent.clone()).or_default();
                    entry.findings += findings.len() as u64;
                    entry.critical += findings
                        .iter()
                        .filter(|f| f.severity == Severity::Critical)
                        .count() as u64;

                    outcome.raw_findings += findings.len();
                    raw.extend(findings.into_iter().map(|mut f| {
                        if f.agent.is_empty() {
                            f.agent = agent.clone();
                        }
                        f.phase = phase.number;
                        f
                    }));
                    outcome.succeeded.push(agent);
                }
                Err(e) => {
                    warn!("Agent {} failed in phase {}: {}", agent, phase.number, e);
                    report.failures.push(AgentFailure {
                        agent: agent.clone(),
                        phase: phase.number,
                        cause: e.to_string(),
                    });
                    outcome.failed.push(agent);
                }
            }
        }

        outcome.succeeded.sort();
        outcome.failed.sort();
        outcome.status = match (outcome.succeeded.len(), outcome.failed.len()) {
            (_, 0) => PhaseStatus::Completed,
            (0, _) => PhaseStatus::Failed,
            _ => PhaseStatus::PartiallyFailed,
        };
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use squad_domain::{
        DenyFamily, Location, ModelTier, PermissionPolicy, ScopeLevel, SelectedAgent,
        SelectionReason, TaskType,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Invoker scripted per agent, recording every call
    #[derive(Default)]
    struct ScriptedInvoker {
        fail: Vec<&'static str>,
        panic: Vec<&'static str>,
        slow: Vec<&'static str>,
        findings: HashMap<&'static str, Vec<Finding>>,
        calls: Mutex<Vec<(String, u32, usize)>>,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedInvoker {
        fn calls(&self) -> Vec<(String, u32, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            agent: &str,
            context: &PhaseContext,
        ) -> Result<Vec<Finding>, InvocationError> {
            self.calls.lock().unwrap().push((
                agent.to_string(),
                context.phase_number,
                context.prior_findings.len(),
            ));
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            if self.panic.iter().any(|a| *a == agent) {
                panic!("agent crashed");
            }
            if self.slow.iter().any(|a| *a == agent) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.fail.iter().any(|a| *a == agent) {
                return Err(InvocationError::Failed(format!("{} exited with 1", agent)));
            }
            Ok(self.findings.get(agent).cloned().unwrap_or_default())
        }
    }

    fn selected(name: &str, reason: SelectionReason) -> SelectedAgent {
        SelectedAgent {
            name: name.to_string(),
            model_tier: ModelTier::Mid,
            dimension_score: 0.0,
            score: 10.0,
            reason,
        }
    }

    fn core(name: &str) -> SelectedAgent {
        selected(
            name,
            SelectionReason::Dimension {
                dimension: "security".to_string(),
                importance: 0.9,
            },
        )
    }

    fn finding(severity: Severity, kind: &str, file: &str) -> Finding {
        Finding::new("", severity, kind, "problem", Location::new(file, Some(1)))
    }

    fn registry(agents: &[&str]) -> Arc<PermissionRegistry> {
        Arc::new(PermissionRegistry::from_policies(agents.iter().map(|a| {
            PermissionPolicy::new(*a, ScopeLevel::Contributor, DenyFamily::NoDeleteNoDeploy)
        })))
    }

    fn coordinator(invoker: Arc<ScriptedInvoker>, agents: &[&str]) -> ExecutionCoordinator {
        ExecutionCoordinator::new(invoker, registry(agents), SelectionTunables::default())
    }

    fn team(core_agents: &[&str], coordinator: Option<&str>) -> ReviewTeam {
        ReviewTeam {
            core: core_agents.iter().map(|a| core(a)).collect(),
            coordinator: coordinator.map(String::from),
            ..ReviewTeam::default()
        }
    }

    #[tokio::test]
    async fn test_failing_agent_does_not_stop_siblings() {
        let invoker = Arc::new(ScriptedInvoker {
            fail: vec!["x"],
            findings: HashMap::from([("y", vec![finding(Severity::High, "leak", "a.rs")])]),
            ..ScriptedInvoker::default()
        });
        let coordinator = coordinator(invoker.clone(), &["x", "y"]);
        let profile = TaskProfile::new(TaskType::Security);
        let plan = coordinator.create_execution_plan(&team(&["x", "y"], None), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings.findings[0].agent, "y");
        assert_eq!(report.findings.findings[0].phase, 1);
        let phase = report.phase(1).unwrap();
        assert_eq!(phase.status, PhaseStatus::PartiallyFailed);
        assert_eq!(phase.failed, vec!["x"]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].cause.contains("exited with 1"));
        assert!(report.failed_phases.is_empty());
        assert_eq!(report.phase(2).unwrap().status, PhaseStatus::Completed);
    }

    #[tokio::test]
    async fn test_whole_phase_failure_continues() {
        let invoker = Arc::new(ScriptedInvoker {
            fail: vec!["a", "b"],
            findings: HashMap::from([(
                "review-coordinator",
                vec![finding(Severity::Medium, "design", "lib.rs")],
            )]),
            ..ScriptedInvoker::default()
        });
        let coordinator = coordinator(invoker.clone(), &["a", "b", "review-coordinator"]);
        let profile = TaskProfile::default();
        let plan =
            coordinator.create_execution_plan(&team(&["a", "b"], Some("review-coordinator")), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;

        assert_eq!(report.failed_phases, vec![1]);
        assert_eq!(report.phase(2).unwrap().status, PhaseStatus::Completed);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.phases.len(), 3);
    }

    #[tokio::test]
    async fn test_panicking_agent_is_attributed() {
        let invoker = Arc::new(ScriptedInvoker {
            panic: vec!["boom"],
            ..ScriptedInvoker::default()
        });
        let coordinator = coordinator(invoker.clone(), &["boom", "ok"]);
        let profile = TaskProfile::default();
        let plan = coordinator.create_execution_plan(&team(&["boom", "ok"], None), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].agent, "boom");
        assert_eq!(report.phase(1).unwrap().succeeded, vec!["ok"]);
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let invoker = Arc::new(ScriptedInvoker {
            slow: vec!["slow"],
            ..ScriptedInvoker::default()
        });
        let coordinator = coordinator(invoker.clone(), &["slow", "fast"]).with_params(
            ExecutionParams::default().with_agent_timeout(Some(Duration::from_millis(200))),
        );
        let profile = TaskProfile::default();
        let plan = coordinator.create_execution_plan(&team(&["slow", "fast"], None), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].agent, "slow");
        assert!(report.failures[0].cause.contains("timed out"));
    }

    #[tokio::test]
    async fn test_unknown_agent_is_denied_without_invoking() {
        let invoker = Arc::new(ScriptedInvoker::default());
        let coordinator = coordinator(invoker.clone(), &["known"]);
        let profile = TaskProfile::default();
        let plan = coordinator.create_execution_plan(&team(&["known", "stranger"], None), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;
        let called: Vec<_> = invoker.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(called, vec!["known"]);
        assert_eq!(report.failures[0].agent, "stranger");
        assert!(report.failures[0].cause.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_phases_run_in_order_with_prior_findings() {
        let invoker = Arc::new(ScriptedInvoker {
            findings: HashMap::from([
                ("a", vec![finding(Severity::High, "auth", "login.rs")]),
                ("b", vec![finding(Severity::Low, "auth", "login.rs")]),
            ]),
            ..ScriptedInvoker::default()
        });
        let coordinator = coordinator(invoker.clone(), &["a", "b", "review-coordinator"]);
        let profile = TaskProfile::default();
        let plan =
            coordinator.create_execution_plan(&team(&["a", "b"], Some("review-coordinator")), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;

        let calls = invoker.calls();
        let last = calls.last().unwrap();
        assert_eq!(last.0, "review-coordinator");
        assert_eq!(last.1, 2);
        // phase 1's two reports collapse to one before the coordinator sees them
        assert_eq!(last.2, 1);

        assert_eq!(report.raw_finding_count, 2);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings.findings[0].severity, Severity::High);
        assert_eq!(report.agent_outcomes["b"].duplicates, 1);
        assert_eq!(report.agent_outcomes["a"].findings, 1);
    }

    #[tokio::test]
    async fn test_concurrency_cap() {
        let invoker = Arc::new(ScriptedInvoker::default());
        let names = ["a", "b", "c"];
        let coordinator = coordinator(invoker.clone(), &names)
            .with_params(ExecutionParams::default().with_max_concurrency(Some(1)));
        let profile = TaskProfile::default();
        let plan = coordinator.create_execution_plan(&team(&names, None), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;
        assert!(report.is_clean());
        assert_eq!(invoker.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_plan_reports_issue_phase_only() {
        let invoker = Arc::new(ScriptedInvoker::default());
        let coordinator = coordinator(invoker.clone(), &[]);
        let profile = TaskProfile::default();
        let plan = coordinator.create_execution_plan(&ReviewTeam::empty(), &profile);

        let report = coordinator.execute_plan(&plan, &profile).await;
        assert_eq!(report.phases.len(), 1);
        assert_eq!(report.phases[0].status, PhaseStatus::Completed);
        assert!(report.findings.is_empty());
        assert!(invoker.calls().is_empty());
    }
}
