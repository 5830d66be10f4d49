//! CLI entrypoint for review-squad
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use squad_application::{
    AgentSelector, ExecutionCoordinator, ExecutionProgress, IssueTracker, IssueWatcher,
    LogOnlyTrigger, NoProgress, PerformanceTracker, ReviewTrigger, RunReviewInput,
    RunReviewUseCase, TaskClassifier,
};
use squad_domain::{
    Action, AgentCatalog, DenyFamily, ExecutionPlan, OutputFormat, PermissionPolicy,
    PermissionRegistry, ScopeLevel, SelectionTunables, TaskProfile,
};
use squad_infrastructure::config::FileLoggingConfig;
use squad_infrastructure::{
    CatalogLoader, CommandAgentInvoker, CommandTaskClassifier, ConfigLoader, FileConfig,
    GhIssueTracker, JsonPerformanceStore, JsonWatchStateStore, JsonlEventLog, load_profile,
};
use squad_presentation::{
    Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress, TaskArgs, WatchCommand,
};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let (config, warnings) = if cli.no_config {
        (ConfigLoader::load_defaults(), Vec::new())
    } else {
        ConfigLoader::load_validated(cli.config.as_ref())?
    };

    let _log_guard = init_logging(cli.verbose, &config.logging);
    info!("Starting review-squad");

    if cli.no_color || !config.output.color {
        ConsoleFormatter::disable_color();
    }
    if !warnings.is_empty() {
        eprint!("{}", ConsoleFormatter::format_config_issues(&warnings));
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run `review-squad --help` for usage.");
    };

    let format = cli
        .format
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    let app = App {
        config,
        format,
        quiet: cli.quiet,
    };

    match command {
        Command::Team(task) => app.team(&task).await,
        Command::Plan(task) => app.plan(&task).await,
        Command::Review { task, issue } => app.review(&task, issue).await,
        Command::Implementer(task) => app.implementer(&task).await,
        Command::Report { top, include_low } => app.report(top, include_low),
        Command::Resolve { agent, count } => app.resolve(&agent, count),
        Command::Permission {
            agent,
            action,
            hard,
        } => app.permission(&agent, &action, hard),
        Command::Watch(watch) => app.watch(watch).await,
    }
}

/// Console logging by `-v` count, plus a daily rolling file when `[logging] dir` is set.
///
/// The returned guard must live until exit so buffered file output is flushed.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives = match &logging.filter {
        Some(extra) => format!("{},{}", level, extra),
        None => level.to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

struct App {
    config: FileConfig,
    format: OutputFormat,
    quiet: bool,
}

impl App {
    // ==================== Wiring ====================

    fn tunables(&self) -> SelectionTunables {
        self.config.selection.to_tunables().0
    }

    fn catalog(&self) -> Result<Arc<AgentCatalog>> {
        let path = ConfigLoader::catalog_path(&self.config)
            .context("No agent catalog location; set [catalog] path")?;
        Ok(Arc::new(CatalogLoader::load(&path)?))
    }

    fn performance(&self) -> Arc<PerformanceTracker> {
        let store = Arc::new(JsonPerformanceStore::new(
            self.config.state.performance_path(),
        ));
        Arc::new(PerformanceTracker::open(
            store,
            self.config.performance.to_weights().0,
        ))
    }

    fn selector(
        &self,
        catalog: Arc<AgentCatalog>,
        performance: Arc<PerformanceTracker>,
    ) -> Arc<AgentSelector> {
        Arc::new(AgentSelector::new(catalog, self.tunables()).with_history(performance))
    }

    /// Category defaults, a coordinator policy when the catalog lacks one,
    /// then `[permissions]` overrides.
    fn registry(&self, catalog: &AgentCatalog, tunables: &SelectionTunables) -> PermissionRegistry {
        let mut registry = PermissionRegistry::for_catalog(catalog);
        if !registry.is_registered(&tunables.coordinator) {
            registry = registry.with_policy(PermissionPolicy::new(
                &tunables.coordinator,
                ScopeLevel::Signer,
                DenyFamily::NoDeleteNoDeploy,
            ));
        }
        registry.with_policies(self.config.permission_overrides().0)
    }

    fn classifier(&self) -> Option<Arc<dyn TaskClassifier>> {
        let command = self.config.classifier.command.clone()?;
        let timeout = Duration::from_secs(self.config.classifier.timeout_seconds);
        Some(Arc::new(CommandTaskClassifier::new(command, timeout)))
    }

    fn tracker(&self) -> Result<Arc<GhIssueTracker>> {
        Ok(Arc::new(GhIssueTracker::try_new(
            self.config.watcher.repo.clone(),
            self.config.execution.working_dir.clone(),
        )?))
    }

    fn max_agents(&self, task: &TaskArgs) -> usize {
        task.max_agents
            .unwrap_or_else(|| self.config.execution.to_params().0.max_agents)
    }

    async fn profile(&self, task: &TaskArgs) -> Result<TaskProfile> {
        if let Some(ref path) = task.profile {
            return Ok(load_profile(path)?);
        }
        let description = task
            .description
            .as_deref()
            .context("A task description or --profile is required")?;
        let classifier = self
            .classifier()
            .context("No classifier configured; set [classifier] command or pass --profile")?;
        Ok(classifier.classify(description).await?)
    }

    fn review_use_case(
        &self,
        catalog: Arc<AgentCatalog>,
        performance: Arc<PerformanceTracker>,
        tracker: Option<Arc<dyn IssueTracker>>,
    ) -> Result<RunReviewUseCase> {
        let command = self
            .config
            .execution
            .agent_command
            .clone()
            .context("No agent command configured; set [execution] agent_command")?;
        let params = self.config.execution.to_params().0;
        let tunables = self.tunables();

        let invoker = Arc::new(
            CommandAgentInvoker::new(command)
                .with_working_dir(self.config.execution.working_dir.clone())
                .with_timeout(params.agent_timeout),
        );
        let registry = Arc::new(self.registry(&catalog, &tunables));
        let coordinator = Arc::new(
            ExecutionCoordinator::new(invoker, registry, tunables).with_params(params.clone()),
        );
        let selector = self.selector(catalog, performance.clone());

        let mut use_case =
            RunReviewUseCase::new(selector, coordinator, performance, params.max_agents);
        if let Some(classifier) = self.classifier() {
            use_case = use_case.with_classifier(classifier);
        }
        if let Some(tracker) = tracker {
            use_case = use_case.with_tracker(tracker);
        }
        Ok(use_case)
    }

    fn progress(&self) -> Box<dyn ExecutionProgress> {
        if self.quiet || self.format == OutputFormat::Json || !self.config.output.progress {
            Box::new(NoProgress)
        } else if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce() -> String) {
        match self.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(value)),
            OutputFormat::Text => println!("{}", text()),
        }
    }

    // ==================== Commands ====================

    async fn team(&self, task: &TaskArgs) -> Result<()> {
        let profile = self.profile(task).await?;
        let selector = self.selector(self.catalog()?, self.performance());
        let team = selector.select_review_team(&profile, self.max_agents(task));
        self.emit(&team, || ConsoleFormatter::format_team(&team));
        Ok(())
    }

    async fn plan(&self, task: &TaskArgs) -> Result<()> {
        let profile = self.profile(task).await?;
        let selector = self.selector(self.catalog()?, self.performance());
        let team = selector.select_review_team(&profile, self.max_agents(task));
        let plan = ExecutionPlan::from_team(&team, &profile, selector.tunables());
        self.emit(&plan, || ConsoleFormatter::format_plan(&plan));
        Ok(())
    }

    async fn review(&self, task: &TaskArgs, issue: Option<String>) -> Result<()> {
        let catalog = self.catalog()?;
        let performance = self.performance();
        let tracker = match issue {
            Some(_) => Some(self.tracker()? as Arc<dyn IssueTracker>),
            None => None,
        };
        let use_case = self.review_use_case(catalog, performance.clone(), tracker)?;

        let max_agents = self.max_agents(task);
        let mut input = match (&task.profile, &task.description) {
            (Some(path), _) => RunReviewInput::from_profile(load_profile(path)?, max_agents),
            (None, Some(description)) => {
                RunReviewInput::from_description(description.clone(), max_agents)
            }
            (None, None) => bail!("A task description or --profile is required"),
        };
        if let Some(issue) = issue {
            input = input.with_issue(issue);
        }

        let progress = self.progress();
        let output = use_case
            .execute_with_progress(input, progress.as_ref())
            .await?;
        performance.flush()?;

        let value = json!({
            "profile": output.profile,
            "team": output.team,
            "plan": output.plan,
            "report": output.report,
        });
        self.emit(&value, || ConsoleFormatter::format_review(&output));
        Ok(())
    }

    async fn implementer(&self, task: &TaskArgs) -> Result<()> {
        let profile = self.profile(task).await?;
        let selector = self.selector(self.catalog()?, self.performance());
        let agent = selector.select_implementation_agent(&profile);
        let value = json!({ "agent": agent, "task_type": profile.task_type });
        self.emit(&value, || ConsoleFormatter::format_implementer(&agent, &profile));
        Ok(())
    }

    fn report(&self, top: usize, include_low: bool) -> Result<()> {
        let performance = self.performance();
        let records: BTreeMap<String, _> = performance
            .records()
            .into_iter()
            .map(|r| (r.agent.clone(), r))
            .collect();
        self.emit(&records, || performance.format_report(top, include_low));
        Ok(())
    }

    fn resolve(&self, agent: &str, count: u64) -> Result<()> {
        let performance = self.performance();
        performance.record_resolutions(agent, count)?;
        let record = performance
            .record(agent)
            .with_context(|| format!("No performance record for {}", agent))?;
        self.emit(&record, || {
            format!(
                "Credited {} with {} resolved findings (effectiveness {:.3})",
                agent,
                count,
                record.effectiveness_score()
            )
        });
        Ok(())
    }

    fn permission(&self, agent: &str, action: &str, hard: bool) -> Result<()> {
        let action: Action = action.parse().map_err(anyhow::Error::msg)?;
        let catalog = self.catalog()?;
        let registry = self.registry(&catalog, &self.tunables());

        let allowed = registry.allows(agent, action);
        let policy = registry.policy(agent);
        let value = json!({ "agent": agent, "action": action, "allowed": allowed });
        self.emit(&value, || {
            ConsoleFormatter::format_permission(&policy, action, allowed)
        });

        if hard {
            registry.require(agent, action)?;
        }
        Ok(())
    }

    async fn watch(&self, command: WatchCommand) -> Result<()> {
        let tracker = self.tracker()?;
        let store = Arc::new(JsonWatchStateStore::new(self.config.state.watch_path()));

        let polls = matches!(command, WatchCommand::Once | WatchCommand::Run { .. });
        let reviews = polls && self.config.execution.agent_command.is_some();
        let trigger: Arc<dyn ReviewTrigger> = if reviews {
            Arc::new(self.review_use_case(
                self.catalog()?,
                self.performance(),
                Some(tracker.clone() as Arc<dyn IssueTracker>),
            )?)
        } else {
            if polls {
                warn!("No [execution] agent_command configured; re-reviews are only logged");
            }
            Arc::new(LogOnlyTrigger)
        };

        let mut params = self.config.watcher.to_params().0;
        if let WatchCommand::Run {
            interval: Some(seconds),
        } = command
            && seconds > 0
        {
            params = params.with_interval(Duration::from_secs(seconds));
        }

        let mut watcher = IssueWatcher::open(tracker, store, trigger, params)
            .with_rules(self.config.watcher.to_rules().0);
        if let Some(log) = JsonlEventLog::open(self.config.state.event_log_path()) {
            watcher = watcher.with_event_log(Arc::new(log));
        }

        match command {
            WatchCommand::Register { issue } => {
                let record = watcher.register(&issue).await?;
                self.emit(&record, || format!("Watching issue {}", record.issue_id));
            }
            WatchCommand::Unregister { issue } => {
                let removed = watcher.unregister(&issue)?;
                let value = json!({ "issue_id": issue, "removed": removed });
                self.emit(&value, || {
                    if removed {
                        format!("Stopped watching issue {}", issue)
                    } else {
                        format!("Issue {} was not watched", issue)
                    }
                });
            }
            WatchCommand::List => {
                let records = watcher.watched();
                self.emit(&records, || ConsoleFormatter::format_watched(&records));
            }
            WatchCommand::Once => {
                let summary = watcher.poll_once().await;
                let value = json!({
                    "checked": summary.checked,
                    "events": summary.events,
                    "triggered": summary.triggered,
                    "errors": summary.errors,
                });
                self.emit(&value, || ConsoleFormatter::format_poll(&summary));
            }
            WatchCommand::Run { .. } => {
                let cancel = CancellationToken::new();
                let signal = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Received Ctrl+C, stopping watcher");
                        signal.cancel();
                    }
                });
                eprintln!("Watching {} issues (Ctrl+C to stop)", watcher.watched().len());
                watcher.run(cancel).await;
            }
        }
        Ok(())
    }
}
