//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use squad_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human readable, colored output
    Text,
    /// JSON output
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for review-squad
#[derive(Parser, Debug)]
#[command(name = "review-squad")]
#[command(author, version, about = "Assemble and run a team of specialist review agents")]
#[command(long_about = r#"
review-squad selects a team of reviewer agents for a classified task, plans
the review in dependent phases, runs every agent through a configured
command, and merges their findings.

Configuration files are loaded from (in priority order):
1. --config <path>            Explicit config file
2. ./review-squad.toml        Project-level config
3. ~/.config/review-squad/config.toml   Global config

Example:
  review-squad team --profile task.json
  review-squad review "Fix token refresh race in auth middleware" --issue 42
  review-squad watch register octo/widgets#42
  review-squad watch run
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a review team for a task
    Team(TaskArgs),

    /// Build the phased execution plan for a task
    Plan(TaskArgs),

    /// Select, plan and run a full review
    Review {
        #[command(flatten)]
        task: TaskArgs,

        /// Post the findings summary to this issue (`42` or `owner/repo#42`)
        #[arg(long, value_name = "ISSUE")]
        issue: Option<String>,
    },

    /// Pick the single agent best suited to implement a task
    Implementer(TaskArgs),

    /// Show the agent performance table
    Report {
        /// Number of agents to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Also list agents flagged as low performers
        #[arg(long)]
        include_low: bool,
    },

    /// Credit an agent with findings that were later resolved
    Resolve {
        agent: String,
        count: u64,
    },

    /// Check whether an agent may perform an action
    Permission {
        agent: String,
        /// read, suggest, write, sign, approve, delete or deploy
        action: String,

        /// Fail with a non-zero exit code on denial
        #[arg(long)]
        hard: bool,
    },

    /// Watch issues for updates that need a re-review
    #[command(subcommand)]
    Watch(WatchCommand),
}

#[derive(Subcommand, Debug)]
pub enum WatchCommand {
    /// Start watching an issue
    Register { issue: String },

    /// Stop watching an issue
    Unregister { issue: String },

    /// List watched issues
    List,

    /// Run a single poll cycle
    Once,

    /// Poll until interrupted (Ctrl+C)
    Run {
        /// Poll interval in seconds (overrides [watcher] interval_seconds)
        #[arg(long)]
        interval: Option<u64>,
    },
}

/// How a task is given to the selector
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Free-text task description, classified by the configured classifier
    #[arg(required_unless_present = "profile")]
    pub description: Option<String>,

    /// Read a classified task profile (JSON) instead of classifying
    #[arg(long, value_name = "FILE", conflicts_with = "description")]
    pub profile: Option<PathBuf>,

    /// Maximum team size (overrides [execution] max_agents)
    #[arg(short = 'n', long)]
    pub max_agents: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_with_issue() {
        let cli = Cli::parse_from([
            "review-squad",
            "review",
            "fix the auth race",
            "--issue",
            "42",
            "-n",
            "5",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, Some(FormatArg::Json));
        match cli.command {
            Some(Command::Review { task, issue }) => {
                assert_eq!(task.description.as_deref(), Some("fix the auth race"));
                assert_eq!(task.max_agents, Some(5));
                assert_eq!(issue.as_deref(), Some("42"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_task_needs_description_or_profile() {
        assert!(Cli::try_parse_from(["review-squad", "team"]).is_err());
        let cli = Cli::try_parse_from(["review-squad", "team", "--profile", "p.json"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Team(ref t)) if t.profile.is_some()));
    }

    #[test]
    fn test_watch_subcommands() {
        let cli = Cli::parse_from(["review-squad", "watch", "run", "--interval", "30"]);
        assert!(matches!(
            cli.command,
            Some(Command::Watch(WatchCommand::Run { interval: Some(30) }))
        ));
    }

    #[test]
    fn test_permission_hard_flag() {
        let cli = Cli::parse_from(["review-squad", "permission", "rust-pro", "deploy", "--hard"]);
        assert!(matches!(
            cli.command,
            Some(Command::Permission { hard: true, .. })
        ));
    }
}
