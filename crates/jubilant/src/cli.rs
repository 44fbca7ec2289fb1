//! Clap derive structures for the `jubilant` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jubilant -- one command set for Juju 2.9 and 3.x models
#[derive(Debug, Parser)]
#[command(
    name = "jubilant",
    version,
    about = "Drive Juju 2.9 and 3.x models with one command set",
    long_about = "Runs the juju CLI on your behalf, translating flags and output\n\
        between the 2.9 and 3.x generations so scripts and CI jobs can\n\
        target either without change.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "JUBILANT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Model to operate on, optionally `controller:model` (overrides profile)
    #[arg(long, short = 'm', env = "JUBILANT_MODEL", global = true)]
    pub model: Option<String>,

    /// Path or name of the juju executable
    #[arg(long, env = "JUBILANT_CLI_BINARY", global = true)]
    pub cli_binary: Option<PathBuf>,

    /// Pin the juju version instead of running `juju version`
    #[arg(long, env = "JUBILANT_CLI_VERSION", global = true)]
    pub cli_version: Option<String>,

    /// Default timeout for wait, e.g. "3m"
    #[arg(long, env = "JUBILANT_WAIT_TIMEOUT", global = true)]
    pub wait_timeout: Option<humantime::Duration>,

    /// Output format
    #[arg(long, short = 'o', env = "JUBILANT_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Workload status names shared by `wait --for` and `wait --error-on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusKind {
    Active,
    Blocked,
    Error,
    Maintenance,
    Waiting,
}

/// Readiness condition for `wait --for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaitFor {
    Active,
    Blocked,
    Error,
    Maintenance,
    Waiting,
    /// Every unit agent is idle
    Idle,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the detected juju version and generation
    Version,

    /// Show model status
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Poll status until a condition holds
    Wait(WaitArgs),

    /// Deploy a charm or bundle
    Deploy(DeployArgs),

    /// Refresh (upgrade) an application's charm
    Refresh(RefreshArgs),

    /// Relate two applications
    #[command(alias = "relate")]
    Integrate(IntegrateArgs),

    /// Remove a relation between two applications
    RemoveRelation(RemoveRelationArgs),

    /// Run an action on a unit and wait for its result
    Run(RunArgs),

    /// Run a shell command on a unit or machine
    Exec(ExecArgs),

    /// Inspect jubilant configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status / Wait ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Only show these applications in the table
    #[arg(long = "app", short = 'a')]
    pub apps: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Condition every selected application must reach
    #[arg(long = "for", default_value = "active")]
    pub ready: WaitFor,

    /// Applications to check (repeatable; default: all)
    #[arg(long = "app", short = 'a')]
    pub apps: Vec<String>,

    /// Fail as soon as any selected application reaches this status
    #[arg(long)]
    pub error_on: Option<StatusKind>,

    /// Pause between status polls
    #[arg(long, default_value = "1s")]
    pub delay: humantime::Duration,

    /// Overall limit (default: the configured wait timeout)
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Consecutive successful polls required
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub successes: u32,
}

// ── Deploy / Refresh ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Charmhub name or local path of the charm or bundle
    pub charm: String,

    /// Application name (default: charm name)
    pub app: Option<String>,

    /// Storage to attach (repeatable)
    #[arg(long)]
    pub attach_storage: Vec<String>,

    /// Base to deploy on, e.g. "ubuntu@22.04"
    #[arg(long)]
    pub base: Option<String>,

    /// One space for every endpoint, or "endpoint=space" pairs
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub channel: Option<String>,

    /// Application config `key=value` (repeatable)
    #[arg(long = "config")]
    pub config: Vec<String>,

    /// Machine constraint `key=value` (repeatable)
    #[arg(long = "constraint")]
    pub constraints: Vec<String>,

    #[arg(long)]
    pub force: bool,

    #[arg(long, short = 'n', default_value = "1")]
    pub num_units: u32,

    /// Bundle overlay file (repeatable)
    #[arg(long = "overlay")]
    pub overlays: Vec<PathBuf>,

    /// Resource `name=value` (repeatable)
    #[arg(long = "resource")]
    pub resources: Vec<String>,

    #[arg(long)]
    pub revision: Option<u32>,

    /// Storage directive `label=spec` (repeatable)
    #[arg(long = "storage")]
    pub storage: Vec<String>,

    /// Placement directive (repeatable)
    #[arg(long)]
    pub to: Vec<String>,

    /// Grant the application cloud credential access
    #[arg(long)]
    pub trust: bool,
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Application to refresh
    pub app: String,

    #[arg(long)]
    pub base: Option<String>,

    #[arg(long)]
    pub channel: Option<String>,

    /// Application config `key=value` applied with the refresh (repeatable)
    #[arg(long = "config")]
    pub config: Vec<String>,

    /// Force the refresh, base, and units
    #[arg(long)]
    pub force: bool,

    /// Refresh from a local charm file
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Resource `name=value` (repeatable)
    #[arg(long = "resource")]
    pub resources: Vec<String>,

    #[arg(long)]
    pub revision: Option<u32>,

    /// Storage directive `label=spec` (repeatable)
    #[arg(long = "storage")]
    pub storage: Vec<String>,

    #[arg(long)]
    pub trust: bool,
}

// ── Relations ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IntegrateArgs {
    /// First application, `app[:endpoint]`
    pub app1: String,

    /// Second application, `app[:endpoint]`
    pub app2: String,

    /// Egress subnet for cross-model relations (repeatable)
    #[arg(long)]
    pub via: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RemoveRelationArgs {
    pub app1: String,

    pub app2: String,

    #[arg(long)]
    pub force: bool,
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Unit to run the action on, e.g. "mysql/0"
    pub unit: String,

    /// Action name
    pub action: String,

    /// Action parameter `key=value`; values parse as JSON, else string (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Give up waiting for the action after this long
    #[arg(long)]
    pub wait: Option<humantime::Duration>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["unit", "machine"])))]
pub struct ExecArgs {
    /// Unit to run on
    #[arg(long)]
    pub unit: Option<String>,

    /// Machine to run on
    #[arg(long)]
    pub machine: Option<String>,

    /// Give up waiting for the command after this long
    #[arg(long)]
    pub wait: Option<humantime::Duration>,

    /// Command to run
    pub command: String,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

// ── Config / Completions ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Print the settings a profile resolves to
    Resolve,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
