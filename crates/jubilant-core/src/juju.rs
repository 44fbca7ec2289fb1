// ── Juju client ──
//
// One `Juju` per model context. Detects the CLI generation once at
// construction, then routes every operation through that generation's
// `Dialect` for argv and result lookup. Everything here is blocking.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use jubilant_api::{
    CliVersion, CommandRunner, Config, DeployOptions, Dialect, ExecTarget, Failure, Generation,
    JujuCli, ProcessRunner, RefreshOptions, RunOptions, classify,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::JujuConfig;
use crate::convert::task_from_raw;
use crate::error::CoreError;
use crate::model::{SecretUri, Status, Task};
use crate::wait::{Clock, SystemClock, WaitOptions, poll};

// ── Per-call options ─────────────────────────────────────────────────

/// Options for [`Juju::add_model`].
#[derive(Debug, Clone, Default)]
pub struct AddModelOptions {
    pub cloud: Option<String>,
    /// Create the model on this controller; the client then targets
    /// `<controller>:<model>`.
    pub controller: Option<String>,
    pub config: Config,
    pub credential: Option<String>,
}

/// Options for [`Juju::add_unit`].
#[derive(Debug, Clone)]
pub struct AddUnitOptions {
    pub attach_storage: Vec<String>,
    pub num_units: u32,
    pub to: Vec<String>,
}

impl Default for AddUnitOptions {
    fn default() -> Self {
        Self {
            attach_storage: Vec::new(),
            num_units: 1,
            to: Vec::new(),
        }
    }
}

/// Options for [`Juju::exec`]. Exactly one of `machine` or `unit` is required.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub machine: Option<String>,
    /// Unit name, e.g. `mysql/0` or `mysql/leader`.
    pub unit: Option<String>,
    /// Give up after this long. `None` waits indefinitely.
    pub wait: Option<Duration>,
}

impl ExecOptions {
    pub fn on_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..Self::default()
        }
    }

    pub fn on_machine(machine: impl Into<String>) -> Self {
        Self {
            machine: Some(machine.into()),
            ..Self::default()
        }
    }

    /// Resolve to a single target, rejecting both-or-neither.
    pub fn target(&self) -> Result<ExecTarget, CoreError> {
        match (&self.machine, &self.unit) {
            (Some(machine), None) => Ok(ExecTarget::Machine(machine.clone())),
            (None, Some(unit)) => Ok(ExecTarget::Unit(unit.clone())),
            _ => Err(CoreError::Precondition {
                message: "must specify \"machine\" or \"unit\", but not both".into(),
            }),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Handle for running Juju commands against one model.
///
/// Cheap to clone. Clones share the runner and clock but each keeps its own
/// model, so `add_model` on a clone leaves the original alone.
#[derive(Clone)]
pub struct Juju {
    cli: JujuCli,
    wait_timeout: Duration,
    version: CliVersion,
    temp_dir: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Juju {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Juju")
            .field("model", &self.cli.model())
            .field("wait_timeout", &self.wait_timeout)
            .field("cli_binary", self.cli.binary())
            .field("cli_version", &self.version.as_str())
            .finish()
    }
}

impl Juju {
    /// Client that spawns the real juju binary.
    ///
    /// Runs `juju version` unless `config.cli_version` pins it.
    pub fn new(config: JujuConfig) -> Result<Self, CoreError> {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Client over a custom runner (tests, wrappers).
    pub fn with_runner(
        config: JujuConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, CoreError> {
        let cli = JujuCli::with_runner(config.cli_binary, config.model, runner);

        let version = match config.cli_version {
            Some(pinned) => pinned.parse::<CliVersion>()?,
            None => {
                let stdout = cli.stdout(
                    &["version", "--format", "json"],
                    RunOptions::without_model(),
                )?;
                CliVersion::from_json(&stdout)?
            }
        };
        info!(version = %version, generation = %version.generation(), "juju cli ready");

        Ok(Self {
            cli,
            wait_timeout: config.wait_timeout,
            version,
            temp_dir: config.temp_dir,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used by [`wait`](Self::wait).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn model(&self) -> Option<&str> {
        self.cli.model()
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn cli_binary(&self) -> &Path {
        self.cli.binary()
    }

    /// CLI version, e.g. `3.6.8`.
    pub fn version(&self) -> &CliVersion {
        &self.version
    }

    pub fn cli_major_version(&self) -> u32 {
        self.version.major()
    }

    pub fn generation(&self) -> Generation {
        self.version.generation()
    }

    fn dialect(&self) -> &'static dyn Dialect {
        self.generation().dialect()
    }

    // ── Operations (alphabetical) ────────────────────────────────

    /// Create a model and switch this client to it. Does not change the
    /// CLI's current model.
    pub fn add_model(&mut self, model: &str, opts: &AddModelOptions) -> Result<(), CoreError> {
        let mut args = vec!["add-model".to_owned(), "--no-switch".into(), model.to_owned()];
        if let Some(cloud) = &opts.cloud {
            args.push(cloud.clone());
        }
        if let Some(controller) = &opts.controller {
            args.extend(["--controller".into(), controller.clone()]);
        }
        for (key, value) in &opts.config {
            args.extend(["--config".into(), format!("{key}={value}")]);
        }
        if let Some(credential) = &opts.credential {
            args.extend(["--credential".into(), credential.clone()]);
        }

        self.cli.run(&args, RunOptions::without_model())?;

        let target = match &opts.controller {
            Some(controller) => format!("{controller}:{model}"),
            None => model.to_owned(),
        };
        self.cli.set_model(Some(target));
        Ok(())
    }

    /// Add a named secret and return its URI. Needs a Juju 3 CLI.
    pub fn add_secret(
        &self,
        name: &str,
        content: &BTreeMap<String, SecretString>,
        info: Option<&str>,
    ) -> Result<SecretUri, CoreError> {
        if !self.dialect().supports_secrets() {
            return Err(CoreError::unsupported_before_3("add_secret"));
        }

        let exposed: BTreeMap<&str, &str> = content
            .iter()
            .map(|(key, value)| (key.as_str(), value.expose_secret()))
            .collect();
        let file = self.yaml_file(&exposed)?;

        let mut args = vec![
            "add-secret".to_owned(),
            name.to_owned(),
            "--file".into(),
            file.path().display().to_string(),
        ];
        if let Some(info) = info {
            args.extend(["--info".into(), info.to_owned()]);
        }

        let stdout = self.cli.stdout(&args, RunOptions::default())?;
        Ok(SecretUri::from(stdout.trim().to_owned()))
    }

    pub fn add_unit(&self, app: &str, opts: &AddUnitOptions) -> Result<(), CoreError> {
        let mut args = vec!["add-unit".to_owned(), app.to_owned()];
        if !opts.attach_storage.is_empty() {
            args.extend(["--attach-storage".into(), opts.attach_storage.join(",")]);
        }
        if opts.num_units != 1 {
            args.extend(["--num-units".into(), opts.num_units.to_string()]);
        }
        if !opts.to.is_empty() {
            args.extend(["--to".into(), opts.to.join(",")]);
        }
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Run an arbitrary juju command and return its stdout.
    ///
    /// `--model` is inserted after the verb unless `opts.include_model` is off.
    pub fn cli<S: AsRef<str>>(&self, args: &[S], opts: RunOptions<'_>) -> Result<String, CoreError> {
        Ok(self.cli.stdout(args, opts)?)
    }

    /// Charm config of `app`: `key -> value` for every option that has a value.
    pub fn config(&self, app: &str) -> Result<BTreeMap<String, Value>, CoreError> {
        self.read_app_config(app, "settings")
    }

    /// Application-level (not charm) config of `app`, e.g. `trust`.
    pub fn app_config(&self, app: &str) -> Result<BTreeMap<String, Value>, CoreError> {
        self.read_app_config(app, "application-config")
    }

    pub fn set_config(&self, app: &str, values: &Config) -> Result<(), CoreError> {
        let mut args = vec!["config".to_owned(), app.to_owned()];
        args.extend(values.iter().map(|(k, v)| format!("{k}={v}")));
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    pub fn reset_config(&self, app: &str, keys: &[&str]) -> Result<(), CoreError> {
        let keys = keys.join(",");
        let args = ["config", app, "--reset", keys.as_str()];
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Deploy a charm or bundle. `charm` may be a Charmhub name or a local path.
    pub fn deploy(
        &self,
        charm: &str,
        app: Option<&str>,
        opts: &DeployOptions,
    ) -> Result<(), CoreError> {
        let args = self.dialect().deploy_args(charm, app, opts)?;
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Destroy `model`; if it is this client's model, the client falls back
    /// to the CLI's current model.
    pub fn destroy_model(
        &mut self,
        model: &str,
        destroy_storage: bool,
        force: bool,
    ) -> Result<(), CoreError> {
        let mut args = vec!["destroy-model".to_owned(), model.to_owned(), "--no-prompt".into()];
        if destroy_storage {
            args.push("--destroy-storage".into());
        }
        if force {
            args.push("--force".into());
        }
        self.cli.run(&args, RunOptions::without_model())?;

        if self.cli.model() == Some(model) {
            self.cli.set_model(None);
        }
        Ok(())
    }

    /// Run `command` on one machine or unit and return the finished task.
    ///
    /// Fails with `NotFound` when the target is absent from the output,
    /// `Timeout` when `opts.wait` expires, and `Task` when the command
    /// exits non-zero.
    pub fn exec<S: AsRef<str>>(
        &self,
        command: &str,
        args: &[S],
        opts: &ExecOptions,
    ) -> Result<Task, CoreError> {
        let target = opts.target()?;
        let dialect = self.dialect();
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_owned()).collect();
        let argv = dialect.exec_args(&target, opts.wait, command, &args);

        let (stdout, stderr) = self.run_task_command(&argv, "command", &target.to_string())?;

        let raw = dialect
            .find_exec_result(&stdout, &target)?
            .ok_or_else(|| CoreError::NotFound {
                target: target.to_string(),
                stderr,
            })?;
        finished(task_from_raw(raw, dialect.result_keys()))
    }

    /// Relate two applications (`app[:endpoint]`, optionally `model.`-prefixed).
    pub fn integrate(&self, app1: &str, app2: &str, via: &[String]) -> Result<(), CoreError> {
        let args = self.dialect().integrate_args(app1, app2, via);
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Model config: `key -> value`.
    pub fn model_config(&self) -> Result<BTreeMap<String, Value>, CoreError> {
        let stdout = self
            .cli
            .stdout(&["model-config", "--format", "json"], RunOptions::default())?;
        let outer: BTreeMap<String, Value> = decode(&stdout)?;
        Ok(outer
            .into_iter()
            .filter_map(|(key, entry)| entry.get("Value").cloned().map(|value| (key, value)))
            .collect())
    }

    pub fn set_model_config(&self, values: &Config) -> Result<(), CoreError> {
        let mut args = vec!["model-config".to_owned()];
        args.extend(values.iter().map(|(k, v)| format!("{k}={v}")));
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    pub fn reset_model_config(&self, keys: &[&str]) -> Result<(), CoreError> {
        let keys = keys.join(",");
        let args = ["model-config", "--reset", keys.as_str()];
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Upgrade an application's charm.
    ///
    /// On 2.9 the config goes through a temporary YAML file and `trust` is
    /// applied with a follow-up `juju trust`.
    pub fn refresh(&self, app: &str, opts: &RefreshOptions) -> Result<(), CoreError> {
        let dialect = self.dialect();

        let config_file = if dialect.refresh_config_in_file() && !opts.config.is_empty() {
            Some(self.yaml_file(&opts.config)?)
        } else {
            None
        };
        let args = dialect.refresh_args(app, opts, config_file.as_ref().map(NamedTempFile::path))?;
        self.cli.run(&args, RunOptions::default())?;
        drop(config_file);

        if opts.trust && dialect.refresh_trusts_separately() {
            self.trust(app, false, None)?;
        }
        Ok(())
    }

    pub fn remove_relation(&self, app1: &str, app2: &str, force: bool) -> Result<(), CoreError> {
        let mut args = vec!["remove-relation".to_owned(), app1.to_owned(), app2.to_owned()];
        if force {
            args.push("--force".into());
        }
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Remove an application's units, or the named units.
    pub fn remove_unit(
        &self,
        app_or_units: &[String],
        destroy_storage: bool,
        force: bool,
    ) -> Result<(), CoreError> {
        let args = self
            .dialect()
            .remove_unit_args(app_or_units, destroy_storage, force);
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Run an action on one unit and wait for it.
    ///
    /// `params` go to the action through a temporary YAML file. Fails with
    /// `NotFound` if the unit or action doesn't exist, `Timeout` when
    /// `wait` expires, and `Task` when the action fails.
    pub fn run(
        &self,
        unit: &str,
        action: &str,
        params: Option<&BTreeMap<String, Value>>,
        wait: Option<Duration>,
    ) -> Result<Task, CoreError> {
        let dialect = self.dialect();
        let params_file = params.map(|p| self.yaml_file(p)).transpose()?;
        let args = dialect.run_args(
            unit,
            action,
            wait,
            params_file.as_ref().map(NamedTempFile::path),
        );

        let target = format!("action {action:?} not defined or unit {unit:?}");
        let (stdout, stderr) = self.run_task_command(&args, "action", &target)?;
        drop(params_file);

        let raw = dialect
            .find_run_result(&stdout, unit)?
            .ok_or(CoreError::NotFound { target, stderr })?;
        finished(task_from_raw(raw, dialect.result_keys()))
    }

    /// Fetch the model's status.
    pub fn status(&self) -> Result<Status, CoreError> {
        self.fetch_status(RunOptions::default())
    }

    /// Grant (or with `remove`, revoke) cloud credential access for `app`.
    pub fn trust(&self, app: &str, remove: bool, scope: Option<&str>) -> Result<(), CoreError> {
        let mut args = vec!["trust".to_owned(), app.to_owned()];
        if remove {
            args.push("--remove".into());
        }
        if let Some(scope) = scope {
            args.extend(["--scope".into(), scope.to_owned()]);
        }
        self.cli.run(&args, RunOptions::default())?;
        Ok(())
    }

    /// Poll status until `ready` holds for `opts.successes` polls in a row.
    ///
    /// Returns the last status. Fails with `Wait` when `opts.error` fires and
    /// `Timeout` when the timeout (default: the client's) expires.
    pub fn wait<R>(&self, ready: R, opts: &WaitOptions<'_>) -> Result<Status, CoreError>
    where
        R: Fn(&Status) -> bool,
    {
        let timeout = opts.timeout.unwrap_or(self.wait_timeout);
        poll(
            || self.fetch_status(RunOptions::quiet()),
            ready,
            opts,
            timeout,
            self.clock.as_ref(),
        )
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn fetch_status(&self, opts: RunOptions<'_>) -> Result<Status, CoreError> {
        let stdout = self.cli.stdout(&["status", "--format", "json"], opts)?;
        Status::from_json(&stdout)
    }

    fn read_app_config(&self, app: &str, section: &str) -> Result<BTreeMap<String, Value>, CoreError> {
        let stdout = self
            .cli
            .stdout(&["config", "--format", "json", app], RunOptions::default())?;
        let outer: BTreeMap<String, Value> = decode(&stdout)?;
        let Some(Value::Object(inner)) = outer.get(section) else {
            return Ok(BTreeMap::new());
        };
        Ok(inner
            .iter()
            .filter_map(|(key, entry)| entry.get("value").map(|value| (key.clone(), value.clone())))
            .collect())
    }

    /// Run an action or exec command, mapping failures by their stderr.
    ///
    /// A "task failed" exit still yields stdout/stderr so the task can be
    /// decoded and reported with its own details.
    fn run_task_command(
        &self,
        args: &[String],
        what: &str,
        target: &str,
    ) -> Result<(String, String), CoreError> {
        match self.cli.run(args, RunOptions::default()) {
            Ok(output) => Ok((output.stdout, output.stderr)),
            Err(jubilant_api::Error::Command {
                args,
                code,
                stdout,
                stderr,
            }) => match classify(&stderr) {
                Failure::Timeout => Err(CoreError::Timeout {
                    message: format!("timed out waiting for {what}, stderr:\n{stderr}"),
                    last_status: None,
                }),
                Failure::NotFound => Err(CoreError::NotFound {
                    target: target.to_owned(),
                    stderr,
                }),
                Failure::TaskFailed => {
                    debug!(what, "task failed; decoding its result");
                    Ok((stdout, stderr))
                }
                Failure::Unknown => Err(CoreError::Command {
                    args,
                    code,
                    stdout,
                    stderr,
                }),
            },
            Err(other) => Err(other.into()),
        }
    }

    /// Write `value` as YAML to a temp file that is deleted when dropped.
    fn yaml_file<T: Serialize + ?Sized>(&self, value: &T) -> Result<NamedTempFile, CoreError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("jubilant-").suffix(".yaml");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        serde_yaml::to_writer(&mut file, value).map_err(jubilant_api::Error::from)?;
        file.flush()?;
        Ok(file)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, CoreError> {
    serde_json::from_str(body).map_err(|e| jubilant_api::Error::deserialization(&e, body).into())
}

fn finished(task: Task) -> Result<Task, CoreError> {
    if task.success() {
        Ok(task)
    } else {
        Err(CoreError::Task(Box::new(task)))
    }
}
