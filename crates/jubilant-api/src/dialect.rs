// Per-generation command dialects.
//
// A `Dialect` knows how one CLI generation spells each logical operation
// (argv) and where that generation puts the results (lookup + key table).
// It never runs anything: `jubilant-core` owns the invocation, temp files,
// and error mapping, and asks the dialect only for words and shapes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::Error;
use crate::models::RawTask;
use crate::options::{DeployOptions, ExecTarget, RefreshOptions};
use crate::version::Generation;

/// Where a generation puts the reserved task result fields, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultKeys {
    pub return_code: &'static [&'static str],
    pub stdout: &'static [&'static str],
    pub stderr: &'static [&'static str],
}

impl ResultKeys {
    /// Every reserved key, for stripping them out of the user-visible results.
    pub fn all(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.return_code
            .iter()
            .chain(self.stdout)
            .chain(self.stderr)
            .copied()
    }
}

/// Argument builders and result lookup for one CLI generation.
pub trait Dialect: Send + Sync + fmt::Debug {
    fn generation(&self) -> Generation;

    // ── Deploy / refresh ────────────────────────────────────────────

    fn deploy_args(
        &self,
        charm: &str,
        app: Option<&str>,
        opts: &DeployOptions,
    ) -> Result<Vec<String>, Error>;

    /// Whether refresh config must be written to a YAML file and passed by path.
    fn refresh_config_in_file(&self) -> bool;

    /// `config_file` is the YAML file holding `opts.config`, when
    /// [`refresh_config_in_file`](Self::refresh_config_in_file) is true.
    fn refresh_args(
        &self,
        app: &str,
        opts: &RefreshOptions,
        config_file: Option<&Path>,
    ) -> Result<Vec<String>, Error>;

    /// Whether `trust` must be applied by a separate `juju trust` after refresh.
    fn refresh_trusts_separately(&self) -> bool;

    // ── Relations / units ───────────────────────────────────────────

    fn integrate_args(&self, app1: &str, app2: &str, via: &[String]) -> Vec<String>;

    fn remove_unit_args(&self, units: &[String], destroy_storage: bool, force: bool) -> Vec<String>;

    // ── Actions / exec ──────────────────────────────────────────────

    fn run_args(
        &self,
        unit: &str,
        action: &str,
        wait: Option<Duration>,
        params_file: Option<&Path>,
    ) -> Vec<String>;

    /// Pick `unit`'s entry out of run output. Empty output has no entries.
    fn find_run_result(&self, stdout: &str, unit: &str) -> Result<Option<RawTask>, Error>;

    fn exec_args(
        &self,
        target: &ExecTarget,
        wait: Option<Duration>,
        command: &str,
        args: &[String],
    ) -> Vec<String>;

    /// Pick `target`'s entry out of exec output. Empty output has no entries.
    fn find_exec_result(&self, stdout: &str, target: &ExecTarget) -> Result<Option<RawTask>, Error>;

    fn result_keys(&self) -> &'static ResultKeys;

    // ── Capabilities ────────────────────────────────────────────────

    fn supports_secrets(&self) -> bool;
}

// ── Shared builders ──────────────────────────────────────────────────

pub(crate) fn strings<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| (*s).to_owned()).collect()
}

pub(crate) fn push_opt(args: &mut Vec<String>, flag: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        args.push(flag.to_owned());
        args.push(value.to_string());
    }
}

/// `flag k=v` once per entry.
pub(crate) fn push_pairs<V: fmt::Display>(args: &mut Vec<String>, flag: &str, map: &BTreeMap<String, V>) {
    for (k, v) in map {
        args.push(flag.to_owned());
        args.push(format!("{k}={v}"));
    }
}

/// `flag a,b,c` when the list is non-empty.
pub(crate) fn push_joined(args: &mut Vec<String>, flag: &str, values: &[String]) {
    if !values.is_empty() {
        args.push(flag.to_owned());
        args.push(values.join(","));
    }
}

/// Deploy argv shared by both generations; only the base flag differs.
pub(crate) fn deploy_args(
    charm: &str,
    app: Option<&str>,
    opts: &DeployOptions,
    base: Option<(&str, String)>,
) -> Vec<String> {
    let mut args = strings(["deploy", charm]);
    if let Some(app) = app {
        args.push(app.to_owned());
    }

    push_joined(&mut args, "--attach-storage", &opts.attach_storage);
    if let Some((flag, value)) = base {
        args.push(flag.to_owned());
        args.push(value);
    }
    push_opt(&mut args, "--bind", opts.bind.as_ref());
    push_opt(&mut args, "--channel", opts.channel.as_ref());
    push_pairs(&mut args, "--config", &opts.config);
    push_pairs(&mut args, "--constraints", &opts.constraints);
    if opts.force {
        args.push("--force".into());
    }
    if opts.num_units != 1 {
        args.push("--num-units".into());
        args.push(opts.num_units.to_string());
    }
    for overlay in &opts.overlays {
        args.push("--overlay".into());
        args.push(overlay.display().to_string());
    }
    push_pairs(&mut args, "--resource", &opts.resources);
    push_opt(&mut args, "--revision", opts.revision);
    push_pairs(&mut args, "--storage", &opts.storage);
    push_joined(&mut args, "--to", &opts.to);
    if opts.trust {
        args.push("--trust".into());
    }
    args
}

pub(crate) fn integrate_args(verb: &str, app1: &str, app2: &str, via: &[String]) -> Vec<String> {
    let mut args = strings([verb, app1, app2]);
    push_joined(&mut args, "--via", via);
    args
}

/// Decode a `{target: task}` result map. Empty stdout means no targets ran.
pub(crate) fn task_map(stdout: &str) -> Result<BTreeMap<String, RawTask>, Error> {
    if stdout.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(stdout).map_err(|e| Error::deserialization(&e, stdout))
}

/// Look `key` up, accepting the lone entry when a `<app>/leader` alias was used.
pub(crate) fn take_entry(
    mut map: BTreeMap<String, RawTask>,
    key: &str,
    unit: &str,
) -> Option<RawTask> {
    if let Some(task) = map.remove(key) {
        return Some(task);
    }
    if unit.ends_with("/leader") && map.len() == 1 {
        return map.into_values().next();
    }
    None
}
