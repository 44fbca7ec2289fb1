// Juju 3.x dialect
//
// `--base`, `integrate`, `run --wait <n>s`, `exec --wait <n>s`, config as
// `--config k=v`, `refresh --trust`, `remove-unit --no-prompt`. Action and
// exec results are objects keyed by the unit name or machine id.

use std::path::Path;
use std::time::Duration;

use crate::dialect::{self, Dialect, ResultKeys, push_opt, push_pairs, strings, take_entry, task_map};
use crate::error::Error;
use crate::models::RawTask;
use crate::options::{DeployOptions, ExecTarget, RefreshOptions, format_seconds};
use crate::version::Generation;

pub static RESULT_KEYS: ResultKeys = ResultKeys {
    return_code: &["return-code"],
    stdout: &["stdout"],
    stderr: &["stderr"],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Current;

impl Dialect for Current {
    fn generation(&self) -> Generation {
        Generation::Current
    }

    fn deploy_args(
        &self,
        charm: &str,
        app: Option<&str>,
        opts: &DeployOptions,
    ) -> Result<Vec<String>, Error> {
        let base = opts.base.clone().map(|b| ("--base", b));
        Ok(dialect::deploy_args(charm, app, opts, base))
    }

    fn refresh_config_in_file(&self) -> bool {
        false
    }

    fn refresh_args(
        &self,
        app: &str,
        opts: &RefreshOptions,
        _config_file: Option<&Path>,
    ) -> Result<Vec<String>, Error> {
        let mut args = strings(["refresh", app]);
        push_opt(&mut args, "--base", opts.base.as_ref());
        push_opt(&mut args, "--channel", opts.channel.as_ref());
        push_pairs(&mut args, "--config", &opts.config);
        if opts.force {
            args.extend(strings(["--force", "--force-base", "--force-units"]));
        }
        push_opt(&mut args, "--path", opts.path.as_ref().map(|p| p.display()));
        push_pairs(&mut args, "--resource", &opts.resources);
        push_opt(&mut args, "--revision", opts.revision);
        push_pairs(&mut args, "--storage", &opts.storage);
        if opts.trust {
            args.push("--trust".into());
        }
        Ok(args)
    }

    fn refresh_trusts_separately(&self) -> bool {
        false
    }

    fn integrate_args(&self, app1: &str, app2: &str, via: &[String]) -> Vec<String> {
        dialect::integrate_args("integrate", app1, app2, via)
    }

    fn remove_unit_args(&self, units: &[String], destroy_storage: bool, force: bool) -> Vec<String> {
        let mut args = strings(["remove-unit", "--no-prompt"]);
        args.extend(units.iter().cloned());
        if destroy_storage {
            args.push("--destroy-storage".into());
        }
        if force {
            args.push("--force".into());
        }
        args
    }

    fn run_args(
        &self,
        unit: &str,
        action: &str,
        wait: Option<Duration>,
        params_file: Option<&Path>,
    ) -> Vec<String> {
        let mut args = strings(["run", "--format", "json", unit, action]);
        push_opt(&mut args, "--wait", wait.map(format_seconds));
        push_opt(&mut args, "--params", params_file.map(Path::display));
        args
    }

    fn find_run_result(&self, stdout: &str, unit: &str) -> Result<Option<RawTask>, Error> {
        Ok(take_entry(task_map(stdout)?, unit, unit))
    }

    fn exec_args(
        &self,
        target: &ExecTarget,
        wait: Option<Duration>,
        command: &str,
        args: &[String],
    ) -> Vec<String> {
        let mut argv = strings(["exec", "--format", "json", target.flag(), target.id()]);
        push_opt(&mut argv, "--wait", wait.map(format_seconds));
        argv.push("--".into());
        argv.push(command.to_owned());
        argv.extend(args.iter().cloned());
        argv
    }

    fn find_exec_result(&self, stdout: &str, target: &ExecTarget) -> Result<Option<RawTask>, Error> {
        Ok(take_entry(task_map(stdout)?, target.id(), target.id()))
    }

    fn result_keys(&self) -> &'static ResultKeys {
        &RESULT_KEYS
    }

    fn supports_secrets(&self) -> bool {
        true
    }
}
