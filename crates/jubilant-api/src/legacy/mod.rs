// Juju 2.9 dialect
//
// Differences from 3.x: `--series` instead of `--base`, `relate`,
// `run-action --wait[=Ns]`, `exec --timeout`, refresh config passed as a
// YAML file, no `refresh --trust`, no secrets. Action results are keyed
// `unit-<app>-<n>`; exec prints an array of per-target entries.

mod results;

use std::path::Path;
use std::time::Duration;

use crate::dialect::{self, Dialect, ResultKeys, push_opt, push_pairs, strings};
use crate::error::Error;
use crate::models::RawTask;
use crate::options::{DeployOptions, ExecTarget, RefreshOptions, base_to_series, format_seconds};
use crate::version::Generation;

/// Old-style task result keys. Exec entries and action results disagree on
/// spelling across 2.9 point releases, so several are accepted.
pub static RESULT_KEYS: ResultKeys = ResultKeys {
    return_code: &["ReturnCode", "return-code", "Code"],
    stdout: &["Stdout", "stdout"],
    stderr: &["Stderr", "stderr"],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Legacy;

impl Dialect for Legacy {
    fn generation(&self) -> Generation {
        Generation::Legacy
    }

    fn deploy_args(
        &self,
        charm: &str,
        app: Option<&str>,
        opts: &DeployOptions,
    ) -> Result<Vec<String>, Error> {
        let series = series_flag(opts.base.as_deref())?;
        Ok(dialect::deploy_args(charm, app, opts, series))
    }

    fn refresh_config_in_file(&self) -> bool {
        true
    }

    fn refresh_args(
        &self,
        app: &str,
        opts: &RefreshOptions,
        config_file: Option<&Path>,
    ) -> Result<Vec<String>, Error> {
        let mut args = strings(["refresh", app]);
        if let Some((flag, series)) = series_flag(opts.base.as_deref())? {
            args.push(flag.to_owned());
            args.push(series);
        }
        push_opt(&mut args, "--channel", opts.channel.as_ref());
        if opts.force {
            args.extend(strings(["--force", "--force-base", "--force-units"]));
        }
        push_opt(&mut args, "--path", opts.path.as_ref().map(|p| p.display()));
        push_pairs(&mut args, "--resource", &opts.resources);
        push_opt(&mut args, "--revision", opts.revision);
        push_pairs(&mut args, "--storage", &opts.storage);
        push_opt(&mut args, "--config", config_file.map(Path::display));
        Ok(args)
    }

    fn refresh_trusts_separately(&self) -> bool {
        true
    }

    fn integrate_args(&self, app1: &str, app2: &str, via: &[String]) -> Vec<String> {
        dialect::integrate_args("relate", app1, app2, via)
    }

    fn remove_unit_args(&self, units: &[String], destroy_storage: bool, force: bool) -> Vec<String> {
        let mut args = strings(["remove-unit"]);
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
        let mut args = strings(["run-action", "--format", "json", unit, action]);
        // run-action returns immediately without --wait; always block.
        args.push(match wait {
            Some(d) => format!("--wait={}", format_seconds(d)),
            None => "--wait".to_owned(),
        });
        push_opt(&mut args, "--params", params_file.map(Path::display));
        args
    }

    fn find_run_result(&self, stdout: &str, unit: &str) -> Result<Option<RawTask>, Error> {
        results::find_action(stdout, unit)
    }

    fn exec_args(
        &self,
        target: &ExecTarget,
        wait: Option<Duration>,
        command: &str,
        args: &[String],
    ) -> Vec<String> {
        let mut argv = strings(["exec", "--format", "json", target.flag(), target.id()]);
        push_opt(&mut argv, "--timeout", wait.map(format_seconds));
        argv.push("--".into());
        argv.push(command.to_owned());
        argv.extend(args.iter().cloned());
        argv
    }

    fn find_exec_result(&self, stdout: &str, target: &ExecTarget) -> Result<Option<RawTask>, Error> {
        results::find_exec(stdout, target)
    }

    fn result_keys(&self) -> &'static ResultKeys {
        &RESULT_KEYS
    }

    fn supports_secrets(&self) -> bool {
        false
    }
}

fn series_flag(base: Option<&str>) -> Result<Option<(&'static str, String)>, Error> {
    base.map(|b| base_to_series(b).map(|series| ("--series", series.to_owned())))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::Bind;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn deploy_uses_series() {
        let opts = DeployOptions {
            attach_storage: vec!["a".into(), "b".into()],
            base: Some("ubuntu@22.04".into()),
            bind: Some(Bind::Endpoints(map(&[("end1", "space1"), ("end2", "space2")]))),
            channel: Some("latest/edge".into()),
            config: [("x".to_owned(), true.into()), ("y".to_owned(), 1.into()), ("z".to_owned(), "ss".into())].into(),
            constraints: map(&[("mem", "8G")]),
            force: true,
            num_units: 3,
            resources: map(&[("bin", "/path")]),
            revision: Some(42),
            storage: map(&[("data", "tmpfs,1G")]),
            to: vec!["lxd:25".into(), "lxd:26".into()],
            trust: true,
            ..DeployOptions::default()
        };

        let args = Legacy.deploy_args("charm", Some("app"), &opts).unwrap();

        assert_eq!(
            args,
            [
                "deploy", "charm", "app",
                "--attach-storage", "a,b",
                "--series", "jammy",
                "--bind", "end1=space1 end2=space2",
                "--channel", "latest/edge",
                "--config", "x=true", "--config", "y=1", "--config", "z=ss",
                "--constraints", "mem=8G",
                "--force",
                "--num-units", "3",
                "--resource", "bin=/path",
                "--revision", "42",
                "--storage", "data=tmpfs,1G",
                "--to", "lxd:25,lxd:26",
                "--trust",
            ]
        );
    }

    #[test]
    fn deploy_rejects_non_ubuntu_base() {
        let opts = DeployOptions {
            base: Some("centos@8".into()),
            ..DeployOptions::default()
        };
        assert!(matches!(
            Legacy.deploy_args("charm", None, &opts),
            Err(Error::InvalidBase { .. })
        ));
    }

    #[test]
    fn refresh_passes_config_by_path() {
        let opts = RefreshOptions {
            base: Some("ubuntu@20.04".into()),
            channel: Some("latest/edge".into()),
            force: true,
            path: Some("/path/to/app.charm".into()),
            resources: map(&[("bin", "/path")]),
            revision: Some(42),
            storage: map(&[("data", "tmpfs,1G")]),
            trust: true,
            ..RefreshOptions::default()
        };

        let args = Legacy
            .refresh_args("app", &opts, Some(Path::new("/tmp/cfg.yaml")))
            .unwrap();

        assert_eq!(
            args,
            [
                "refresh", "app",
                "--series", "focal",
                "--channel", "latest/edge",
                "--force", "--force-base", "--force-units",
                "--path", "/path/to/app.charm",
                "--resource", "bin=/path",
                "--revision", "42",
                "--storage", "data=tmpfs,1G",
                "--config", "/tmp/cfg.yaml",
            ]
        );
        assert!(Legacy.refresh_trusts_separately());
    }

    #[test]
    fn relate_and_run_action_spelling() {
        assert_eq!(
            Legacy.integrate_args("a", "b", &["192.0.2.0/24".into(), "10.0.0.0/8".into()]),
            ["relate", "a", "b", "--via", "192.0.2.0/24,10.0.0.0/8"]
        );
        assert_eq!(
            Legacy.run_args("mysql/0", "get-password", None, None),
            ["run-action", "--format", "json", "mysql/0", "get-password", "--wait"]
        );
        assert_eq!(
            Legacy.run_args("mysql/0", "x", Some(Duration::from_secs(5)), Some(Path::new("/p.yaml"))),
            ["run-action", "--format", "json", "mysql/0", "x", "--wait=5s", "--params", "/p.yaml"]
        );
    }

    #[test]
    fn exec_uses_timeout_flag() {
        let target = ExecTarget::Unit("ubuntu/0".into());
        assert_eq!(
            Legacy.exec_args(&target, Some(Duration::from_millis(1)), "sleep 1", &[]),
            ["exec", "--format", "json", "--unit", "ubuntu/0", "--timeout", "0.001s", "--", "sleep 1"]
        );
    }

    #[test]
    fn remove_unit_has_no_prompt_flag() {
        assert_eq!(
            Legacy.remove_unit_args(&["a/0".into()], true, true),
            ["remove-unit", "a/0", "--destroy-storage", "--force"]
        );
    }
}
