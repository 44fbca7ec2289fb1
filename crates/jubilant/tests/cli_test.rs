//! Integration tests for the `jubilant` binary.
//!
//! Commands that reach juju run against `tests/fixtures/fake-juju`, a shell
//! stand-in that logs its arguments and replays canned output.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const FAKE_JUJU: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fake-juju");
const SNAPPASS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../jubilant-core/tests/fixtures/snappass.json"
);

const RUN_BACKUP: &str =
    r#"{"mysql/0": {"id": "7", "status": "completed", "results": {"return-code": 0, "backup-id": "b-1"}}}"#;
const EXEC_HELLO: &str =
    r#"{"ubuntu/0": {"id": "3", "status": "completed", "results": {"return-code": 0, "stdout": "hello\n"}}}"#;
const EXEC_FAILED: &str =
    r#"{"ubuntu/0": {"id": "4", "status": "completed", "results": {"return-code": 1, "stderr": "nope\n"}}}"#;

/// Isolated environment: private config dir, call log, no `JUBILANT_*` leakage.
struct Harness {
    dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// `jubilant` without a juju binary configured.
    fn bare(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("jubilant");
        cmd.env("HOME", self.dir.path().join("home"))
            .env("XDG_CONFIG_HOME", self.config_dir())
            .env("FAKE_JUJU_LOG", self.log_path())
            .env("FAKE_JUJU_STATUS", SNAPPASS)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("JUBILANT_PROFILE")
            .env_remove("JUBILANT_MODEL")
            .env_remove("JUBILANT_CLI_BINARY")
            .env_remove("JUBILANT_CLI_VERSION")
            .env_remove("JUBILANT_WAIT_TIMEOUT")
            .env_remove("JUBILANT_OUTPUT")
            .env_remove("JUBILANT_DEFAULT_PROFILE");
        cmd
    }

    /// `jubilant` pointed at the fake juju.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.bare();
        cmd.args(["--cli-binary", FAKE_JUJU]);
        cmd
    }

    fn write_config(&self, body: &str) {
        let dir = self.config_dir().join("jubilant");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), body).unwrap();
    }

    /// Argument lines the fake juju received, in order.
    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = Harness::new().bare().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    Harness::new().bare().arg("--help").assert().success().stdout(
        predicate::str::contains("status")
            .and(predicate::str::contains("wait"))
            .and(predicate::str::contains("deploy"))
            .and(predicate::str::contains("exec")),
    );
}

#[test]
fn test_version_flag() {
    Harness::new()
        .bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jubilant"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    Harness::new()
        .bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    Harness::new()
        .bare()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    Harness::new()
        .bare()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wait_timeout = \"3m\""));
}

#[test]
fn test_config_path_under_config_dir() {
    let h = Harness::new();
    h.bare()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_profile_pins_version() {
    let h = Harness::new();
    h.write_config(
        r#"
[profiles.legacy]
cli_version = "2.9.51"
model = "old"
"#,
    );

    h.cmd()
        .args(["--profile", "legacy", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juju 2.9.51, legacy (2.9) dialect"));
    assert!(h.calls().is_empty(), "pinned version must not call juju");
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let h = Harness::new();
    h.write_config("[profiles.ci]\nmodel = \"ci\"\n");

    h.cmd()
        .args(["--profile", "prod", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod").and(predicate::str::contains("ci")));
}

// ── Version / status ────────────────────────────────────────────────

#[test]
fn test_version_detected_from_juju() {
    let h = Harness::new();
    h.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "juju 3.6.1-genericlinux-amd64, current (3.x) dialect",
        ));
    assert_eq!(h.calls(), ["version --format json"]);
}

#[test]
fn test_status_table() {
    Harness::new()
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Model tt")
                .and(predicate::str::contains("snappass-test"))
                .and(predicate::str::contains("active")),
        );
}

#[test]
fn test_status_json_passes_model() {
    let h = Harness::new();
    let output = h
        .cmd()
        .args(["--model", "ci", "--output", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["model"]["name"], "tt");
    assert_eq!(
        h.calls().last().map(String::as_str),
        Some("status --model ci --format json")
    );
}

#[test]
fn test_invalid_output_format() {
    let output = Harness::new()
        .cmd()
        .args(["--output", "xml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

// ── Wait ────────────────────────────────────────────────────────────

#[test]
fn test_wait_until_active() {
    let h = Harness::new();
    h.cmd()
        .args([
            "--cli-version",
            "3.6.1",
            "wait",
            "--app",
            "snappass-test",
            "--delay",
            "0s",
            "--successes",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("snappass-test"));

    let polls = h.calls().iter().filter(|c| c.starts_with("status")).count();
    assert_eq!(polls, 2);
}

#[test]
fn test_wait_zero_timeout_exits_8() {
    Harness::new()
        .cmd()
        .args([
            "--cli-version",
            "3.6.1",
            "wait",
            "--for",
            "blocked",
            "--timeout",
            "0s",
        ])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn test_wait_error_predicate_aborts() {
    Harness::new()
        .cmd()
        .args([
            "--cli-version",
            "3.6.1",
            "wait",
            "--for",
            "blocked",
            "--error-on",
            "active",
            "--delay",
            "0s",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("any_active"));
}

#[test]
fn test_wait_rejects_zero_successes() {
    Harness::new()
        .cmd()
        .args(["wait", "--successes", "0"])
        .assert()
        .code(2);
}

// ── Deploy / relations ──────────────────────────────────────────────

#[test]
fn test_legacy_deploy_uses_series() {
    let h = Harness::new();
    h.cmd()
        .args([
            "--cli-version",
            "2.9.51",
            "deploy",
            "ubuntu",
            "--base",
            "ubuntu@22.04",
        ])
        .assert()
        .success();

    let calls = h.calls();
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(calls[0].starts_with("deploy ubuntu"), "{calls:?}");
    assert!(calls[0].contains("--series jammy"), "{calls:?}");
}

#[test]
fn test_legacy_deploy_rejects_unknown_base() {
    let h = Harness::new();
    h.cmd()
        .args([
            "--cli-version",
            "2.9.51",
            "deploy",
            "centos-charm",
            "--base",
            "centos@7",
        ])
        .assert()
        .code(2);
    assert!(h.calls().is_empty());
}

#[test]
fn test_current_deploy_uses_base() {
    let h = Harness::new();
    h.cmd()
        .args([
            "--cli-version",
            "3.6.1",
            "deploy",
            "ubuntu",
            "--base",
            "ubuntu@22.04",
            "--config",
            "x=true",
        ])
        .assert()
        .success();

    let calls = h.calls();
    assert!(calls[0].contains("--base ubuntu@22.04"), "{calls:?}");
    assert!(calls[0].contains("--config x=true"), "{calls:?}");
}

#[test]
fn test_integrate_verb_follows_generation() {
    let h = Harness::new();
    h.cmd()
        .args(["--cli-version", "2.9.51", "integrate", "mysql", "wordpress"])
        .assert()
        .success();
    h.cmd()
        .args(["--cli-version", "3.6.1", "integrate", "mysql", "wordpress"])
        .assert()
        .success();

    assert_eq!(
        h.calls(),
        ["relate mysql wordpress", "integrate mysql wordpress"]
    );
}

#[test]
fn test_remove_relation_force() {
    let h = Harness::new();
    h.cmd()
        .args([
            "--cli-version",
            "3.6.1",
            "remove-relation",
            "mysql",
            "wordpress",
            "--force",
        ])
        .assert()
        .success();
    assert_eq!(h.calls(), ["remove-relation mysql wordpress --force"]);
}

// ── Run / exec ──────────────────────────────────────────────────────

#[test]
fn test_run_prints_results() {
    let h = Harness::new();
    let output = h
        .cmd()
        .env("FAKE_JUJU_OUTPUT", RUN_BACKUP)
        .args([
            "--cli-version",
            "3.6.1",
            "--output",
            "json",
            "run",
            "mysql/0",
            "backup",
            "--param",
            "compress=true",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["results"]["backup-id"], "b-1");

    let calls = h.calls();
    assert!(
        calls[0].starts_with("run --format json mysql/0 backup --params "),
        "{calls:?}"
    );
}

#[test]
fn test_run_missing_action_exits_4() {
    Harness::new()
        .cmd()
        .env("FAKE_JUJU_EXIT", "1")
        .env("FAKE_JUJU_STDERR", r#"ERROR action "nope" not found"#)
        .args(["--cli-version", "3.6.1", "run", "mysql/0", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_run_unclassified_failure_exits_10() {
    Harness::new()
        .cmd()
        .env("FAKE_JUJU_EXIT", "1")
        .env("FAKE_JUJU_STDERR", "ERROR permission denied")
        .args(["--cli-version", "3.6.1", "run", "mysql/0", "backup"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("permission denied"));
}

#[test]
fn test_exec_streams_stdout() {
    let h = Harness::new();
    h.cmd()
        .env("FAKE_JUJU_OUTPUT", EXEC_HELLO)
        .args([
            "--cli-version",
            "3.6.1",
            "exec",
            "--unit",
            "ubuntu/0",
            "--",
            "echo",
            "hello",
        ])
        .assert()
        .success()
        .stdout("hello\n");
    assert_eq!(
        h.calls(),
        ["exec --format json --unit ubuntu/0 -- echo hello"]
    );
}

#[test]
fn test_exec_failure_exits_9() {
    Harness::new()
        .cmd()
        .env("FAKE_JUJU_OUTPUT", EXEC_FAILED)
        .args(["--cli-version", "3.6.1", "exec", "--unit", "ubuntu/0", "false"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("return code 1"));
}

#[test]
fn test_exec_timeout_exits_8() {
    Harness::new()
        .cmd()
        .env("FAKE_JUJU_EXIT", "1")
        .env("FAKE_JUJU_STDERR", "ERROR timed out waiting for results")
        .args([
            "--cli-version",
            "3.6.1",
            "exec",
            "--unit",
            "ubuntu/0",
            "--wait",
            "1s",
            "sleep",
            "5",
        ])
        .assert()
        .code(8);
}

#[test]
fn test_exec_needs_exactly_one_target() {
    let h = Harness::new();
    h.cmd().args(["exec", "ls"]).assert().code(2);
    h.cmd()
        .args(["exec", "--unit", "a/0", "--machine", "0", "ls"])
        .assert()
        .code(2);
    assert!(h.calls().is_empty());
}
