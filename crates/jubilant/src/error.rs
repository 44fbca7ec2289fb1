//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use jubilant_config::ConfigError;
use jubilant_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const TIMEOUT: i32 = 8;
    pub const TASK: i32 = 9;
    pub const COMMAND: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jubilant::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(jubilant::precondition))]
    Precondition { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(jubilant::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Config file: {path}"
        )
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("Could not load configuration: {0}")]
    #[diagnostic(
        code(jubilant::config),
        help("Check the config file with: jubilant config path")
    )]
    Config(ConfigError),

    // ── Juju ─────────────────────────────────────────────────────────

    #[error("{operation} is not supported by this juju")]
    #[diagnostic(
        code(jubilant::unsupported),
        help("This command requires {required}. Point --cli-binary at a newer juju.")
    )]
    Unsupported { operation: String, required: String },

    #[error("{target} not found")]
    #[diagnostic(code(jubilant::not_found), help("juju said:\n{stderr}"))]
    NotFound { target: String, stderr: String },

    #[error("{message}")]
    #[diagnostic(
        code(jubilant::timeout),
        help("Raise the limit with --timeout, --wait, or --wait-timeout.")
    )]
    Timeout { message: String },

    #[error("Wait aborted: {predicate} matched")]
    #[diagnostic(code(jubilant::wait_error), help("Last status:\n{status}"))]
    WaitFailed { predicate: String, status: String },

    #[error("{task}")]
    #[diagnostic(code(jubilant::task_failed))]
    Task { task: String },

    #[error("juju exited with code {code}")]
    #[diagnostic(code(jubilant::command_failed), help("{command}\n{stderr}"))]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("Could not decode juju output: {message}")]
    #[diagnostic(code(jubilant::decode))]
    Decode { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(jubilant::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(jubilant::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Precondition { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Task { .. } => exit_code::TASK,
            Self::CommandFailed { .. } => exit_code::COMMAND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Precondition { message } => CliError::Precondition { message },

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },

            CoreError::Command {
                args,
                code,
                stdout: _,
                stderr,
            } => CliError::CommandFailed {
                command: args.join(" "),
                code: code.map_or_else(|| "signal".into(), |c| c.to_string()),
                stderr: stderr.trim_end().to_owned(),
            },

            CoreError::Timeout { message, .. } => CliError::Timeout { message },

            CoreError::NotFound { target, stderr } => CliError::NotFound {
                target,
                stderr: stderr.trim_end().to_owned(),
            },

            CoreError::Task(task) => CliError::Task {
                task: task.to_string(),
            },

            CoreError::Wait { predicate, status } => CliError::WaitFailed {
                predicate,
                status: status.to_string(),
            },

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Io(err) => CliError::Io(err),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Precondition {
                    message: "must specify \"machine\" or \"unit\", but not both".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::NotFound {
                    target: "unit \"a/0\"".into(),
                    stderr: String::new(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Timeout {
                    message: "wait timed out after 3s".into(),
                    last_status: None,
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::Command {
                    args: vec!["juju".into(), "deploy".into()],
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "ERROR boom\n".into(),
                },
                exit_code::COMMAND,
            ),
            (
                CoreError::Decode {
                    message: "eof".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, code) in cases {
            let cli = CliError::from(core);
            assert_eq!(cli.exit_code(), code, "{cli:?}");
        }
    }

    #[test]
    fn timeout_drops_status_snapshot() {
        let err = CliError::from(CoreError::Timeout {
            message: "wait timed out after 5s".into(),
            last_status: Some(Box::default()),
        });
        assert_eq!(err.to_string(), "wait timed out after 5s");
    }

    #[test]
    fn command_failure_names_exit_code() {
        let err = CliError::from(CoreError::Command {
            args: vec!["juju".into(), "status".into()],
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        });
        assert_eq!(err.to_string(), "juju exited with code signal");
    }
}
