// ── Core error types ──
//
// Caller-facing errors from jubilant-core. Transport failures from
// jubilant-api are translated by `From<jubilant_api::Error>`; the
// run/exec/wait paths produce the richer variants (timeout, not-found,
// task failure, wait error) themselves.

use std::fmt::Write as _;

use jubilant_api::shell_join;
use thiserror::Error;

use crate::model::{Status, Task};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller errors ────────────────────────────────────────────────
    /// Arguments are inconsistent (e.g. exec with both machine and unit).
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// An argument value is unusable (e.g. a base with no 2.9 series).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The detected Juju generation cannot do this.
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    // ── CLI errors ───────────────────────────────────────────────────
    /// The CLI exited non-zero for a reason not classified below.
    #[error("Command {} failed (exit code {}): {}", shell_join(.args), display_code(.code), .stderr.trim_end())]
    Command {
        args: Vec<String>,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// A run/exec `wait` limit or the `wait()` timeout was reached.
    #[error("{}", with_status(.message, .last_status.as_deref()))]
    Timeout {
        message: String,
        last_status: Option<Box<Status>>,
    },

    /// The unit, machine, or action a command targeted does not exist.
    #[error("{target} not found, stderr:\n{stderr}")]
    NotFound { target: String, stderr: String },

    /// The action or command ran and failed.
    #[error("task error: {0}")]
    Task(Box<Task>),

    /// The `wait()` error predicate fired.
    #[error("error predicate {predicate} returned true\n{status}")]
    Wait {
        predicate: String,
        status: Box<Status>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    /// CLI output could not be decoded.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Temporary file or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The failed task, if this is a task-level failure.
    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
            _ => None,
        }
    }

    /// Stderr of the failed command, when one was captured.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Command { stderr, .. } | Self::NotFound { stderr, .. } => Some(stderr),
            Self::Task(task) => Some(&task.stderr),
            _ => None,
        }
    }

    pub(crate) fn unsupported_before_3(operation: &str) -> Self {
        Self::Unsupported {
            operation: operation.to_owned(),
            required: "Juju 3".into(),
        }
    }
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_owned(), |c| c.to_string())
}

fn with_status(message: &str, status: Option<&Status>) -> String {
    let mut out = message.to_owned();
    if let Some(status) = status {
        let _ = write!(out, "\n{status}");
    }
    out
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<jubilant_api::Error> for CoreError {
    fn from(err: jubilant_api::Error) -> Self {
        match err {
            jubilant_api::Error::Spawn { program, source } => CoreError::Io(std::io::Error::new(
                source.kind(),
                format!("failed to run {program}: {source}"),
            )),
            jubilant_api::Error::Command {
                args,
                code,
                stdout,
                stderr,
            } => CoreError::Command {
                args,
                code,
                stdout,
                stderr,
            },
            jubilant_api::Error::Encoding { .. } | jubilant_api::Error::InvalidVersion(_) => {
                CoreError::Decode {
                    message: err.to_string(),
                }
            }
            jubilant_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            jubilant_api::Error::Io(e) => CoreError::Io(e),
            jubilant_api::Error::Yaml(_) | jubilant_api::Error::InvalidBase { .. } => {
                CoreError::InvalidInput {
                    message: err.to_string(),
                }
            }
        }
    }
}
