// ── Task model ──
//
// Canonical result of an action (`run`) or a shell command (`exec`) on one
// target. Both CLI generations normalize into `Task`; old-style exec entries
// that carry only a return code and streams come in as `ExecTask`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Terminal state Juju reports for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Aborted,
    Cancelled,
    Completed,
    Error,
    Failed,
    /// Non-terminal or unrecognized states (`pending`, `running`, ...).
    #[strum(default)]
    Other(String),
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of running an action or exec command on a single unit or machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Task {
    /// Task identifier; empty for old-style exec results.
    pub id: String,
    /// `None` for exec results that report no status.
    pub status: Option<TaskStatus>,
    /// Results set by the charm, without the reserved return-code/stdout/stderr keys.
    pub results: Map<String, Value>,
    pub return_code: i64,
    pub stdout: String,
    pub stderr: String,
    /// Failure message, if the charm set one.
    pub message: String,
    pub log: Vec<String>,
}

impl Task {
    /// Completed (when a status is reported) with a zero return code.
    pub fn success(&self) -> bool {
        self.status
            .as_ref()
            .is_none_or(|s| *s == TaskStatus::Completed)
            && self.return_code == 0
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut details: Vec<String> = Vec::new();
        if !self.results.is_empty() {
            details.push(format!("Results: {}", Value::Object(self.results.clone())));
        }
        if !self.stdout.is_empty() {
            details.push(format!("Stdout:\n{}", self.stdout));
        }
        if !self.stderr.is_empty() {
            details.push(format!("Stderr:\n{}", self.stderr));
        }
        if !self.message.is_empty() {
            details.push(format!("Message: {}", self.message));
        }
        if !self.log.is_empty() {
            details.push(format!("Log:\n{}", self.log.join("\n")));
        }

        write!(f, "Task: return code {}", self.return_code)?;
        if !details.is_empty() {
            write!(f, ", details:\n{}", details.join("\n"))?;
        }
        Ok(())
    }
}

/// Reduced result of a shell command: return code and streams only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecTask {
    pub return_code: i64,
    pub stdout: String,
    pub stderr: String,
}

impl From<ExecTask> for Task {
    fn from(exec: ExecTask) -> Self {
        Self {
            return_code: exec.return_code,
            stdout: exec.stdout,
            stderr: exec.stderr,
            ..Self::default()
        }
    }
}
