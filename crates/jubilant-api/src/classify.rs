// Stderr classification for failed `run`/`exec` invocations.
//
// Juju reports these failures only as prose on stderr, so matching is by
// substring. Keep every pattern here.

/// What kind of failure a non-zero `run`/`exec` exit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The `--wait`/`--timeout` limit was reached.
    Timeout,
    /// The unit, machine, or action does not exist.
    NotFound,
    /// The remote command or action failed; stdout still holds the task.
    TaskFailed,
    /// Anything else: surface the command error unchanged.
    Unknown,
}

/// Classify a failed invocation by its stderr. Timeouts win over the rest.
pub fn classify(stderr: &str) -> Failure {
    if stderr.contains("timed out") || stderr.contains("timeout reached") {
        Failure::Timeout
    } else if stderr.contains("not found") {
        Failure::NotFound
    } else if stderr.contains("task failed") {
        Failure::TaskFailed
    } else {
        Failure::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_phrases() {
        assert_eq!(classify("... timed out ..."), Failure::Timeout);
        assert_eq!(classify("ERROR timeout reached"), Failure::Timeout);
        assert_eq!(classify(r#"ERROR unit "c/0" not found"#), Failure::NotFound);
        assert_eq!(classify("ERROR the following task failed:\n id 42"), Failure::TaskFailed);
        assert_eq!(classify("ERROR permission denied"), Failure::Unknown);
        assert_eq!(classify(""), Failure::Unknown);
    }

    #[test]
    fn timeout_takes_precedence() {
        assert_eq!(classify("task failed: timed out"), Failure::Timeout);
    }
}
