use thiserror::Error;

/// Top-level error type for the `jubilant-api` crate.
///
/// Covers every failure mode of driving the Juju CLI as a subprocess:
/// spawning, non-zero exits, output decoding, and argument validation.
/// `jubilant-core` maps these into caller-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Process ─────────────────────────────────────────────────────
    /// The binary could not be started at all (missing, not executable).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The CLI exited non-zero. Juju offers no structured error codes, so
    /// callers classify the failure from `stderr`.
    #[error("{}", command_message(.args, .code, .stderr))]
    Command {
        args: Vec<String>,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Captured output was not valid UTF-8.
    #[error("{stream} of {program} is not valid UTF-8")]
    Encoding {
        program: String,
        stream: &'static str,
    },

    /// Writing stdin or a temporary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON output could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// YAML payload (config or params file) could not be produced.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ── Input ───────────────────────────────────────────────────────
    /// A `name@channel` base that has no legacy series equivalent.
    #[error("invalid base {base:?}: {reason}")]
    InvalidBase { base: String, reason: String },

    /// `juju version` returned something that is not a version.
    #[error("invalid Juju version {0:?}")]
    InvalidVersion(String),
}

impl Error {
    /// Build a `Deserialization` error from a serde failure, keeping the body.
    pub fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        let preview = body.char_indices().nth(200).map_or(body, |(i, _)| &body[..i]);
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }

    /// Stderr of a failed command, if this is one.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Command { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn command_message(args: &[String], code: &Option<i32>, stderr: &str) -> String {
    let status = code.map_or_else(|| "a signal".to_owned(), |c| format!("exit code {c}"));
    format!(
        "command {} failed with {status}: {}",
        shell_join(args),
        stderr.trim_end()
    )
}

/// Render an argv the way a shell user would type it (for logs and errors).
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| shell_quote(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | ',' | '+')
        });
    if safe {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
