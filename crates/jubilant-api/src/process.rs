// Process invocation for the Juju CLI.
//
// Every operation is one blocking subprocess: argv in, exit code plus
// UTF-8 stdout/stderr out. The `CommandRunner` trait is the seam that lets
// tests script the external tool instead of spawning it.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::trace;

use crate::error::Error;

/// Captured result of one finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and streams.
    pub fn failed(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a full argv (`argv[0]` is the program) to completion.
///
/// Implementations report the exit status as data; turning a non-zero exit
/// into [`Error::Command`] is the caller's job (see [`crate::JujuCli`]).
pub trait CommandRunner: Send + Sync {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput, Error>;
}

/// The real runner: `std::process::Command`, stdin piped only when given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput, Error> {
        let Some((program, args)) = argv.split_first() else {
            return Err(Error::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argv"),
            });
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        // stdin is written on its own thread while this one drains stdout
        // and stderr.
        let pipe = stdin.and_then(|input| child.stdin.take().map(|pipe| (pipe, input)));
        let output = std::thread::scope(|scope| {
            let writer = pipe.map(|(mut pipe, input)| {
                // Dropping the handle closes the pipe so the child sees EOF.
                scope.spawn(move || pipe.write_all(input.as_bytes()))
            });
            let output = child.wait_with_output();
            if let Some(writer) = writer {
                match writer.join() {
                    // The child may exit without reading everything.
                    Ok(Err(err)) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                        return Err(err);
                    }
                    Ok(_) => {}
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            output
        })?;
        trace!(
            program = %program,
            code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "process finished"
        );

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: decode(program, "stdout", output.stdout)?,
            stderr: decode(program, "stderr", output.stderr)?,
        })
    }
}

fn decode(program: &str, stream: &'static str, bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|_| Error::Encoding {
        program: program.to_owned(),
        stream,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_owned()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_exit_code() {
        let out = ProcessRunner
            .run(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]), None)
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[test]
    fn feeds_stdin() {
        let out = ProcessRunner.run(&argv(&["cat"]), Some("foo")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "foo");
    }

    #[cfg(unix)]
    #[test]
    fn large_stdin_is_echoed_without_stalling() {
        let input = "x".repeat(1 << 20);
        let out = ProcessRunner.run(&argv(&["cat"]), Some(&input)).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.len(), input.len());
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let err = ProcessRunner
            .run(&argv(&["/nonexistent/juju-binary", "status"]), None)
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { ref program, .. } if program == "/nonexistent/juju-binary"));
    }
}
