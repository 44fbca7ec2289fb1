// Juju CLI transport.
//
// Owns the binary path, the target model, and the runner. Handles the
// mechanics every operation shares: `--model` insertion after the verb,
// logging the command line, and turning non-zero exits into
// `Error::Command`. What to run is decided by the dialects.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, shell_join};
use crate::process::{CommandOutput, CommandRunner, ProcessRunner};

/// Per-call knobs for [`JujuCli::run`].
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    /// Insert `--model <model>` after the verb (when a model is set).
    pub include_model: bool,
    /// Log the command line at info level. The wait loop turns this off.
    pub log: bool,
    /// Text fed to the process on stdin.
    pub stdin: Option<&'a str>,
}

impl Default for RunOptions<'_> {
    fn default() -> Self {
        Self {
            include_model: true,
            log: true,
            stdin: None,
        }
    }
}

impl RunOptions<'_> {
    pub fn without_model() -> Self {
        Self {
            include_model: false,
            ..Self::default()
        }
    }

    pub fn quiet() -> Self {
        Self {
            log: false,
            ..Self::default()
        }
    }
}

/// Raw handle on the `juju` binary for one model context.
#[derive(Clone)]
pub struct JujuCli {
    binary: PathBuf,
    model: Option<String>,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for JujuCli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JujuCli")
            .field("binary", &self.binary)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl JujuCli {
    /// CLI handle that spawns real processes.
    pub fn new(binary: impl Into<PathBuf>, model: Option<String>) -> Self {
        Self::with_runner(binary, model, Arc::new(ProcessRunner))
    }

    /// CLI handle over a custom runner (tests, wrappers).
    pub fn with_runner(
        binary: impl Into<PathBuf>,
        model: Option<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            binary: binary.into(),
            model,
            runner,
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    /// Build the full argv: binary, verb, optional `--model`, rest.
    pub fn argv<S: AsRef<str>>(&self, args: &[S], include_model: bool) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 3);
        argv.push(self.binary.to_string_lossy().into_owned());
        let mut rest = args.iter().map(|a| a.as_ref().to_owned());
        if let Some(verb) = rest.next() {
            argv.push(verb);
        }
        if let Some(model) = self.model.as_ref().filter(|_| include_model) {
            argv.push("--model".into());
            argv.push(model.clone());
        }
        argv.extend(rest);
        argv
    }

    /// Run a command, returning its output only if it exited zero.
    pub fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        opts: RunOptions<'_>,
    ) -> Result<CommandOutput, Error> {
        let argv = self.argv(args, opts.include_model);
        if opts.log {
            info!("cli: {}", shell_join(&argv));
        }

        let output = self.runner.run(&argv, opts.stdin)?;
        debug!(
            code = ?output.code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "cli finished"
        );

        if output.success() {
            Ok(output)
        } else {
            Err(Error::Command {
                args: argv,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }

    /// Run a command and return only its stdout.
    pub fn stdout<S: AsRef<str>>(&self, args: &[S], opts: RunOptions<'_>) -> Result<String, Error> {
        self.run(args, opts).map(|out| out.stdout)
    }
}
