// Scripted `CommandRunner` for tests.
//
// Responses are registered per exact argv (including the binary). A
// sequence handler answers repeated calls in order and keeps repeating its
// last entry; a closure handler can inspect the argv (for example to read a
// temporary file before the caller deletes it). Every call is recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Error;
use crate::process::{CommandOutput, CommandRunner};

type Responder = Box<dyn Fn(&[String]) -> Option<CommandOutput> + Send + Sync>;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub output: CommandOutput,
}

#[derive(Default)]
struct State {
    exact: HashMap<Vec<String>, VecDeque<CommandOutput>>,
    responders: Vec<Responder>,
    calls: Vec<Call>,
}

/// Cloneable handle: the test keeps one clone, the client under test owns another.
#[derive(Clone, Default)]
pub struct FakeRunner {
    state: Arc<Mutex<State>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `args` with `output` on every call.
    pub fn handle<S: AsRef<str>>(&self, args: &[S], output: CommandOutput) -> &Self {
        self.handle_sequence(args, vec![output])
    }

    /// Answer `args` with each output in turn; the last one repeats forever.
    pub fn handle_sequence<S: AsRef<str>>(&self, args: &[S], outputs: Vec<CommandOutput>) -> &Self {
        let key = args.iter().map(|a| a.as_ref().to_owned()).collect();
        self.lock().exact.insert(key, outputs.into());
        self
    }

    /// Answer any argv for which `responder` returns `Some`.
    pub fn handle_with<F>(&self, responder: F) -> &Self
    where
        F: Fn(&[String]) -> Option<CommandOutput> + Send + Sync + 'static,
    {
        self.lock().responders.push(Box::new(responder));
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls whose argv equals `args`.
    pub fn count<S: AsRef<str>>(&self, args: &[S]) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.args.iter().map(String::as_str).eq(args.iter().map(AsRef::as_ref)))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput, Error> {
        let mut state = self.lock();

        let scripted = state.exact.get_mut(argv).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });
        let output = match scripted {
            Some(output) => output,
            None => state
                .responders
                .iter()
                .find_map(|r| r(argv))
                .ok_or_else(|| Error::Spawn {
                    program: argv.first().cloned().unwrap_or_default(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("unhandled command {argv:?}"),
                    ),
                })?,
        };

        state.calls.push(Call {
            args: argv.to_vec(),
            stdin: stdin.map(str::to_owned),
            output: output.clone(),
        });
        Ok(output)
    }
}
