//! Command dispatch: bridges CLI args -> `Juju` calls -> output formatting.

pub mod config_cmd;
pub mod deploy;
pub mod status;
pub mod tasks;
pub mod util;
pub mod wait;

use jubilant_core::Juju;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a juju-bound command to the appropriate handler.
pub fn dispatch(cmd: &Command, juju: &Juju, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Version => status::version(juju, global),
        Command::Status(args) => status::handle(juju, args, global),
        Command::Wait(args) => wait::handle(juju, args, global),
        Command::Deploy(args) => deploy::deploy(juju, args, global),
        Command::Refresh(args) => deploy::refresh(juju, args, global),
        Command::Integrate(args) => deploy::integrate(juju, args, global),
        Command::RemoveRelation(args) => deploy::remove_relation(juju, args, global),
        Command::Run(args) => tasks::run(juju, args, global),
        Command::Exec(args) => tasks::exec(juju, args, global),
        // Config and Completions are handled before a client exists
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
