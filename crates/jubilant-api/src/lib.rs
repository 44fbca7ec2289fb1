// jubilant-api: Juju CLI subprocess transport and per-generation dialects (2.9 + 3.x)

pub mod classify;
pub mod cli;
pub mod current;
pub mod dialect;
pub mod error;
pub mod legacy;
pub mod models;
pub mod options;
pub mod process;
pub mod status;
pub mod version;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use classify::{Failure, classify};
pub use cli::{JujuCli, RunOptions};
pub use dialect::{Dialect, ResultKeys};
pub use error::{Error, shell_join};
pub use options::{Bind, Config, ConfigValue, DeployOptions, ExecTarget, RefreshOptions};
pub use process::{CommandOutput, CommandRunner, ProcessRunner};
pub use version::{CliVersion, Generation};
