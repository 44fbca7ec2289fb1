//! Version-agnostic Juju client for charm integration tests.
//!
//! Sits between `jubilant-api` (the CLI transport and per-generation
//! dialects) and callers such as test suites or the `jubilant` binary:
//!
//! - **[`Juju`]**: the client. Detects the CLI generation (2.9 or 3.x)
//!   once at construction and routes `deploy`, `refresh`, `integrate`,
//!   `run`, `exec`, `status` and friends through the matching dialect.
//!   [`Juju::wait`] polls status until a readiness predicate holds.
//!
//! - **Domain model** ([`model`]): one canonical [`Status`] and one
//!   canonical [`Task`], whichever generation produced the JSON. [`convert`]
//!   holds the raw → canonical conversions, including the `status-error`
//!   sentinels.
//!
//! - **Predicates** ([`predicates`]): `all_active`, `any_error`, and the
//!   rest, for use with `wait`.
//!
//! - **[`diff`]**: gron-style line diffs of successive snapshots, logged
//!   by the wait loop.

pub mod config;
pub mod convert;
pub mod diff;
pub mod error;
pub mod juju;
pub mod model;
pub mod predicates;
pub mod temp_model;
pub mod wait;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_WAIT_TIMEOUT, JujuConfig};
pub use error::CoreError;
pub use juju::{AddModelOptions, AddUnitOptions, ExecOptions, Juju};
pub use temp_model::TempModel;
pub use wait::{Clock, ManualClock, Predicate, SystemClock, WaitOptions};

pub use model::{
    AppStatus, ExecTask, MachineStatus, ModelStatus, SecretUri, Status, StatusInfo, Task,
    TaskStatus, UnitStatus,
};
pub use predicates::{
    all_active, all_agents_idle, all_blocked, all_error, all_maintenance, all_waiting, any_active,
    any_blocked, any_error, any_maintenance, any_waiting,
};

// Option types callers pass straight through.
pub use jubilant_api::{
    Bind, CliVersion, Config, ConfigValue, DeployOptions, Generation, RefreshOptions, RunOptions,
};
