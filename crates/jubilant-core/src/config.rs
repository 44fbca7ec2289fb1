// ── Client construction settings ──
//
// Describes *which* juju binary to drive and for which model. Never touches
// disk: `jubilant-config` (or a test) builds a `JujuConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

/// Default limit for [`crate::Juju::wait`] when the call gives none.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Settings for one [`crate::Juju`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JujuConfig {
    /// Target model; `None` uses the CLI's current model.
    pub model: Option<String>,
    /// Default timeout for `wait`.
    pub wait_timeout: Duration,
    /// Path or name of the juju executable.
    pub cli_binary: PathBuf,
    /// Pinned CLI version (e.g. "2.9.51"). Skips `juju version` detection.
    pub cli_version: Option<String>,
    /// Where scoped temp files (params, secrets, refresh config) go.
    /// `None` uses the system temp dir. Strictly confined snaps need a
    /// directory the juju snap can read.
    pub temp_dir: Option<PathBuf>,
}

impl Default for JujuConfig {
    fn default() -> Self {
        Self {
            model: None,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            cli_binary: PathBuf::from("juju"),
            cli_version: None,
            temp_dir: None,
        }
    }
}

impl JujuConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_cli_version(mut self, version: impl Into<String>) -> Self {
        self.cli_version = Some(version.into());
        self
    }
}
