//! Shared configuration for jubilant tools.
//!
//! TOML profiles plus `JUBILANT_` environment overrides, translated into
//! `jubilant_core::JujuConfig`. The binary layers its global flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jubilant_core::{CliVersion, JujuConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found in config")]
    ProfileNotFound { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Settings every profile inherits.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named profiles, usually one per controller or model.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Humantime duration, e.g. "3m" or "90s".
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: String,

    #[serde(default = "default_cli_binary")]
    pub cli_binary: PathBuf,

    pub temp_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            wait_timeout: default_wait_timeout(),
            cli_binary: default_cli_binary(),
            temp_dir: None,
        }
    }
}

fn default_wait_timeout() -> String {
    "3m".into()
}
fn default_cli_binary() -> PathBuf {
    PathBuf::from("juju")
}

/// A named profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Model to operate on, optionally `controller:model`.
    pub model: Option<String>,

    pub cli_binary: Option<PathBuf>,

    /// Pin the CLI version instead of asking `juju version`.
    pub cli_version: Option<String>,

    pub wait_timeout: Option<String>,

    /// Directory for scoped temp files. Snap-confined juju needs one it can read.
    pub temp_dir: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "jubilant", "jubilant").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("jubilant");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment overrides use `__` as the nesting separator, e.g.
/// `JUBILANT_DEFAULTS__WAIT_TIMEOUT=5m` or `JUBILANT_DEFAULT_PROFILE=ci`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("JUBILANT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render config as pretty TOML.
pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Pick a profile (explicit name, then `default_profile`, then none) and
/// build the client settings from it.
pub fn resolve(cfg: &Config, profile: Option<&str>) -> Result<JujuConfig, ConfigError> {
    let empty = Profile::default();
    let selected = match profile.or(cfg.default_profile.as_deref()) {
        Some(name) => cfg
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: name.into(),
            })?,
        None => &empty,
    };
    profile_to_juju_config(selected, &cfg.defaults)
}

/// Merge one profile over the defaults.
pub fn profile_to_juju_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<JujuConfig, ConfigError> {
    let raw_timeout = profile
        .wait_timeout
        .as_deref()
        .unwrap_or(&defaults.wait_timeout);
    let wait_timeout = parse_wait_timeout(raw_timeout)?;

    if let Some(ref version) = profile.cli_version {
        version
            .parse::<CliVersion>()
            .map_err(|e| ConfigError::Validation {
                field: "cli_version".into(),
                reason: e.to_string(),
            })?;
    }

    Ok(JujuConfig {
        model: profile.model.clone(),
        wait_timeout,
        cli_binary: profile
            .cli_binary
            .clone()
            .unwrap_or_else(|| defaults.cli_binary.clone()),
        cli_version: profile.cli_version.clone(),
        temp_dir: profile
            .temp_dir
            .clone()
            .or_else(|| defaults.temp_dir.clone()),
    })
}

/// Parse a humantime duration such as "90s" or "3m". Zero is rejected.
pub fn parse_wait_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let parsed = humantime::parse_duration(raw).map_err(|e| ConfigError::Validation {
        field: "wait_timeout".into(),
        reason: format!("'{raw}': {e}"),
    })?;
    if parsed.is_zero() {
        return Err(ConfigError::Validation {
            field: "wait_timeout".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "ci"

[defaults]
wait_timeout = "90s"
temp_dir = "/var/snap/juju/common"

[profiles.ci]
model = "lxd:ci"
cli_version = "3.6.1"

[profiles.legacy]
cli_binary = "/snap/juju_29/bin/juju"
cli_version = "2.9.51"
wait_timeout = "10m"
"#;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.profiles.is_empty());
        assert_eq!(resolve(&cfg, None).unwrap(), JujuConfig::default());
    }

    #[test]
    fn default_profile_inherits_defaults() {
        let file = write_config(SAMPLE);
        let cfg = load_config_from(file.path()).unwrap();

        let resolved = resolve(&cfg, None).unwrap();
        assert_eq!(resolved.model.as_deref(), Some("lxd:ci"));
        assert_eq!(resolved.wait_timeout, Duration::from_secs(90));
        assert_eq!(resolved.cli_binary, PathBuf::from("juju"));
        assert_eq!(resolved.cli_version.as_deref(), Some("3.6.1"));
        assert_eq!(
            resolved.temp_dir,
            Some(PathBuf::from("/var/snap/juju/common"))
        );
    }

    #[test]
    fn named_profile_overrides_defaults() {
        let file = write_config(SAMPLE);
        let cfg = load_config_from(file.path()).unwrap();

        let resolved = resolve(&cfg, Some("legacy")).unwrap();
        assert_eq!(resolved.model, None);
        assert_eq!(resolved.wait_timeout, Duration::from_secs(600));
        assert_eq!(resolved.cli_binary, PathBuf::from("/snap/juju_29/bin/juju"));
        assert_eq!(resolved.cli_version.as_deref(), Some("2.9.51"));
    }

    #[test]
    fn unknown_profile_is_reported() {
        let file = write_config(SAMPLE);
        let cfg = load_config_from(file.path()).unwrap();

        let err = resolve(&cfg, Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { ref profile } if profile == "nope"));
    }

    #[test]
    fn bad_values_fail_validation() {
        let defaults = Defaults::default();

        let profile = Profile {
            wait_timeout: Some("soon".into()),
            ..Profile::default()
        };
        let err = profile_to_juju_config(&profile, &defaults).unwrap_err();
        assert!(err.to_string().starts_with("invalid wait_timeout"), "{err}");

        let profile = Profile {
            cli_version: Some("latest".into()),
            ..Profile::default()
        };
        let err = profile_to_juju_config(&profile, &defaults).unwrap_err();
        assert!(err.to_string().starts_with("invalid cli_version"), "{err}");

        assert!(parse_wait_timeout("0s").is_err());
    }

    #[test]
    fn rendered_config_loads_back() {
        let file = write_config(SAMPLE);
        let cfg = load_config_from(file.path()).unwrap();

        let rendered = render_config(&cfg).unwrap();
        let again = write_config(&rendered);
        assert_eq!(load_config_from(again.path()).unwrap(), cfg);
    }
}
