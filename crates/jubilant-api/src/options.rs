// Operation options shared by both CLI generations.
//
// These are plain data. The dialects turn them into argv; nothing here knows
// which generation is in use except `base_to_series`, which only the legacy
// dialect calls.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::error::Error;

// ── Config values ────────────────────────────────────────────────────

/// A charm config value. Rendered as `key=value` on the command line and
/// as a native YAML scalar in config files.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Charm config keyed by option name.
pub type Config = BTreeMap<String, ConfigValue>;

// ── Deploy / refresh ─────────────────────────────────────────────────

/// Endpoint-to-space bindings, or one space for every endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Space(String),
    Endpoints(BTreeMap<String, String>),
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(space) => f.write_str(space),
            Self::Endpoints(map) => {
                let joined: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
                f.write_str(&joined.join(" "))
            }
        }
    }
}

/// Options for `deploy`. `num_units` defaults to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOptions {
    pub attach_storage: Vec<String>,
    /// `name@channel`, e.g. `ubuntu@22.04`.
    pub base: Option<String>,
    pub bind: Option<Bind>,
    pub channel: Option<String>,
    pub config: Config,
    pub constraints: BTreeMap<String, String>,
    pub force: bool,
    pub num_units: u32,
    pub overlays: Vec<PathBuf>,
    pub resources: BTreeMap<String, String>,
    pub revision: Option<u32>,
    pub storage: BTreeMap<String, String>,
    pub to: Vec<String>,
    pub trust: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            attach_storage: Vec::new(),
            base: None,
            bind: None,
            channel: None,
            config: Config::new(),
            constraints: BTreeMap::new(),
            force: false,
            num_units: 1,
            overlays: Vec::new(),
            resources: BTreeMap::new(),
            revision: None,
            storage: BTreeMap::new(),
            to: Vec::new(),
            trust: false,
        }
    }
}

/// Options for `refresh`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshOptions {
    pub base: Option<String>,
    pub channel: Option<String>,
    pub config: Config,
    /// Expands to `--force --force-base --force-units`.
    pub force: bool,
    pub path: Option<PathBuf>,
    pub resources: BTreeMap<String, String>,
    pub revision: Option<u32>,
    pub storage: BTreeMap<String, String>,
    pub trust: bool,
}

// ── Exec target ──────────────────────────────────────────────────────

/// Where `exec` runs: exactly one machine or one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecTarget {
    Machine(String),
    Unit(String),
}

impl ExecTarget {
    /// The `--machine`/`--unit` flag selecting this target.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Machine(_) => "--machine",
            Self::Unit(_) => "--unit",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Machine(id) | Self::Unit(id) => id,
        }
    }
}

impl fmt::Display for ExecTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Machine(id) => write!(f, "machine {id:?}"),
            Self::Unit(name) => write!(f, "unit {name:?}"),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Render a wait duration the way Juju flags expect it: `1.5s`, `0.001s`.
pub fn format_seconds(d: Duration) -> String {
    format!("{}s", d.as_secs_f64())
}

/// Map a `ubuntu@<release>` base to the series name Juju 2.9 expects.
pub fn base_to_series(base: &str) -> Result<&'static str, Error> {
    let invalid = |reason: String| Error::InvalidBase {
        base: base.to_owned(),
        reason,
    };

    let (name, release) = base
        .split_once('@')
        .ok_or_else(|| invalid("expected <name>@<release>".into()))?;
    if name != "ubuntu" {
        return Err(invalid(format!("base must be an Ubuntu base, not {name:?}")));
    }

    Ok(match release {
        "14.04" => "trusty",
        "16.04" => "xenial",
        "18.04" => "bionic",
        "20.04" => "focal",
        "22.04" => "jammy",
        "24.04" => "noble",
        "24.10" => "oracular",
        "25.04" => "plucky",
        "25.10" => "questing",
        other => return Err(invalid(format!("no series known for Ubuntu {other}"))),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_known_base_maps_to_series() {
        let table = [
            ("ubuntu@14.04", "trusty"),
            ("ubuntu@16.04", "xenial"),
            ("ubuntu@18.04", "bionic"),
            ("ubuntu@20.04", "focal"),
            ("ubuntu@22.04", "jammy"),
            ("ubuntu@24.04", "noble"),
            ("ubuntu@24.10", "oracular"),
            ("ubuntu@25.04", "plucky"),
            ("ubuntu@25.10", "questing"),
        ];
        for (base, series) in table {
            assert_eq!(base_to_series(base).unwrap(), series, "{base}");
        }
    }

    #[test]
    fn foreign_or_unknown_base_is_invalid() {
        for base in ["centos@8", "ubuntu@12.04", "jammy"] {
            assert!(
                matches!(base_to_series(base), Err(Error::InvalidBase { .. })),
                "{base}"
            );
        }
    }

    #[test]
    fn config_values_render_for_cli_and_yaml() {
        let config: Config = [
            ("x".to_owned(), true.into()),
            ("y".to_owned(), 1.into()),
            ("z".to_owned(), "ss".into()),
            ("w".to_owned(), 2.0.into()),
        ]
        .into();

        let cli: Vec<String> = config.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(cli, ["w=2.0", "x=true", "y=1", "z=ss"]);
        assert_eq!(
            serde_yaml::to_string(&config).unwrap(),
            "w: 2.0\nx: true\ny: 1\nz: ss\n"
        );
    }

    #[test]
    fn bind_renders_space_or_pairs() {
        assert_eq!(Bind::Space("alpha".into()).to_string(), "alpha");
        let map = [("db".to_owned(), "internal".to_owned()), ("web".to_owned(), "public".to_owned())];
        assert_eq!(Bind::Endpoints(map.into()).to_string(), "db=internal web=public");
    }

    #[test]
    fn seconds_keep_fractions() {
        assert_eq!(format_seconds(Duration::from_millis(1)), "0.001s");
        assert_eq!(format_seconds(Duration::from_secs(90)), "90s");
    }
}
