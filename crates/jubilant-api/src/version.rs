// Juju CLI version detection and generation routing.
//
// The CLI version is read once (`juju version --format json`, which prints a
// JSON string such as "3.6.8-genericlinux-amd64") and decides which dialect
// every later command uses. Anything below major 3 is the legacy (2.9) CLI.

use std::fmt;
use std::str::FromStr;

use crate::current::Current;
use crate::dialect::Dialect;
use crate::error::Error;
use crate::legacy::Legacy;

/// The two incompatible CLI/schema generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// Juju 2.9: `--series`, `relate`, `run-action`, flat task results.
    Legacy,
    /// Juju 3.x: `--base`, `integrate`, `run`, hyphenated task results.
    Current,
}

impl Generation {
    pub fn from_major(major: u32) -> Self {
        if major < 3 { Self::Legacy } else { Self::Current }
    }

    /// Argument builders and result lookup for this generation.
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Legacy => &Legacy,
            Self::Current => &Current,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy (2.9)",
            Self::Current => "current (3.x)",
        })
    }
}

/// A detected or pinned CLI version, e.g. `2.9.52` or `3.6.8-genericlinux-amd64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CliVersion {
    raw: String,
    major: u32,
}

impl CliVersion {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn generation(&self) -> Generation {
        Generation::from_major(self.major)
    }

    /// Decode the stdout of `juju version --format json`.
    pub fn from_json(stdout: &str) -> Result<Self, Error> {
        let raw: String =
            serde_json::from_str(stdout.trim()).map_err(|e| Error::deserialization(&e, stdout))?;
        raw.parse()
    }
}

impl FromStr for CliVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let major = raw
            .split('.')
            .next()
            .and_then(|m| m.parse::<u32>().ok())
            .ok_or_else(|| Error::InvalidVersion(s.to_owned()))?;
        Ok(Self {
            raw: raw.to_owned(),
            major,
        })
    }
}

impl fmt::Display for CliVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
