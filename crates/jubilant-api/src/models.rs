// Raw task payloads from `run`/`run-action`/`exec`.
//
// One entry of the per-target result map (current) or result array (legacy
// exec). The reserved return-code/stdout/stderr keys vary by generation and
// are pulled out later using the dialect's key table.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A single unit's or machine's task result, as printed by Juju.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTask {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub status: Option<String>,
    pub results: Option<Map<String, Value>>,
    pub message: Option<String>,
    pub log: Option<Vec<String>>,
    /// Everything else: `UnitId`, `timing`, and the flat `ReturnCode`/`Stdout`
    /// keys of old-style exec entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawTask {
    /// First of `keys` found in `results`, else at the top level.
    pub fn reserved(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|k| self.results.as_ref().and_then(|r| r.get(*k)))
            .or_else(|| keys.iter().find_map(|k| self.extra.get(*k)))
    }

    /// String-valued top-level field, e.g. the `unit` an exec entry belongs to.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
