//! Shared argument parsing for command handlers.

use std::collections::BTreeMap;

use serde_json::Value;

use jubilant_core::{Bind, Config, ConfigValue};

use crate::error::CliError;

/// Split `key=value`, rejecting an empty key or a missing `=`.
pub fn parse_pair(field: &str, raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(CliError::Validation {
            field: field.into(),
            reason: format!("expected key=value, got '{raw}'"),
        }),
    }
}

pub fn parse_pairs(field: &str, raw: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    raw.iter().map(|item| parse_pair(field, item)).collect()
}

/// Charm config values: booleans and numbers keep their type.
pub fn parse_config(raw: &[String]) -> Result<Config, CliError> {
    raw.iter()
        .map(|item| {
            let (key, value) = parse_pair("config", item)?;
            Ok((key, config_value(&value)))
        })
        .collect()
}

fn config_value(raw: &str) -> ConfigValue {
    if let Ok(b) = raw.parse::<bool>() {
        return ConfigValue::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return ConfigValue::Int(i);
    }
    if raw.contains('.') {
        if let Ok(x) = raw.parse::<f64>() {
            return ConfigValue::Float(x);
        }
    }
    ConfigValue::String(raw.to_owned())
}

/// Action params: each value is JSON if it parses, else a plain string.
pub fn parse_params(raw: &[String]) -> Result<BTreeMap<String, Value>, CliError> {
    raw.iter()
        .map(|item| {
            let (key, value) = parse_pair("param", item)?;
            let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
            Ok((key, parsed))
        })
        .collect()
}

/// `--bind` takes one space, or whitespace-separated `endpoint=space` pairs.
pub fn parse_bind(raw: &str) -> Result<Bind, CliError> {
    if !raw.contains('=') {
        return Ok(Bind::Space(raw.to_owned()));
    }
    let pairs = raw
        .split_whitespace()
        .map(|item| parse_pair("bind", item))
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(Bind::Endpoints(pairs))
}
