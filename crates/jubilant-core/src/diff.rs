// ── Status change reporting ──
//
// Flattens a snapshot into sorted `path = value` lines (gron style) and
// diffs two snapshots line by line. Used by the wait loop to log only what
// changed between polls.

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

use crate::model::Status;

/// Flatten `status` into sorted `path = json-value` lines.
///
/// Paths look like `.model.name`, `.apps["snappass-test"].scale`,
/// `.machines["0"].ip_addresses[1]`.
pub fn flatten(status: &Status) -> Vec<String> {
    let mut lines = Vec::new();
    match serde_json::to_value(status) {
        Ok(value) => walk(&mut String::new(), &value, &mut lines),
        Err(e) => lines.push(format!("<unserializable status: {e}>")),
    }
    lines.sort();
    lines
}

fn walk(path: &mut String, value: &Value, out: &mut Vec<String>) {
    let mark = path.len();
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                push_key(path, key);
                walk(path, child, out);
                path.truncate(mark);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                path.push_str(&format!("[{i}]"));
                walk(path, child, out);
                path.truncate(mark);
            }
        }
        leaf => {
            let field = if path.is_empty() { "." } else { path.as_str() };
            out.push(format!("{field} = {leaf}"));
        }
    }
}

fn push_key(path: &mut String, key: &str) {
    let ident = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ident {
        path.push('.');
        path.push_str(key);
    } else {
        path.push_str(&format!("[{}]", Value::from(key)));
    }
}

/// Lines that change on every poll without meaning anything.
fn is_noise(line: &str) -> bool {
    let field = line.split_once(" = ").map_or(line, |(field, _)| field);
    field == ".controller.timestamp" || field.ends_with(".since")
}

/// Line diff between two snapshots, noise removed. `None` diffs against nothing.
///
/// Only changed lines are returned, prefixed `- ` or `+ `. Identical
/// snapshots give an empty string.
pub fn status_diff(old: Option<&Status>, new: &Status) -> String {
    let old_lines: Vec<String> = old
        .map(flatten)
        .unwrap_or_default()
        .into_iter()
        .filter(|l| !is_noise(l))
        .collect();
    let new_lines: Vec<String> = flatten(new).into_iter().filter(|l| !is_noise(l)).collect();

    let old_refs: Vec<&str> = old_lines.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new_lines.iter().map(String::as_str).collect();

    TextDiff::from_slices(&old_refs, &new_refs)
        .iter_all_changes()
        .filter_map(|change| match change.tag() {
            ChangeTag::Delete => Some(format!("- {}", change.value())),
            ChangeTag::Insert => Some(format!("+ {}", change.value())),
            ChangeTag::Equal => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AppStatus, StatusInfo};

    fn status() -> Status {
        let mut status = Status::default();
        status.model.name = "mdl".into();
        status.controller.timestamp = "12:04:55+13:00".into();
        status.apps.insert(
            "snappass-test".into(),
            AppStatus {
                app_status: StatusInfo {
                    current: "active".into(),
                    since: "24 Feb 2025 12:03:17+13:00".into(),
                    ..StatusInfo::default()
                },
                ..AppStatus::default()
            },
        );
        status
    }

    #[test]
    fn paths_are_gron_style() {
        let lines = flatten(&status());
        assert!(lines.contains(&r#".model.name = "mdl""#.to_owned()));
        assert!(lines.contains(&r#".apps["snappass-test"].app_status.current = "active""#.to_owned()));
        assert!(lines.contains(&".machines = {}".to_owned()));
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[test]
    fn identical_snapshots_have_empty_diff() {
        let s = status();
        assert_eq!(status_diff(Some(&s), &s), "");
    }

    #[test]
    fn noise_is_filtered() {
        let old = status();
        let mut new = old.clone();
        new.controller.timestamp = "12:05:00+13:00".into();
        new.apps.get_mut("snappass-test").unwrap().app_status.since = "later".into();
        assert_eq!(status_diff(Some(&old), &new), "");
    }

    #[test]
    fn changed_field_shows_both_sides() {
        let old = status();
        let mut new = old.clone();
        new.apps.get_mut("snappass-test").unwrap().app_status.current = "blocked".into();

        assert_eq!(
            status_diff(Some(&old), &new),
            "- .apps[\"snappass-test\"].app_status.current = \"active\"\n\
             + .apps[\"snappass-test\"].app_status.current = \"blocked\""
        );
    }

    #[test]
    fn first_snapshot_is_all_additions() {
        let diff = status_diff(None, &status());
        assert!(!diff.is_empty());
        assert!(diff.lines().all(|l| l.starts_with("+ ")));
        assert!(!diff.contains("timestamp"));
    }
}
