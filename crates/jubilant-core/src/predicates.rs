// ── Status predicates ──
//
// Ready/error checks for `Juju::wait`. Each takes a snapshot and an app
// filter; an empty filter means every app in the snapshot. `all_*` is false
// for an app missing from the snapshot; `any_*` skips it.

use crate::model::Status;

fn selected<'a>(status: &'a Status, apps: &'a [&'a str]) -> Vec<&'a str> {
    if apps.is_empty() {
        status.apps.keys().map(String::as_str).collect()
    } else {
        apps.to_vec()
    }
}

fn all_statuses_are(expected: &str, status: &Status, apps: &[&str]) -> bool {
    selected(status, apps).into_iter().all(|app| {
        status.apps.get(app).is_some_and(|info| {
            info.app_status.current == expected
                && status
                    .get_units(app)
                    .values()
                    .all(|unit| unit.workload_status.current == expected)
        })
    })
}

fn any_status_is(expected: &str, status: &Status, apps: &[&str]) -> bool {
    selected(status, apps).into_iter().any(|app| {
        status.apps.get(app).is_some_and(|info| {
            info.app_status.current == expected
                || status
                    .get_units(app)
                    .values()
                    .any(|unit| unit.workload_status.current == expected)
        })
    })
}

/// All selected apps and their units are "active".
pub fn all_active(status: &Status, apps: &[&str]) -> bool {
    all_statuses_are("active", status, apps)
}

pub fn all_blocked(status: &Status, apps: &[&str]) -> bool {
    all_statuses_are("blocked", status, apps)
}

pub fn all_error(status: &Status, apps: &[&str]) -> bool {
    all_statuses_are("error", status, apps)
}

pub fn all_maintenance(status: &Status, apps: &[&str]) -> bool {
    all_statuses_are("maintenance", status, apps)
}

pub fn all_waiting(status: &Status, apps: &[&str]) -> bool {
    all_statuses_are("waiting", status, apps)
}

/// Any selected app or one of its units is "active".
pub fn any_active(status: &Status, apps: &[&str]) -> bool {
    any_status_is("active", status, apps)
}

pub fn any_blocked(status: &Status, apps: &[&str]) -> bool {
    any_status_is("blocked", status, apps)
}

/// Any selected app or unit is in "error". The usual `error` predicate for `wait`.
pub fn any_error(status: &Status, apps: &[&str]) -> bool {
    any_status_is("error", status, apps)
}

pub fn any_maintenance(status: &Status, apps: &[&str]) -> bool {
    any_status_is("maintenance", status, apps)
}

pub fn any_waiting(status: &Status, apps: &[&str]) -> bool {
    any_status_is("waiting", status, apps)
}

/// Every unit agent of the selected apps is "idle".
///
/// Looks at the Juju agent status, not the workload status.
pub fn all_agents_idle(status: &Status, apps: &[&str]) -> bool {
    selected(status, apps).into_iter().all(|app| {
        status.apps.contains_key(app)
            && status
                .get_units(app)
                .values()
                .all(|unit| unit.juju_status.current == "idle")
    })
}
