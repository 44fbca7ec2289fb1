//! Wait handler: poll status until the requested condition holds.

use tracing::info;

use jubilant_core::{
    Juju, Predicate, Status, WaitOptions, all_active, all_agents_idle, all_blocked, all_error,
    all_maintenance, all_waiting, any_active, any_blocked, any_error, any_maintenance,
    any_waiting,
};

use crate::cli::{GlobalOpts, StatusKind, WaitArgs, WaitFor};
use crate::error::CliError;
use crate::output;

use super::status::status_table;

type Check = fn(&Status, &[&str]) -> bool;

fn ready_check(ready: WaitFor) -> (&'static str, Check) {
    match ready {
        WaitFor::Active => ("all_active", all_active),
        WaitFor::Blocked => ("all_blocked", all_blocked),
        WaitFor::Error => ("all_error", all_error),
        WaitFor::Maintenance => ("all_maintenance", all_maintenance),
        WaitFor::Waiting => ("all_waiting", all_waiting),
        WaitFor::Idle => ("all_agents_idle", all_agents_idle),
    }
}

fn error_check(kind: StatusKind) -> (&'static str, Check) {
    match kind {
        StatusKind::Active => ("any_active", any_active),
        StatusKind::Blocked => ("any_blocked", any_blocked),
        StatusKind::Error => ("any_error", any_error),
        StatusKind::Maintenance => ("any_maintenance", any_maintenance),
        StatusKind::Waiting => ("any_waiting", any_waiting),
    }
}

pub fn handle(juju: &Juju, args: &WaitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let apps: Vec<&str> = args.apps.iter().map(String::as_str).collect();

    let selected: &[&str] = &apps;

    let (ready_name, ready) = ready_check(args.ready);
    let error = args.error_on.map(|kind| {
        let (name, check) = error_check(kind);
        Predicate::named(name, move |status: &Status| check(status, selected))
    });

    let opts = WaitOptions {
        error,
        delay: args.delay.into(),
        timeout: args.timeout.map(Into::into),
        successes: args.successes,
    };
    info!(
        ready = ready_name,
        error = ?opts.error.as_ref().map(Predicate::name),
        apps = ?selected,
        "waiting"
    );

    let status = juju.wait(|status: &Status| ready(status, selected), &opts)?;

    let color = output::should_color(global.color);
    let out = output::render(global.output, &status, |s| status_table(s, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SNAPPASS: &str = include_str!("../../../jubilant-core/tests/fixtures/snappass.json");

    #[test]
    fn checks_match_their_names() {
        let status = Status::from_json(SNAPPASS).unwrap();

        let (name, check) = ready_check(WaitFor::Active);
        assert_eq!(name, "all_active");
        assert!(check(&status, &["snappass-test"]));

        let (name, check) = ready_check(WaitFor::Idle);
        assert_eq!(name, "all_agents_idle");
        assert!(check(&status, &[]));

        let (name, check) = error_check(StatusKind::Error);
        assert_eq!(name, "any_error");
        assert!(!check(&status, &[]));
    }
}
