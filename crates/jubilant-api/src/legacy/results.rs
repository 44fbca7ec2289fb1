// Result lookup for 2.9 output shapes.

use crate::dialect::{take_entry, task_map};
use crate::error::Error;
use crate::models::RawTask;
use crate::options::ExecTarget;

/// `run-action` keys results by unit tag: `mysql/0` → `unit-mysql-0`.
pub(super) fn find_action(stdout: &str, unit: &str) -> Result<Option<RawTask>, Error> {
    let tag = format!("unit-{}", unit.replace('/', "-"));
    Ok(take_entry(task_map(stdout)?, &tag, unit))
}

/// `exec` prints an array; each entry names its unit or machine.
pub(super) fn find_exec(stdout: &str, target: &ExecTarget) -> Result<Option<RawTask>, Error> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    let entries: Vec<RawTask> =
        serde_json::from_str(stdout).map_err(|e| Error::deserialization(&e, stdout))?;

    let keys: &[&str] = match target {
        ExecTarget::Machine(_) => &["machine", "MachineId"],
        ExecTarget::Unit(_) => &["unit", "UnitId"],
    };
    Ok(entries
        .into_iter()
        .find(|entry| keys.iter().any(|k| entry.field(k) == Some(target.id()))))
}
