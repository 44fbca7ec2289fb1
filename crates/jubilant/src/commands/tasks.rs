//! Action (`run`) and shell command (`exec`) handlers.

use std::io::{self, Write};

use serde_json::Value;
use tabled::Tabled;

use jubilant_core::{ExecOptions, Juju, Task};

use crate::cli::{ExecArgs, GlobalOpts, OutputFormat, RunArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn task_table(task: &Task) -> String {
    let mut out = String::new();
    if !task.results.is_empty() {
        let rows: Vec<ResultRow> = task
            .results
            .iter()
            .map(|(key, value)| ResultRow {
                key: key.clone(),
                value: match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect();
        out.push_str(&output::render_table(&rows));
    }
    if !task.stdout.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(task.stdout.trim_end());
    }
    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn run(juju: &Juju, args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let params = if args.params.is_empty() {
        None
    } else {
        Some(util::parse_params(&args.params)?)
    };

    let task = juju.run(
        &args.unit,
        &args.action,
        params.as_ref(),
        args.wait.map(Into::into),
    )?;

    let out = output::render(global.output, &task, task_table)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn exec(juju: &Juju, args: &ExecArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let opts = ExecOptions {
        machine: args.machine.clone(),
        unit: args.unit.clone(),
        wait: args.wait.map(Into::into),
    };
    let task = juju.exec(&args.command, args.args.as_slice(), &opts)?;

    if global.output == OutputFormat::Table {
        if !global.quiet {
            io::stdout().lock().write_all(task.stdout.as_bytes())?;
        }
        io::stderr().lock().write_all(task.stderr.as_bytes())?;
        return Ok(());
    }

    let out = output::render(global.output, &task, task_table)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_shows_results_then_stdout() {
        let task = Task {
            results: json!({"backup-id": "b-1", "size": 42})
                .as_object()
                .cloned()
                .unwrap(),
            stdout: "done\n".into(),
            ..Task::default()
        };

        let table = task_table(&task);
        assert!(table.contains("backup-id"), "{table}");
        assert!(table.contains("b-1"), "{table}");
        assert!(table.contains("42"), "{table}");
        assert!(table.ends_with("\ndone"), "{table}");
    }

    #[test]
    fn empty_task_renders_nothing() {
        assert_eq!(task_table(&Task::default()), "");
    }
}
