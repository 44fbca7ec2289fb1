//! Status and version handlers.

use tabled::Tabled;

use jubilant_core::{AppStatus, Generation, Juju, Status};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "App")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Charm")]
    charm: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Rev")]
    rev: i64,
    #[tabled(rename = "Message")]
    message: String,
}

impl AppRow {
    fn new(name: &str, app: &AppStatus, color: bool) -> Self {
        let charm = if app.charm_name.is_empty() {
            app.charm.clone()
        } else {
            app.charm_name.clone()
        };
        Self {
            name: name.to_owned(),
            status: output::paint_status(&app.app_status.current, color),
            units: app.units.len(),
            charm,
            channel: app.charm_channel.clone(),
            rev: app.charm_rev,
            message: app.app_status.message.clone(),
        }
    }
}

/// Model header plus one row per application.
pub fn status_table(status: &Status, color: bool) -> String {
    let header = format!(
        "Model {} on {} (agent {})",
        status.model.name, status.model.cloud, status.model.version
    );
    if status.apps.is_empty() {
        return format!("{header}\n\nModel has no applications.");
    }
    let rows: Vec<AppRow> = status
        .apps
        .iter()
        .map(|(name, app)| AppRow::new(name, app, color))
        .collect();
    format!("{header}\n{}", output::render_table(&rows))
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle(juju: &Juju, args: &StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut status = juju.status()?;
    if !args.apps.is_empty() {
        status.apps.retain(|name, _| args.apps.contains(name));
    }

    let color = output::should_color(global.color);
    let out = output::render(global.output, &status, |s| status_table(s, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn version(juju: &Juju, global: &GlobalOpts) -> Result<(), CliError> {
    let info = serde_json::json!({
        "version": juju.version().as_str(),
        "major": juju.cli_major_version(),
        "generation": match juju.generation() {
            Generation::Legacy => "legacy",
            Generation::Current => "current",
        },
        "cli-binary": juju.cli_binary().display().to_string(),
    });
    let out = output::render(global.output, &info, |_| {
        format!("juju {}, {} dialect", juju.version(), juju.generation())
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SNAPPASS: &str = include_str!("../../../jubilant-core/tests/fixtures/snappass.json");
    const MINIMAL: &str = include_str!("../../../jubilant-core/tests/fixtures/minimal.json");

    #[test]
    fn table_lists_apps() {
        let status = Status::from_json(SNAPPASS).unwrap();
        let table = status_table(&status, false);

        assert!(table.starts_with("Model tt on "), "{table}");
        assert!(table.contains("snappass-test"), "{table}");
        assert!(table.contains("active"), "{table}");
    }

    #[test]
    fn empty_model_says_so() {
        let status = Status::from_json(MINIMAL).unwrap();
        assert!(status_table(&status, false).ends_with("Model has no applications."));
    }
}
