//! Config subcommand handlers. None of these touch juju.

use jubilant_config::{config_path, load_config, render_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::build_juju_config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        ConfigCommand::Show => render_config(&load_config()?)?,
        ConfigCommand::Path => config_path().display().to_string(),
        ConfigCommand::Resolve => {
            let resolved = build_juju_config(global)?;
            let wait_timeout = humantime::format_duration(resolved.wait_timeout).to_string();
            format!(
                "model = {}\ncli_binary = {}\ncli_version = {}\nwait_timeout = {wait_timeout}\ntemp_dir = {}",
                resolved.model.as_deref().unwrap_or("(current)"),
                resolved.cli_binary.display(),
                resolved.cli_version.as_deref().unwrap_or("(detect)"),
                resolved
                    .temp_dir
                    .as_ref()
                    .map_or_else(|| "(system)".to_owned(), |p| p.display().to_string()),
            )
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
