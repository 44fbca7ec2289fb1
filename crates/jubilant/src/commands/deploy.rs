//! Deploy, refresh, and relation handlers.

use jubilant_core::{DeployOptions, Juju, RefreshOptions};

use crate::cli::{DeployArgs, GlobalOpts, IntegrateArgs, RefreshArgs, RemoveRelationArgs};
use crate::error::CliError;

use super::util;

fn done(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

pub fn deploy_options(args: &DeployArgs) -> Result<DeployOptions, CliError> {
    Ok(DeployOptions {
        attach_storage: args.attach_storage.clone(),
        base: args.base.clone(),
        bind: args.bind.as_deref().map(util::parse_bind).transpose()?,
        channel: args.channel.clone(),
        config: util::parse_config(&args.config)?,
        constraints: util::parse_pairs("constraint", &args.constraints)?,
        force: args.force,
        num_units: args.num_units,
        overlays: args.overlays.clone(),
        resources: util::parse_pairs("resource", &args.resources)?,
        revision: args.revision,
        storage: util::parse_pairs("storage", &args.storage)?,
        to: args.to.clone(),
        trust: args.trust,
    })
}

pub fn refresh_options(args: &RefreshArgs) -> Result<RefreshOptions, CliError> {
    Ok(RefreshOptions {
        base: args.base.clone(),
        channel: args.channel.clone(),
        config: util::parse_config(&args.config)?,
        force: args.force,
        path: args.path.clone(),
        resources: util::parse_pairs("resource", &args.resources)?,
        revision: args.revision,
        storage: util::parse_pairs("storage", &args.storage)?,
        trust: args.trust,
    })
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn deploy(juju: &Juju, args: &DeployArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let opts = deploy_options(args)?;
    juju.deploy(&args.charm, args.app.as_deref(), &opts)?;
    done(global, &format!("Deployed {}", args.app.as_deref().unwrap_or(&args.charm)));
    Ok(())
}

pub fn refresh(juju: &Juju, args: &RefreshArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let opts = refresh_options(args)?;
    juju.refresh(&args.app, &opts)?;
    done(global, &format!("Refreshed {}", args.app));
    Ok(())
}

pub fn integrate(juju: &Juju, args: &IntegrateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    juju.integrate(&args.app1, &args.app2, &args.via)?;
    done(global, &format!("Related {} and {}", args.app1, args.app2));
    Ok(())
}

pub fn remove_relation(
    juju: &Juju,
    args: &RemoveRelationArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    juju.remove_relation(&args.app1, &args.app2, args.force)?;
    done(global, &format!("Removed relation {} / {}", args.app1, args.app2));
    Ok(())
}
