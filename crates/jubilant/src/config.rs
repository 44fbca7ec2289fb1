//! Global-flag overrides on top of `jubilant-config`.
//!
//! Precedence: command-line flag (or its `JUBILANT_*` env var), then the
//! selected profile, then `[defaults]`.

use jubilant_config::{Config, ConfigError, config_path, load_config, resolve};
use jubilant_core::JujuConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the client settings for this invocation.
pub fn build_juju_config(global: &GlobalOpts) -> Result<JujuConfig, CliError> {
    let cfg = load_config()?;
    let resolved = resolve(&cfg, global.profile.as_deref())
        .map_err(|err| profile_error(err, &cfg))?;
    Ok(apply_overrides(resolved, global))
}

/// Layer explicit flags over a resolved profile.
pub fn apply_overrides(mut config: JujuConfig, global: &GlobalOpts) -> JujuConfig {
    if let Some(ref model) = global.model {
        config.model = Some(model.clone());
    }
    if let Some(ref binary) = global.cli_binary {
        config.cli_binary.clone_from(binary);
    }
    if let Some(ref version) = global.cli_version {
        config.cli_version = Some(version.clone());
    }
    if let Some(timeout) = global.wait_timeout {
        config.wait_timeout = timeout.into();
    }
    config
}

fn profile_error(err: ConfigError, cfg: &Config) -> CliError {
    match err {
        ConfigError::ProfileNotFound { profile } => {
            let available = if cfg.profiles.is_empty() {
                "(none)".to_owned()
            } else {
                cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
            };
            CliError::ProfileNotFound {
                name: profile,
                available,
                path: config_path().display().to_string(),
            }
        }
        other => other.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["jubilant"];
        argv.extend_from_slice(args);
        argv.push("version");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let base = JujuConfig::default().with_model("from-profile");
        let opts = global(&[
            "--model",
            "ctl:flagged",
            "--cli-binary",
            "/snap/bin/juju",
            "--cli-version",
            "2.9.51",
            "--wait-timeout",
            "90s",
        ]);

        let merged = apply_overrides(base, &opts);
        assert_eq!(merged.model.as_deref(), Some("ctl:flagged"));
        assert_eq!(merged.cli_binary, PathBuf::from("/snap/bin/juju"));
        assert_eq!(merged.cli_version.as_deref(), Some("2.9.51"));
        assert_eq!(merged.wait_timeout, Duration::from_secs(90));
    }

    #[test]
    fn absent_flags_keep_profile() {
        let base = JujuConfig::default().with_model("from-profile");
        let merged = apply_overrides(base.clone(), &global(&[]));
        assert_eq!(merged, base);
    }

    #[test]
    fn missing_profile_lists_available() {
        let mut cfg = Config::default();
        cfg.profiles.insert("ci".into(), jubilant_config::Profile::default());

        let err = profile_error(
            ConfigError::ProfileNotFound {
                profile: "prod".into(),
            },
            &cfg,
        );
        match err {
            CliError::ProfileNotFound {
                name, available, ..
            } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "ci");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
