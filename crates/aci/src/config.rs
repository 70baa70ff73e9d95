//! CLI configuration: thin wrapper around `aci_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--controller,
//! --username, --password, --insecure, --timeout) on top of the profile.

use std::time::Duration;

use secrecy::SecretString;

use aci_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use aci_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password, resolve_username,
    save_config, tls_for,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

pub fn profile_not_found(name: String, config: &Config) -> CliError {
    let available = config.profile_names();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Build a `ClientConfig` from the config file, the active profile and
/// command-line overrides. Flags win over the profile.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() {
        return Err(profile_not_found(profile_name, &cfg));
    }

    let controller = global
        .controller
        .clone()
        .or_else(|| profile.map(|p| p.controller.clone()))
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let username = match (&global.username, profile) {
        (Some(user), _) => user.clone(),
        (None, Some(p)) => resolve_username(p, &profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    let password = match (&global.password, profile) {
        (Some(pw), _) => SecretString::from(pw.clone()),
        (None, Some(p)) => resolve_password(p, &profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(p) = profile {
        tls_for(p)
    } else if cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    tracing::debug!(profile = %profile_name, %controller, "resolved controller settings");

    Ok(ClientConfig::new(&controller, username, password)?
        .with_tls(tls)
        .with_timeout(Duration::from_secs(timeout)))
}
