//! Shared configuration for the `aci` CLI and other front ends.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `aci_core::ClientConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use aci_core::{ClientConfig, TlsVerification};

/// Environment variable consulted when a profile names no password source.
pub const PASSWORD_ENV: &str = "ACI_PASSWORD";
/// Environment variable consulted when a profile has no username.
pub const USERNAME_ENV: &str = "ACI_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Names of all profiles, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    15
}

/// A named controller profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host or URL (e.g. "apic1.example.com").
    pub controller: String,

    pub username: Option<String>,

    /// Plaintext password. Prefer `password_env`.
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    /// Custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification. APIC ships a self-signed certificate.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aci", "aci").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aci");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load a config file on top of the built-in defaults. A missing file
/// yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = base_figment(path).extract()?;
    Ok(config)
}

/// Load the full config from the canonical file plus `ACI_` environment
/// variables (`ACI_PROFILES_LAB_CONTROLLER` sets `profiles.lab.controller`).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    debug!(path = %path.display(), "loading config");
    let config: Config = base_figment(&path)
        .merge(Env::prefixed("ACI_").split("_"))
        .extract()?;
    Ok(config)
}

/// Load config, returning the defaults if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

fn base_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize `cfg` to TOML and write it to `path`, creating parent
/// directories as needed.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write `cfg` to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the profile, falling back to `ACI_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Password from the profile's `password_env` variable, then
/// `ACI_PASSWORD`, then the plaintext profile field.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// TLS strategy for a profile: an explicit CA wins over `insecure`, and
/// strict verification applies only when `insecure = false` is spelled out.
pub fn tls_for(profile: &Profile) -> TlsVerification {
    match (&profile.ca_cert, profile.insecure) {
        (Some(ca), _) => TlsVerification::CustomCa(ca.clone()),
        (None, Some(false)) => TlsVerification::SystemDefaults,
        (None, _) => TlsVerification::DangerAcceptInvalid,
    }
}

/// Build a `ClientConfig` from a profile, with no command-line overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let config = ClientConfig::new(&profile.controller, username, password).map_err(|e| {
        ConfigError::Validation {
            field: "controller".into(),
            reason: e.to_string(),
        }
    })?;

    let mut config = config.with_tls(tls_for(profile));
    if let Some(secs) = profile.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn lab() -> Profile {
        Profile {
            controller: "apic1.lab.example.com".into(),
            username: Some("admin".into()),
            password: Some("plain".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.defaults.timeout, 15);
    }

    #[test]
    fn profiles_are_read_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
controller = "apic1.lab.example.com"
username = "admin"
password_env = "LAB_APIC_PASSWORD"
insecure = true
timeout = 30
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 15);
        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.password_env.as_deref(), Some("LAB_APIC_PASSWORD"));
        assert_eq!(lab.timeout, Some(30));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "profiles = 3").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), lab());

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn plaintext_password_is_the_last_resort() {
        let mut profile = lab();
        profile.password_env = Some("ACI_CONFIG_TEST_UNSET_VARIABLE".into());
        if std::env::var(PASSWORD_ENV).is_err() {
            let pw = resolve_password(&profile, "lab").unwrap();
            assert_eq!(pw.expose_secret(), "plain");
        }
    }

    #[test]
    fn no_password_source_is_an_error() {
        let mut profile = lab();
        profile.password = None;
        if std::env::var(PASSWORD_ENV).is_err() {
            assert!(matches!(
                resolve_password(&profile, "lab"),
                Err(ConfigError::NoCredentials { .. })
            ));
        }
    }

    #[test]
    fn tls_follows_profile() {
        let mut profile = lab();
        assert_eq!(tls_for(&profile), TlsVerification::DangerAcceptInvalid);
        profile.insecure = Some(false);
        assert_eq!(tls_for(&profile), TlsVerification::SystemDefaults);
        profile.ca_cert = Some("/etc/apic-ca.pem".into());
        assert_eq!(
            tls_for(&profile),
            TlsVerification::CustomCa("/etc/apic-ca.pem".into())
        );
    }

    #[test]
    fn profile_becomes_client_config() {
        let mut profile = lab();
        profile.timeout = Some(42);
        if std::env::var(PASSWORD_ENV).is_err() {
            let cfg = profile_to_client_config(&profile, "lab").unwrap();
            assert_eq!(cfg.url.as_str(), "https://apic1.lab.example.com/");
            assert_eq!(cfg.username, "admin");
            assert_eq!(cfg.timeout, Duration::from_secs(42));
        }
    }

    #[test]
    fn empty_controller_is_rejected() {
        let mut profile = lab();
        profile.controller = String::new();
        if std::env::var(PASSWORD_ENV).is_err() {
            assert!(matches!(
                profile_to_client_config(&profile, "lab"),
                Err(ConfigError::Validation { .. })
            ));
        }
    }
}
