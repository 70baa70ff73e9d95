// ── Runtime connection configuration ──
//
// Describes how to reach one controller. Never touches disk: the CLI
// (or any other caller) builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use aci_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. APIC ships with a self-signed certificate.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller URL (e.g. `https://apic1.example.com`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub connect_timeout: Duration,
    /// Overall budget for one request.
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub proxy: Option<Url>,
}

impl ClientConfig {
    /// Build a config for `host`, which may be a bare hostname or a URL.
    /// A missing scheme means `https`.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, CoreError> {
        let defaults = TransportConfig::default();
        Ok(Self {
            url: parse_host(host)?,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            connect_timeout: defaults.connect_timeout,
            timeout: defaults.timeout,
            pool_max_idle_per_host: defaults.pool_max_idle_per_host,
            proxy: None,
        })
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsVerification) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            connect_timeout: self.connect_timeout,
            timeout: self.timeout,
            pool_max_idle_per_host: self.pool_max_idle_per_host,
            proxy: self.proxy.clone(),
            ..TransportConfig::default()
        }
    }
}

fn parse_host(host: &str) -> Result<Url, CoreError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(CoreError::Config {
            message: "controller host is empty".into(),
        });
    }
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    Url::parse(&raw).map_err(|e| CoreError::Config {
        message: format!("invalid controller URL '{host}': {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pw() -> SecretString {
        SecretString::from("pw")
    }

    #[test]
    fn bare_host_gets_https() {
        let config = ClientConfig::new("apic1.example.com", "admin", pw()).unwrap();
        assert_eq!(config.url.as_str(), "https://apic1.example.com/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let config = ClientConfig::new("http://10.0.0.1:8080", "admin", pw()).unwrap();
        assert_eq!(config.url.scheme(), "http");
        assert_eq!(config.url.port(), Some(8080));
    }

    #[test]
    fn empty_host_is_a_config_error() {
        assert!(matches!(
            ClientConfig::new("  ", "admin", pw()),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn transport_carries_timeouts_and_tls() {
        let config = ClientConfig::new("apic", "admin", pw())
            .unwrap()
            .with_tls(TlsVerification::SystemDefaults)
            .with_timeout(Duration::from_secs(3));
        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::System));
        assert_eq!(transport.timeout, Duration::from_secs(3));
        assert_eq!(transport.connect_timeout, Duration::from_secs(5));
    }
}
