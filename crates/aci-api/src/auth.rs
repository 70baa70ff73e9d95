use secrecy::SecretString;
use serde::Serialize;

use crate::wire::WireNode;

/// Login endpoint, relative to the controller base URL.
pub const LOGIN_PATH: &str = "api/aaaLogin.json";

/// Logout endpoint, relative to the controller base URL.
pub const LOGOUT_PATH: &str = "api/aaaLogout.json";

/// Name of the session cookie issued by `aaaLogin`.
pub const SESSION_COOKIE: &str = "APIC-cookie";

/// Username/password pair for `aaaLogin`.
///
/// The password is never printed by `Debug`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Whether the client currently holds a session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Session details reported by the controller on a successful login.
///
/// Built from the `aaaLogin` object's attributes. The token itself stays
/// inside the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginInfo {
    pub user_name: String,
    /// Seconds of idle time before the session must be refreshed.
    pub refresh_timeout_secs: Option<u64>,
    /// Absolute session lifetime in seconds.
    pub maximum_lifetime_secs: Option<u64>,
    pub first_login_time: Option<String>,
    /// Controller node that served the login.
    pub node: Option<String>,
}

impl LoginInfo {
    pub(crate) fn from_login(node: &WireNode, fallback_user: &str) -> Self {
        let seconds = |key: &str| node.attribute(key).and_then(|v| v.parse().ok());
        Self {
            user_name: node
                .attribute("userName")
                .unwrap_or(fallback_user)
                .to_owned(),
            refresh_timeout_secs: seconds("refreshTimeoutSeconds"),
            maximum_lifetime_secs: seconds("maximumLifetimeSeconds"),
            first_login_time: node.attribute("firstLoginTime").map(str::to_owned),
            node: node.attribute("node").map(str::to_owned),
        }
    }
}
