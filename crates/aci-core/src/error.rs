// ── Core error types ──
//
// Caller-facing errors from aci-core. Validation and decode failures are
// local; everything that crossed the network arrives through
// `From<aci_api::Error>`, which keeps the controller's response attached.

use aci_api::ApiError;
use thiserror::Error;

/// Local rejection of an object or identity chain. Raised before any
/// request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid node id {value}: must be between 101 and 4000")]
    NodeId { value: String },

    #[error("invalid pod id {value}: must be between 0 and 255")]
    PodId { value: String },

    #[error("invalid serial number '{value}': 1-16 alphanumeric characters")]
    Serial { value: String },

    #[error("invalid node role '{value}': expected leaf or spine")]
    Role { value: String },

    #[error("invalid {class} name '{value}'")]
    Name { class: &'static str, value: String },

    #[error("invalid {class} description '{value}'")]
    Description { class: &'static str, value: String },

    #[error("{child} cannot be placed under {parent}")]
    Nesting { parent: String, child: String },

    #[error("{class} needs a parent object to resolve its DN")]
    MissingAncestor { class: String },

    #[error("duplicate object {dn}")]
    Duplicate { dn: String },

    #[error("ancestor {dn} is marked deleted")]
    DeletedAncestor { dn: String },

    #[error("no action given for the target object")]
    MissingAction,

    #[error("no objects to submit")]
    EmptyBatch,

    #[error("several objects need a shared parent to be submitted together")]
    BatchWithoutParent,
}

/// A response tree that does not match the expected object shape.
/// No partially decoded object is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    UnexpectedClass { expected: String, found: String },

    #[error("{class} is missing attribute '{attribute}'")]
    MissingAttribute { class: String, attribute: String },

    #[error("{class} has invalid attribute '{attribute}': {source}")]
    InvalidAttribute {
        class: String,
        attribute: String,
        #[source]
        source: ValidationError,
    },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] DecodeError),

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        message: String,
        /// The controller's answer, when there was one.
        response: Option<Box<ApiError>>,
    },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },

    // ── Controller errors ────────────────────────────────────────────
    #[error("{0}")]
    Api(Box<ApiError>),

    /// Vendor code 107: node identity already discovered or decommissioned.
    #[error("Identity conflict: {0}")]
    IdentityConflict(Box<ApiError>),

    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The controller response behind this error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) | Self::IdentityConflict(e) => Some(e),
            Self::AuthenticationFailed { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    pub fn is_identity_conflict(&self) -> bool {
        matches!(self, Self::IdentityConflict(_))
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aci_api::Error> for CoreError {
    fn from(err: aci_api::Error) -> Self {
        match err {
            aci_api::Error::LoginRejected(e) => CoreError::AuthenticationFailed {
                message: e
                    .text()
                    .map_or_else(|| format!("HTTP {}", e.status), str::to_owned),
                response: Some(e),
            },
            aci_api::Error::SessionExpired(e) => CoreError::AuthenticationFailed {
                message: "session expired or unauthorized -- log in again".into(),
                response: Some(e),
            },
            aci_api::Error::MissingSessionCookie => CoreError::AuthenticationFailed {
                message: "controller returned no session cookie".into(),
                response: None,
            },
            aci_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Transport {
                        reason: e.to_string(),
                    }
                }
            }
            aci_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aci_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            aci_api::Error::Api(e) if e.is_identity_conflict() => CoreError::IdentityConflict(e),
            aci_api::Error::Api(e) => CoreError::Api(e),
            aci_api::Error::Deserialization { message, body } => {
                CoreError::Deserialization { message, body }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aci_api::error::decode_error;

    fn rejected(url: &str, status: u16, code: &str, text: &str) -> ApiError {
        let body = format!(
            r#"{{"imdata":[{{"error":{{"attributes":{{"code":"{code}","text":"{text}"}}}}}}]}}"#
        );
        decode_error("POST", url, status, body)
    }

    #[test]
    fn code_107_maps_to_identity_conflict() {
        let api = rejected(
            "https://apic/api/node/mo/uni/fabric/outofsvc.json",
            400,
            "107",
            "already discovered",
        );
        let err = CoreError::from(aci_api::Error::Api(Box::new(api)));
        assert!(err.is_identity_conflict());
        assert_eq!(err.api_error().and_then(ApiError::code), Some("107"));
    }

    #[test]
    fn other_codes_stay_api_errors() {
        let api = rejected("https://apic/api/node/mo/uni.json", 400, "122", "bad class");
        let err = CoreError::from(aci_api::Error::Api(Box::new(api)));
        assert!(matches!(err, CoreError::Api(_)));
        assert!(err.to_string().contains("bad class (122)"));
    }

    #[test]
    fn login_rejection_keeps_response() {
        let api = rejected(
            "https://apic/api/aaaLogin.json",
            401,
            "401",
            "Username or password is incorrect",
        );
        let err = CoreError::from(aci_api::Error::LoginRejected(Box::new(api)));
        let CoreError::AuthenticationFailed { message, response } = err else {
            panic!("expected AuthenticationFailed");
        };
        assert_eq!(message, "Username or password is incorrect");
        assert_eq!(response.map(|r| r.status), Some(401));
    }
}
