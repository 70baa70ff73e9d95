use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::MitResponse;

/// Vendor code returned when a node identity is still bound to a discovered
/// (or already decommissioned) switch.
///
/// "Can't remove node identity policy - Node TEP-1-102 is already
/// discovered. Please decommission first."
pub const IDENTITY_CONFLICT_CODE: &str = "107";

/// Top-level error type for the `aci-api` crate.
///
/// Covers every failure mode of the transport: session handling,
/// HTTP/TLS, controller error envelopes, and response decoding.
/// `aci-core` maps these into caller-facing variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The login request was answered with a non-2xx status.
    #[error("Login rejected: {0}")]
    LoginRejected(Box<ApiError>),

    /// A request was refused with 401/403; the stored cookie is dropped.
    #[error("Session expired or unauthorized: {0}")]
    SessionExpired(Box<ApiError>),

    /// Login returned 2xx but neither a cookie nor a token.
    #[error("Login succeeded but the controller returned no session cookie")]
    MissingSessionCookie,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate loading error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response, decoded from the `imdata` error envelope when possible.
    #[error("API error: {0}")]
    Api(Box<ApiError>),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for login rejections and expired sessions.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::LoginRejected(_) | Self::SessionExpired(_) | Self::MissingSessionCookie
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// The decoded error response, if the controller answered at all.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::LoginRejected(e) | Self::SessionExpired(e) | Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Extract the vendor error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        self.api_error().and_then(ApiError::code)
    }
}

// ── Error envelope ───────────────────────────────────────────────────

/// One `{code, text}` pair from the controller's error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub text: String,
}

/// Classification of a decoded error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Vendor code 107: the node identity is already discovered or
    /// decommissioned. Usually safe to treat as idempotent success.
    IdentityConflict,
    /// Any other vendor code.
    Vendor,
    /// The body was not a valid error envelope.
    Unrecognized,
}

/// A non-2xx response from the controller.
///
/// The raw body is kept alongside the decoded pairs so callers can
/// inspect what the controller actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Every pair from the envelope, in order. The first is the primary error.
    pub errors: Vec<ErrorDetail>,
    pub body: String,
}

impl ApiError {
    pub fn primary(&self) -> Option<&ErrorDetail> {
        self.errors.first()
    }

    pub fn code(&self) -> Option<&str> {
        self.primary().map(|e| e.code.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.primary().map(|e| e.text.as_str())
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self.code() {
            Some(IDENTITY_CONFLICT_CODE) => ApiErrorKind::IdentityConflict,
            Some(_) => ApiErrorKind::Vendor,
            None => ApiErrorKind::Unrecognized,
        }
    }

    pub fn is_identity_conflict(&self) -> bool {
        self.kind() == ApiErrorKind::IdentityConflict
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary() {
            Some(e) => write!(
                f,
                "{} {}: {} {} ({})",
                self.method, self.url, self.status, e.text, e.code
            ),
            None => write!(f, "{} {}: HTTP {}", self.method, self.url, self.status),
        }
    }
}

impl std::error::Error for ApiError {}

/// Decode a non-2xx response body into an [`ApiError`].
///
/// The envelope is `{"imdata": [{"error": {"attributes": {"code", "text"}}}]}`.
/// Anything else (HTML error pages, truncated JSON, empty bodies) yields an
/// error that carries only the status, method and URL.
pub fn decode_error(method: &str, url: &str, status: u16, body: String) -> ApiError {
    let errors = serde_json::from_str::<MitResponse>(&body)
        .map(|envelope| {
            envelope
                .objects("error")
                .map(|node| ErrorDetail {
                    code: node.attribute("code").unwrap_or_default().to_owned(),
                    text: node.attribute("text").unwrap_or_default().to_owned(),
                })
                .collect()
        })
        .unwrap_or_default();

    ApiError {
        method: method.to_owned(),
        url: url.to_owned(),
        status,
        errors,
        body,
    }
}
