// APIC HTTP client
//
// Wraps `reqwest::Client` with controller-relative URL construction,
// the session cookie jar, and error-envelope decoding. Login and logout
// live in `session.rs`; typed endpoints are built on top in `aci-core`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::COOKIE;
use reqwest::{Method, StatusCode};
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{Credentials, SessionState};
use crate::error::{Error, decode_error};
use crate::transport::TransportConfig;
use crate::wire::{MitResponse, WireNode};

/// Raw HTTP client for one APIC controller.
///
/// Holds the cookie jar of the current session; its cookies go out on
/// every request. The jar is swapped atomically, so a shared client can
/// be used from concurrent tasks; a login that races another request
/// simply replaces the session for everyone.
pub struct ApicClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: ArcSwapOption<Jar>,
}

impl ApicClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root, e.g. `https://apic1.example.com`.
    /// No request is made until [`login`](Self::login) is called.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
            credentials,
            session: ArcSwapOption::empty(),
        }
    }

    /// The controller base URL (always ending in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn state(&self) -> SessionState {
        if self.session.load().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // ── Session jar ──────────────────────────────────────────────────

    /// Install the jar filled by a successful login.
    pub(crate) fn set_session(&self, jar: Jar) {
        debug!("storing session cookies");
        self.session.store(Some(Arc::new(jar)));
    }

    pub(crate) fn clear_session(&self) {
        if self.session.swap(None).is_some() {
            debug!("session cookies cleared");
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve a controller-relative path such as `api/node/class/fvTenant.json`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a controller-relative path and decode the `imdata` envelope.
    pub async fn get(&self, path: &str) -> Result<MitResponse, Error> {
        self.send(Method::GET, path, None).await
    }

    /// POST a delta tree to a controller-relative path.
    pub async fn post(&self, path: &str, body: &WireNode) -> Result<MitResponse, Error> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Send one request with the current session cookie.
    ///
    /// A 401 or 403 drops the session and yields
    /// [`Error::SessionExpired`]; any other non-2xx status yields
    /// [`Error::Api`]. Nothing is retried.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&WireNode>,
    ) -> Result<MitResponse, Error> {
        let url = self.api_url(path)?;
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), url.clone());
        match self.session.load_full().and_then(|jar| jar.cookies(&url)) {
            Some(mut cookies) => {
                cookies.set_sensitive(true);
                builder = builder.header(COOKIE, cookies);
            }
            None => trace!("no session cookie for {}", url),
        }
        if let Some(body) = body {
            if tracing::enabled!(tracing::Level::TRACE) {
                trace!(
                    body = %serde_json::to_string(body).unwrap_or_default(),
                    "request body"
                );
            }
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        trace!(status = status.as_u16(), len = text.len(), "response received");

        if !status.is_success() {
            let err = Box::new(decode_error(
                method.as_str(),
                url.as_str(),
                status.as_u16(),
                text,
            ));
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                warn!("{} {} refused with {}; session cleared", method, url, status);
                self.clear_session();
                return Err(Error::SessionExpired(err));
            }
            return Err(Error::Api(err));
        }

        parse_response(&text, body.is_some())
    }
}

/// Decode a 2xx body.
///
/// Mutations are accepted with an empty or non-envelope body; the
/// controller has already reported success through the status code.
pub(crate) fn parse_response(text: &str, submitted: bool) -> Result<MitResponse, Error> {
    if submitted && text.trim().is_empty() {
        return Ok(MitResponse::default());
    }
    match serde_json::from_str(text) {
        Ok(response) => Ok(response),
        Err(e) if submitted => {
            debug!(error = %e, "ignoring undecodable mutation response");
            Ok(MitResponse::default())
        }
        Err(e) => {
            let preview: String = text.chars().take(200).collect();
            Err(Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.to_owned(),
            })
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client(base: &str) -> ApicClient {
        ApicClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Credentials::new("admin", SecretString::from("pw")),
        )
    }

    #[test]
    fn api_url_keeps_base_path() {
        let c = client("https://apic.example.com/proxy");
        assert_eq!(
            c.api_url("api/node/class/fvTenant.json").unwrap().as_str(),
            "https://apic.example.com/proxy/api/node/class/fvTenant.json"
        );
        assert_eq!(
            c.api_url("/api/aaaLogin.json").unwrap().as_str(),
            "https://apic.example.com/proxy/api/aaaLogin.json"
        );
    }

    #[test]
    fn api_url_keeps_query() {
        let c = client("https://apic.example.com");
        let url = c
            .api_url("api/node/class/geoSite.json?rsp-subtree=full")
            .unwrap();
        assert_eq!(url.path(), "/api/node/class/geoSite.json");
        assert_eq!(url.query(), Some("rsp-subtree=full"));
    }

    #[test]
    fn jar_drives_session_state() {
        let c = client("https://apic.example.com");
        assert_eq!(c.state(), SessionState::Unauthenticated);
        let jar = Jar::default();
        jar.add_cookie_str("APIC-cookie=abc", c.base_url());
        c.set_session(jar);
        assert_eq!(c.state(), SessionState::Authenticated);
        c.clear_session();
        assert_eq!(c.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn mutation_bodies_are_tolerated() {
        assert_eq!(parse_response("", true).unwrap(), MitResponse::default());
        assert_eq!(parse_response("OK", true).unwrap(), MitResponse::default());
        assert!(matches!(
            parse_response("OK", false),
            Err(Error::Deserialization { .. })
        ));
    }
}
