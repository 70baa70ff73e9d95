// Session login/logout
//
// `aaaLogin` answers with a `Set-Cookie: APIC-cookie=<token>` header and
// echoes the same token in the `aaaLogin` object. Every login gets a fresh
// cookie jar; the jar decides which cookies go back on later requests.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::SET_COOKIE;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::auth::{LOGIN_PATH, LOGOUT_PATH, LoginInfo, SESSION_COOKIE, SessionState};
use crate::client::ApicClient;
use crate::error::{Error, decode_error};
use crate::wire::{MitResponse, WireNode};

impl ApicClient {
    /// Authenticate with the stored credentials.
    ///
    /// `POST api/aaaLogin.json` with `{"aaaUser":{"attributes":{"name","pwd"}}}`.
    /// On success the new session jar replaces any previous one. On failure
    /// the client is left unauthenticated.
    pub async fn login(&self) -> Result<LoginInfo, Error> {
        let url = self.api_url(LOGIN_PATH)?;
        let username = self.credentials().username.as_str();
        debug!("logging in at {} as {}", url, username);

        let body = json!({
            "aaaUser": {
                "attributes": {
                    "name": username,
                    "pwd": self.credentials().password.expose_secret(),
                }
            }
        });

        let resp = self.http().post(url.clone()).json(&body).send().await;
        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => {
                self.clear_session();
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        let jar = Jar::default();
        jar.set_cookies(&mut resp.headers().get_all(SET_COOKIE).iter(), &url);
        let text = resp.text().await?;

        if !status.is_success() {
            self.clear_session();
            return Err(Error::LoginRejected(Box::new(decode_error(
                "POST",
                url.as_str(),
                status.as_u16(),
                text,
            ))));
        }

        let response: MitResponse = serde_json::from_str(&text).unwrap_or_default();
        let login = response.objects("aaaLogin").next();

        if !has_session_cookie(&jar, &url) {
            if let Some(token) = login.and_then(|node| node.attribute("token")) {
                debug!("no session cookie in login response, using token");
                jar.add_cookie_str(&format!("{SESSION_COOKIE}={token}"), self.base_url());
            }
        }
        if !has_session_cookie(&jar, &url) {
            self.clear_session();
            return Err(Error::MissingSessionCookie);
        }
        self.set_session(jar);

        let info = login.map_or_else(
            || LoginInfo {
                user_name: username.to_owned(),
                ..LoginInfo::default()
            },
            |node| LoginInfo::from_login(node, username),
        );
        info!(user = %info.user_name, "logged in to {}", self.base_url());
        Ok(info)
    }

    /// End the current session.
    ///
    /// The session is dropped even when the controller rejects the logout.
    pub async fn logout(&self) -> Result<(), Error> {
        if self.state() == SessionState::Unauthenticated {
            debug!("logout skipped: no session");
            return Ok(());
        }

        let body =
            WireNode::new("aaaUser").with_attribute("name", self.credentials().username.clone());
        let result = self.post(LOGOUT_PATH, &body).await;
        self.clear_session();
        result?;

        debug!("logout complete");
        Ok(())
    }
}

/// Whether `jar` would send a non-empty `APIC-cookie` to `url`.
fn has_session_cookie(jar: &Jar, url: &Url) -> bool {
    let Some(cookies) = jar.cookies(url) else {
        return false;
    };
    cookies.to_str().is_ok_and(|cookies| {
        cookies.split("; ").any(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .is_some_and(|value| !value.is_empty())
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn login_url() -> Url {
        Url::parse("https://apic1.example.com/api/aaaLogin.json").unwrap()
    }

    fn jar_from(headers: &[&'static str]) -> Jar {
        let jar = Jar::default();
        let values: Vec<HeaderValue> = headers
            .iter()
            .copied()
            .map(HeaderValue::from_static)
            .collect();
        jar.set_cookies(&mut values.iter(), &login_url());
        jar
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let jar = jar_from(&[
            "other=1; path=/",
            "APIC-cookie=eyJhbGci.b64; path=/; HttpOnly; Secure",
        ]);
        assert!(has_session_cookie(&jar, &login_url()));

        let later = Url::parse("https://apic1.example.com/api/node/class/fvTenant.json").unwrap();
        let sent = jar.cookies(&later).unwrap();
        assert!(sent.to_str().unwrap().contains("APIC-cookie=eyJhbGci.b64"));
    }

    #[test]
    fn similar_or_empty_cookie_is_not_a_session() {
        let similar = jar_from(&["APIC-cookie-other=1; path=/"]);
        assert!(!has_session_cookie(&similar, &login_url()));
        let empty = jar_from(&["APIC-cookie=; path=/"]);
        assert!(!has_session_cookie(&empty, &login_url()));
        assert!(!has_session_cookie(&Jar::default(), &login_url()));
    }

    #[test]
    fn expired_cookie_is_not_a_session() {
        let jar = jar_from(&["APIC-cookie=abc; path=/; Max-Age=0"]);
        assert!(!has_session_cookie(&jar, &login_url()));
    }
}
