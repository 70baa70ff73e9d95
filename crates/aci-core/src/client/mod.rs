// ── Client facade ──
//
// Typed operations over one controller session. Every operation is a
// single encode → send → decode pass: nothing is cached, retried or
// paginated. Per-kind operations live in the sibling modules as
// inherent methods.

mod fabric;
mod geolocation;
mod tenants;
mod vrfs;

use std::sync::Arc;

use aci_api::{ApicClient, Credentials, LoginInfo, MitResponse, SessionState, WireNode};
use secrecy::SecretString;
use tracing::debug;

use crate::config::ClientConfig;
use crate::decode::{FromWire, decode_all};
use crate::encode::{encode, encode_batch};
use crate::error::CoreError;
use crate::model::{Action, ManagedObject};

/// Build a client for `host` with default transport settings.
///
/// No request is made; call [`Client::login`] before anything else.
pub fn connect(host: &str, username: &str, password: SecretString) -> Result<Client, CoreError> {
    Client::new(&ClientConfig::new(host, username, password)?)
}

/// Cheaply cloneable handle to one controller session.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ApicClient>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let api = ApicClient::new(config.url.clone(), credentials, &config.transport())?;
        Ok(Self::from_api(api))
    }

    /// Wrap an already built transport client.
    pub fn from_api(api: ApicClient) -> Self {
        Self {
            inner: Arc::new(api),
        }
    }

    pub fn api(&self) -> &ApicClient {
        &self.inner
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub async fn login(&self) -> Result<LoginInfo, CoreError> {
        Ok(self.inner.login().await?)
    }

    pub async fn logout(&self) -> Result<(), CoreError> {
        Ok(self.inner.logout().await?)
    }

    /// Encode `target` below `ancestors` and post the tree.
    pub async fn apply(
        &self,
        target: &dyn ManagedObject,
        action: Action,
        ancestors: &[&dyn ManagedObject],
    ) -> Result<MitResponse, CoreError> {
        let tree = encode(target, action, ancestors)?;
        self.submit(&tree).await
    }

    /// Encode several siblings under one parent chain and post the tree.
    pub async fn apply_batch(
        &self,
        targets: &[&dyn ManagedObject],
        action: Action,
        ancestors: &[&dyn ManagedObject],
    ) -> Result<MitResponse, CoreError> {
        let tree = encode_batch(targets, action, ancestors)?;
        self.submit(&tree).await
    }

    /// Post a delta tree to `api/node/mo/<root dn>.json`.
    pub async fn submit(&self, tree: &WireNode) -> Result<MitResponse, CoreError> {
        let dn = tree.dn().ok_or_else(|| CoreError::Config {
            message: format!("{} tree has no dn", tree.class),
        })?;
        debug!(dn, class = %tree.class, "submitting delta tree");
        Ok(self.inner.post(&format!("api/node/mo/{dn}.json"), tree).await?)
    }

    /// GET a controller-relative path and decode every returned object.
    pub async fn query<T: FromWire>(&self, path: &str) -> Result<Vec<T>, CoreError> {
        let response = self.inner.get(path).await?;
        Ok(decode_all(&response)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.base_url().as_str())
            .field("username", &self.inner.username())
            .field("state", &self.inner.state())
            .finish()
    }
}
