//! Shared helpers for command handlers.

use aci_core::{Client, ClientConfig};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::CliError;

/// Lazily logged-in controller session.
///
/// Handlers validate their input first and only then ask for the client,
/// so bad arguments never cost a login round trip.
pub struct Session {
    config: ClientConfig,
    client: OnceCell<Client>,
}

impl Session {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// The logged-in client, logging in on first use.
    pub async fn client(&self) -> Result<&Client, CliError> {
        self.client
            .get_or_try_init(|| async {
                let client = Client::new(&self.config)?;
                let info = client.login().await?;
                debug!(user = %info.user_name, url = %self.config.url, "logged in");
                Ok::<_, CliError>(client)
            })
            .await
    }

    /// Log out if a session was opened. Failures are only logged.
    pub async fn close(&self) {
        if let Some(client) = self.client.get() {
            if let Err(e) = client.logout().await {
                debug!(error = %e, "logout failed");
            }
        }
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Turn a local validation failure into a usage error on `field`.
pub fn invalid(field: &str) -> impl FnOnce(aci_core::ValidationError) -> CliError + '_ {
    move |e| CliError::Validation {
        field: field.into(),
        reason: e.to_string(),
    }
}
