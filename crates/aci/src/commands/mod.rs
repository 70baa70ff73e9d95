//! Command dispatch: bridges CLI args -> core client calls -> output.

pub mod config_cmd;
pub mod geo;
pub mod nodes;
pub mod tenants;
pub mod util;
pub mod vrfs;

use aci_core::{Client, ClientConfig, LoginInfo};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

use self::util::Session;

/// Dispatch a controller-bound command, logging out afterwards.
pub async fn dispatch(
    cmd: Command,
    config: ClientConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if matches!(cmd, Command::Login) {
        return login(&config, global).await;
    }

    let session = Session::new(config);
    let result = match cmd {
        Command::Nodes(args) => nodes::handle(&session, args, global).await,
        Command::Geo(args) => geo::handle(&session, args, global).await,
        Command::Tenants(args) => tenants::handle(&session, args, global).await,
        Command::Vrfs(args) => vrfs::handle(&session, args, global).await,
        Command::Login | Command::Config(_) | Command::Completions(_) => Ok(()),
    };
    session.close().await;
    result
}

fn login_detail(info: &LoginInfo) -> String {
    let mut lines = vec![format!("User:            {}", info.user_name)];
    if let Some(node) = &info.node {
        lines.push(format!("Controller node: {node}"));
    }
    if let Some(first) = &info.first_login_time {
        lines.push(format!("First login:     {first}"));
    }
    if let Some(secs) = info.refresh_timeout_secs {
        lines.push(format!("Refresh timeout: {secs}s"));
    }
    if let Some(secs) = info.maximum_lifetime_secs {
        lines.push(format!("Max lifetime:    {secs}s"));
    }
    lines.join("\n")
}

async fn login(config: &ClientConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let client = Client::new(config)?;
    let info = client.login().await?;
    let out = output::render_single(&global.output, &info, login_detail, |i| {
        i.user_name.clone()
    })?;
    output::print_output(&out, global.quiet);
    if let Err(e) = client.logout().await {
        tracing::debug!(error = %e, "logout failed");
    }
    Ok(())
}
