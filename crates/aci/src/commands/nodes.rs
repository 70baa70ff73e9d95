//! Fabric node command handlers.

use aci_core::{FabricNode, SerialNumber};
use tabled::Tabled;

use crate::cli::{GlobalOpts, NodeSpec, NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&FabricNode> for NodeRow {
    fn from(n: &FabricNode) -> Self {
        Self {
            id: n.id.to_string(),
            name: n.name.clone(),
            pod: n.pod_id.to_string(),
            serial: n.serial.to_string(),
            role: n.role.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

fn build_node(spec: &NodeSpec) -> Result<FabricNode, CliError> {
    let serial = SerialNumber::new(&spec.serial).map_err(util::invalid("serial"))?;
    let node = FabricNode::new(spec.name.clone(), spec.id, spec.pod, serial)
        .map_err(util::invalid("name"))?;
    Ok(match spec.role {
        Some(role) => node.with_role(role),
        None => node,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: NodesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List => {
            let nodes = session.client().await?.list_nodes().await?;
            let out = output::render_list(&global.output, &nodes, |n| NodeRow::from(n), |n| {
                n.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Add(spec) => {
            let node = build_node(&spec)?;
            session.client().await?.add_nodes(&[node]).await?;
            output::print_status(
                &format!("Node {} ({}) registered", spec.id, spec.serial),
                global.quiet,
            );
            Ok(())
        }

        NodesCommand::Update(spec) => {
            let node = build_node(&spec)?;
            session.client().await?.update_nodes(&[node]).await?;
            output::print_status(&format!("Node {} updated", spec.id), global.quiet);
            Ok(())
        }

        NodesCommand::Delete(spec) => {
            let node = build_node(&spec)?;
            if !util::confirm(
                &format!("Remove node {} ({}) from the fabric?", spec.id, spec.serial),
                global.yes,
            )? {
                return Ok(());
            }
            session.client().await?.delete_nodes(&[node]).await?;
            output::print_status(&format!("Node {} removed", spec.id), global.quiet);
            Ok(())
        }

        NodesCommand::Decommission { id, pod } => {
            if !util::confirm(
                &format!("Decommission node {id} in pod {pod}?"),
                global.yes,
            )? {
                return Ok(());
            }
            match session.client().await?.decommission_node(pod, id).await {
                Ok(_) => {
                    output::print_status(&format!("Node {id} decommissioned"), global.quiet);
                    Ok(())
                }
                Err(e) if e.is_identity_conflict() => {
                    tracing::info!(node = %id, "node already decommissioned");
                    output::print_status(
                        &format!("Node {id} is already decommissioned"),
                        global.quiet,
                    );
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
