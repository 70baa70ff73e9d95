//! VRF command handlers.

use aci_core::{ManagedObject, Vrf};
use tabled::Tabled;

use crate::cli::{GlobalOpts, VrfsArgs, VrfsCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

#[derive(Tabled)]
struct VrfRow {
    #[tabled(rename = "Tenant")]
    tenant: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Vrf> for VrfRow {
    fn from(v: &Vrf) -> Self {
        Self {
            tenant: v.tenant.clone(),
            name: v.name.clone(),
            description: v.description.clone(),
        }
    }
}

fn build_vrf(tenant: &str, name: String, description: Option<String>) -> Result<Vrf, CliError> {
    let vrf = Vrf::new(tenant, name).with_description(description.unwrap_or_default());
    vrf.parent_tenant()
        .validate()
        .map_err(util::invalid("tenant"))?;
    vrf.validate().map_err(util::invalid("vrf"))?;
    Ok(vrf)
}

pub async fn handle(
    session: &Session,
    args: VrfsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let tenant = args.tenant.ok_or_else(|| CliError::Validation {
        field: "tenant".into(),
        reason: "--tenant is required for VRF commands".into(),
    })?;

    match args.command {
        VrfsCommand::List => {
            let vrfs = session.client().await?.list_vrfs(&tenant).await?;
            let out = output::render_list(
                &global.output,
                &vrfs,
                |v| VrfRow::from(v),
                |v| v.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VrfsCommand::Add { name, description } => {
            let vrf = build_vrf(&tenant, name, description)?;
            session.client().await?.add_vrf(&vrf).await?;
            output::print_status(
                &format!("VRF '{}' created in tenant '{tenant}'", vrf.name),
                global.quiet,
            );
            Ok(())
        }

        VrfsCommand::Update { name, description } => {
            let vrf = build_vrf(&tenant, name, Some(description))?;
            session.client().await?.update_vrf(&vrf).await?;
            output::print_status(&format!("VRF '{}' updated", vrf.name), global.quiet);
            Ok(())
        }

        VrfsCommand::Delete { name } => {
            let vrf = build_vrf(&tenant, name, None)?;
            if !util::confirm(
                &format!("Delete VRF '{}' from tenant '{tenant}'?", vrf.name),
                global.yes,
            )? {
                return Ok(());
            }
            session.client().await?.delete_vrf(&vrf).await?;
            output::print_status(&format!("VRF '{}' deleted", vrf.name), global.quiet);
            Ok(())
        }
    }
}
