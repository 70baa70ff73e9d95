//! Tenant command handlers.

use aci_core::{ManagedObject, Tenant, Vrf};
use tabled::Tabled;

use crate::cli::{GlobalOpts, TenantsArgs, TenantsCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

#[derive(Tabled)]
struct TenantRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Tenant> for TenantRow {
    fn from(t: &Tenant) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone(),
        }
    }
}

fn build_tenant(name: String, description: Option<String>) -> Result<Tenant, CliError> {
    let tenant = Tenant::new(name).with_description(description.unwrap_or_default());
    tenant.validate().map_err(util::invalid("tenant"))?;
    Ok(tenant)
}

pub async fn handle(
    session: &Session,
    args: TenantsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TenantsCommand::List => {
            let tenants = session.client().await?.list_tenants().await?;
            let out = output::render_list(&global.output, &tenants, |t| TenantRow::from(t), |t| {
                t.name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TenantsCommand::Add {
            name,
            description,
            vrfs,
        } => {
            let mut tenant = build_tenant(name, description)?;
            for vrf in vrfs {
                tenant
                    .add_vrf(Vrf::new(tenant.name.clone(), vrf))
                    .map_err(util::invalid("vrf"))?;
            }
            session.client().await?.add_tenant(&tenant).await?;
            output::print_status(&format!("Tenant '{}' created", tenant.name), global.quiet);
            Ok(())
        }

        TenantsCommand::Update { name, description } => {
            let tenant = build_tenant(name, Some(description))?;
            session.client().await?.update_tenant(&tenant).await?;
            output::print_status(&format!("Tenant '{}' updated", tenant.name), global.quiet);
            Ok(())
        }

        TenantsCommand::Delete { name } => {
            let tenant = build_tenant(name, None)?;
            if !util::confirm(
                &format!("Delete tenant '{}' and everything in it?", tenant.name),
                global.yes,
            )? {
                return Ok(());
            }
            session.client().await?.delete_tenant(&tenant).await?;
            output::print_status(&format!("Tenant '{}' deleted", tenant.name), global.quiet);
            Ok(())
        }
    }
}
