use aci_api::MitResponse;

use super::Client;
use crate::error::CoreError;
use crate::model::{Action, Tenant, Vrf};
use crate::resolve::resolve_dn;

impl Client {
    /// Create a VRF in its (existing) tenant.
    pub async fn add_vrf(&self, vrf: &Vrf) -> Result<MitResponse, CoreError> {
        self.edit_vrf(vrf, Action::CreatedModified).await
    }

    pub async fn update_vrf(&self, vrf: &Vrf) -> Result<MitResponse, CoreError> {
        self.edit_vrf(vrf, Action::Modified).await
    }

    pub async fn delete_vrf(&self, vrf: &Vrf) -> Result<MitResponse, CoreError> {
        self.edit_vrf(vrf, Action::Deleted).await
    }

    async fn edit_vrf(&self, vrf: &Vrf, action: Action) -> Result<MitResponse, CoreError> {
        let tenant = vrf.parent_tenant();
        self.apply(vrf, action, &[&tenant]).await
    }

    /// VRFs directly under `tenant`.
    pub async fn list_vrfs(&self, tenant: &str) -> Result<Vec<Vrf>, CoreError> {
        let dn = resolve_dn(&Tenant::new(tenant), &[])?;
        let mut vrfs: Vec<Vrf> = self
            .query(&format!(
                "api/node/mo/{dn}.json?query-target=children&target-subtree-class=fvCtx"
            ))
            .await?;
        for vrf in &mut vrfs {
            if vrf.tenant.is_empty() {
                vrf.tenant = tenant.to_owned();
            }
        }
        Ok(vrfs)
    }
}
