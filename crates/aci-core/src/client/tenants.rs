use aci_api::MitResponse;

use super::Client;
use crate::error::CoreError;
use crate::model::{Action, Tenant};

const LIST_TENANTS_PATH: &str = "api/node/class/fvTenant.json";

impl Client {
    /// Create a tenant, together with any VRFs attached to it.
    pub async fn add_tenant(&self, tenant: &Tenant) -> Result<MitResponse, CoreError> {
        self.apply(tenant, Action::CreatedModified, &[]).await
    }

    pub async fn update_tenant(&self, tenant: &Tenant) -> Result<MitResponse, CoreError> {
        self.apply(tenant, Action::Modified, &[]).await
    }

    pub async fn delete_tenant(&self, tenant: &Tenant) -> Result<MitResponse, CoreError> {
        self.apply(tenant, Action::Deleted, &[]).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, CoreError> {
        self.query(LIST_TENANTS_PATH).await
    }
}
