// Geolocation sites and their nested levels.

use aci_api::MitResponse;
use tracing::debug;

use super::Client;
use crate::decode::decode;
use crate::error::CoreError;
use crate::model::{Action, Location, ManagedObject};
use crate::resolve::resolve_dn;

const SUBTREE_QUERY: &str = concat!(
    "rsp-subtree=full",
    "&rsp-subtree-class=geoSite,geoBuilding,geoFloor,geoRoom,geoRow,geoRack",
);

impl Client {
    /// Create `location` (and everything below it) under `ancestors`,
    /// outermost first. Ancestors are assumed to exist unless marked
    /// otherwise.
    pub async fn add_location(
        &self,
        location: &Location,
        ancestors: &[&Location],
    ) -> Result<MitResponse, CoreError> {
        self.edit_location(location, Action::CreatedModified, ancestors)
            .await
    }

    /// Change the attributes of one location. Children are not sent.
    pub async fn update_location(
        &self,
        location: &Location,
        ancestors: &[&Location],
    ) -> Result<MitResponse, CoreError> {
        self.edit_location(location, Action::Modified, ancestors)
            .await
    }

    pub async fn delete_location(
        &self,
        location: &Location,
        ancestors: &[&Location],
    ) -> Result<MitResponse, CoreError> {
        self.edit_location(location, Action::Deleted, ancestors)
            .await
    }

    async fn edit_location(
        &self,
        location: &Location,
        action: Action,
        ancestors: &[&Location],
    ) -> Result<MitResponse, CoreError> {
        let ancestors: Vec<&dyn ManagedObject> =
            ancestors.iter().map(|l| *l as &dyn ManagedObject).collect();
        debug!(level = %location.level, name = %location.name, %action, "editing location");
        self.apply(location, action, &ancestors).await
    }

    /// Every site with its full location tree.
    pub async fn list_sites(&self) -> Result<Vec<Location>, CoreError> {
        self.query(&format!("api/node/class/geoSite.json?{SUBTREE_QUERY}"))
            .await
    }

    /// One site by name, or `None` when it does not exist.
    pub async fn get_site(&self, name: &str) -> Result<Option<Location>, CoreError> {
        let dn = resolve_dn(&Location::site(name), &[])?;
        let response = self
            .api()
            .get(&format!("api/node/mo/{dn}.json?{SUBTREE_QUERY}"))
            .await?;
        match response.imdata.first() {
            Some(node) => Ok(Some(decode(node)?)),
            None => Ok(None),
        }
    }
}
