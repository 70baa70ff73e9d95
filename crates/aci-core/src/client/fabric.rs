// Fabric membership and decommissioning.

use aci_api::MitResponse;
use tracing::{debug, info};

use super::Client;
use crate::error::CoreError;
use crate::model::{
    Action, FabricNode, ManagedObject, NodeDecommission, NodeId, NodeIdentityPolicy,
    OutOfServicePolicy, PodId,
};

const FABRIC_NODE_CLASS_PATH: &str = "api/node/class/fabricNode.json";
const SWITCH_FILTER: &str = r#"or(eq(fabricNode.role,"leaf"),eq(fabricNode.role,"spine"))"#;

impl Client {
    /// Register switches in the fabric (`created,modified`).
    pub async fn add_nodes(&self, nodes: &[FabricNode]) -> Result<MitResponse, CoreError> {
        self.edit_nodes(nodes, Action::CreatedModified).await
    }

    pub async fn update_nodes(&self, nodes: &[FabricNode]) -> Result<MitResponse, CoreError> {
        self.edit_nodes(nodes, Action::Modified).await
    }

    /// Remove node identities. The controller answers with code 107 while
    /// a node is still discovered; decommission it first.
    pub async fn delete_nodes(&self, nodes: &[FabricNode]) -> Result<MitResponse, CoreError> {
        self.edit_nodes(nodes, Action::Deleted).await
    }

    async fn edit_nodes(
        &self,
        nodes: &[FabricNode],
        action: Action,
    ) -> Result<MitResponse, CoreError> {
        let policy = NodeIdentityPolicy::default();
        let targets: Vec<&dyn ManagedObject> =
            nodes.iter().map(|n| n as &dyn ManagedObject).collect();
        debug!(count = nodes.len(), %action, "editing fabric membership");
        self.apply_batch(&targets, action, &[&policy]).await
    }

    /// Leaf and spine switches known to the fabric.
    pub async fn list_nodes(&self) -> Result<Vec<FabricNode>, CoreError> {
        self.query(&format!(
            "{FABRIC_NODE_CLASS_PATH}?query-target-filter={SWITCH_FILTER}"
        ))
        .await
    }

    /// Take a node out of service and remove it from the controller.
    pub async fn decommission_node(
        &self,
        pod_id: PodId,
        node_id: NodeId,
    ) -> Result<MitResponse, CoreError> {
        let relation = NodeDecommission::new(pod_id, node_id);
        let policy = OutOfServicePolicy::default();
        info!(target_dn = %relation.target_dn(), "decommissioning node");
        self.apply(&relation, Action::CreatedModified, &[&policy])
            .await
    }
}
