// ── Fabric membership ──
//
// Switches join the fabric through a node identity profile
// (`fabricNodeIdentP`) keyed by serial number under the node identity
// policy. Decommissioning is a relation from the out-of-service policy
// to the node's topology DN.

use std::fmt;
use std::str::FromStr;

use aci_api::{Attributes, WireNode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::action::Action;
use super::dn::Dn;
use super::mo::ManagedObject;
use super::validate;
use crate::decode::{FromWire, expect_class, invalid, optional, required};
use crate::error::{DecodeError, ValidationError};

pub const NODE_IDENTITY_POLICY_DN: &str = "uni/controller/nodeidentpol";
pub const OUT_OF_SERVICE_POLICY_DN: &str = "uni/fabric/outofsvc";

// ── NodeId ──────────────────────────────────────────────────────────

/// Fabric node id, 101 through 4000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct NodeId(u16);

impl NodeId {
    pub const MIN: u16 = 101;
    pub const MAX: u16 = 4000;

    pub fn new(id: i64) -> Result<Self, ValidationError> {
        u16::try_from(id)
            .ok()
            .filter(|id| (Self::MIN..=Self::MAX).contains(id))
            .map(Self)
            .ok_or_else(|| ValidationError::NodeId {
                value: id.to_string(),
            })
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Whether the id is in the range accepted for submission.
    pub fn in_range(self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::NodeId { value: s.to_owned() })
            .and_then(Self::new)
    }
}

impl TryFrom<u16> for NodeId {
    type Error = ValidationError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(i64::from(id))
    }
}

impl From<NodeId> for u16 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── PodId ───────────────────────────────────────────────────────────

/// Pod id, 0 through 255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodId(u8);

impl PodId {
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        u8::try_from(id).map(Self).map_err(|_| ValidationError::PodId {
            value: id.to_string(),
        })
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl FromStr for PodId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::PodId { value: s.to_owned() })
            .and_then(Self::new)
    }
}

impl fmt::Display for PodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── SerialNumber ────────────────────────────────────────────────────

/// Switch serial number, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerialNumber(String);

impl SerialNumber {
    pub const MAX_LEN: usize = 16;

    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric());
        if valid {
            Ok(Self(raw.to_ascii_uppercase()))
        } else {
            Err(ValidationError::Serial {
                value: raw.to_owned(),
            })
        }
    }

    /// Keep a serial reported by the controller as is. Discovered but
    /// unregistered switches report a placeholder such as `TEP-1-102`.
    pub(crate) fn reported(raw: &str) -> Self {
        Self(raw.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SerialNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SerialNumber {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<SerialNumber> for String {
    fn from(serial: SerialNumber) -> Self {
        serial.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── NodeRole ────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Leaf,
    Spine,
}

// ── FabricNode ──────────────────────────────────────────────────────

/// A switch registered (or to be registered) in the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricNode {
    pub id: NodeId,
    pub name: String,
    pub pod_id: PodId,
    pub serial: SerialNumber,
    /// Assigned by the controller on discovery; only present on listed nodes.
    pub role: Option<NodeRole>,
    #[serde(skip)]
    pub action: Action,
}

impl FabricNode {
    pub fn new(
        name: impl Into<String>,
        id: NodeId,
        pod_id: PodId,
        serial: SerialNumber,
    ) -> Result<Self, ValidationError> {
        let node = Self {
            id,
            name: name.into(),
            pod_id,
            serial,
            role: None,
            action: Action::None,
        };
        node.validate()?;
        Ok(node)
    }

    #[must_use]
    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Topology DN of the running switch, e.g. `topology/pod-1/node-101`.
    pub fn topology_dn(&self) -> Dn {
        Dn::new(format!("topology/pod-{}/node-{}", self.pod_id, self.id))
    }
}

impl ManagedObject for FabricNode {
    fn class_name(&self) -> &'static str {
        "fabricNodeIdentP"
    }

    fn rn_prefix(&self) -> &'static str {
        "nodep"
    }

    fn naming_value(&self) -> String {
        self.serial.to_string()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        Some(NODE_IDENTITY_POLICY_DN)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.id.in_range() {
            return Err(ValidationError::NodeId {
                value: self.id.to_string(),
            });
        }
        SerialNumber::new(self.serial.as_str())?;
        if validate::node_name(&self.name) {
            Ok(())
        } else {
            Err(ValidationError::Name {
                class: "fabricNodeIdentP",
                value: self.name.clone(),
            })
        }
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("name".into(), self.name.clone());
        attrs.insert("nodeId".into(), self.id.to_string());
        attrs.insert("podId".into(), self.pod_id.to_string());
        attrs.insert("serial".into(), self.serial.to_string());
        if let Some(role) = self.role {
            attrs.insert("role".into(), role.to_string());
        }
        attrs
    }
}

/// Accepts both the registration profile (`fabricNodeIdentP`) and the
/// discovered switch (`fabricNode`). Values are taken as reported; only
/// their presence and numeric form are checked.
impl FromWire for FabricNode {
    fn from_wire(node: &WireNode) -> Result<Self, DecodeError> {
        expect_class(node, &["fabricNode", "fabricNodeIdentP"])?;

        let id = node
            .attribute("nodeId")
            .or_else(|| node.attribute("id"))
            .ok_or_else(|| DecodeError::MissingAttribute {
                class: node.class.clone(),
                attribute: "id".into(),
            })?;
        let id = id.trim().parse::<u16>().map(NodeId).map_err(|_| {
            let source = ValidationError::NodeId {
                value: id.to_owned(),
            };
            invalid(node, "id", source)
        })?;

        let pod_id: PodId = match node.attribute("podId") {
            Some(pod) => pod.parse().map_err(|e| invalid(node, "podId", e))?,
            None => node
                .dn()
                .map(Dn::new)
                .and_then(|dn| dn.segment_value("pod").map(str::to_owned))
                .map(|pod| pod.parse::<PodId>())
                .transpose()
                .map_err(|e| invalid(node, "dn", e))?
                .unwrap_or_default(),
        };

        let serial = SerialNumber::reported(required(node, "serial")?);

        // Controllers also report "controller" and "unspecified".
        let role = node.attribute("role").and_then(|r| r.parse().ok());

        Ok(Self {
            id,
            name: optional(node, "name").unwrap_or_default(),
            pod_id,
            serial,
            role,
            action: node.status().map(Action::from_status).unwrap_or_default(),
        })
    }
}

// ── Containers ──────────────────────────────────────────────────────

/// Node identity policy (`uni/controller/nodeidentpol`), the parent of
/// every `fabricNodeIdentP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeIdentityPolicy {
    pub action: Action,
}

impl ManagedObject for NodeIdentityPolicy {
    fn class_name(&self) -> &'static str {
        "fabricNodeIdentPol"
    }

    fn rn_prefix(&self) -> &'static str {
        "nodeidentpol"
    }

    fn naming_value(&self) -> String {
        String::new()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        Some("uni/controller")
    }

    fn accepts_child(&self, class: &str) -> bool {
        class == "fabricNodeIdentP"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
    }
}

/// Out-of-service policy (`uni/fabric/outofsvc`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutOfServicePolicy {
    pub action: Action,
}

impl ManagedObject for OutOfServicePolicy {
    fn class_name(&self) -> &'static str {
        "fabricOOServicePol"
    }

    fn rn_prefix(&self) -> &'static str {
        "outofsvc"
    }

    fn naming_value(&self) -> String {
        String::new()
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        Some("uni/fabric")
    }

    fn accepts_child(&self, class: &str) -> bool {
        class == "fabricRsDecommissionNode"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
    }
}

/// Decommission relation from the out-of-service policy to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecommission {
    pub pod_id: PodId,
    pub node_id: NodeId,
    /// Also forget the node's identity on the controller.
    pub remove_from_controller: bool,
    pub action: Action,
}

impl NodeDecommission {
    pub fn new(pod_id: PodId, node_id: NodeId) -> Self {
        Self {
            pod_id,
            node_id,
            remove_from_controller: true,
            action: Action::None,
        }
    }

    pub fn target_dn(&self) -> Dn {
        Dn::new(format!("topology/pod-{}/node-{}", self.pod_id, self.node_id))
    }
}

impl ManagedObject for NodeDecommission {
    fn class_name(&self) -> &'static str {
        "fabricRsDecommissionNode"
    }

    fn rn_prefix(&self) -> &'static str {
        "rsdecommissionNode"
    }

    fn naming_value(&self) -> String {
        format!("[{}]", self.target_dn())
    }

    fn action(&self) -> Action {
        self.action
    }

    fn anchor(&self) -> Option<&'static str> {
        Some(OUT_OF_SERVICE_POLICY_DN)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("tDn".into(), self.target_dn().to_string());
        attrs.insert(
            "removeFromController".into(),
            self.remove_from_controller.to_string(),
        );
        attrs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn node_id_boundaries() {
        assert!(NodeId::new(100).is_err());
        assert!(NodeId::new(4001).is_err());
        assert!(NodeId::new(-1).is_err());
        assert_eq!(NodeId::new(101).unwrap().get(), 101);
        assert_eq!(NodeId::new(4000).unwrap().get(), 4000);
        assert!("abc".parse::<NodeId>().is_err());
        assert_eq!("  201 ".parse::<NodeId>().unwrap().get(), 201);
    }

    #[test]
    fn pod_id_boundaries() {
        assert!(PodId::new(-1).is_err());
        assert!(PodId::new(256).is_err());
        assert_eq!(PodId::new(0).unwrap().get(), 0);
        assert_eq!(PodId::new(255).unwrap().get(), 255);
        assert!("-1".parse::<PodId>().is_err());
    }

    #[test]
    fn serial_rules() {
        assert_eq!(
            SerialNumber::new("foc0849n1bd").unwrap().as_str(),
            "FOC0849N1BD"
        );
        assert!(SerialNumber::new(&"A".repeat(16)).is_ok());
        assert!(SerialNumber::new(&"A".repeat(17)).is_err());
        assert!(SerialNumber::new("FOC-0849").is_err());
        assert!(SerialNumber::new("").is_err());
    }

    #[test]
    fn node_name_is_validated() {
        let serial = SerialNumber::new("FOC0849N1BD").unwrap();
        let id = NodeId::new(101).unwrap();
        let pod = PodId::new(1).unwrap();
        assert!(FabricNode::new("leaf-101", id, pod, serial.clone()).is_ok());
        assert!(matches!(
            FabricNode::new("leaf-", id, pod, serial),
            Err(ValidationError::Name { .. })
        ));
    }

    #[test]
    fn decodes_discovered_fabric_node() {
        let wire = WireNode::new("fabricNode")
            .with_attribute("dn", "topology/pod-2/node-201")
            .with_attribute("id", "201")
            .with_attribute("name", "spine-201")
            .with_attribute("role", "spine")
            .with_attribute("serial", "SAL1819SAN6");
        let node = FabricNode::from_wire(&wire).unwrap();
        assert_eq!(node.id.get(), 201);
        assert_eq!(node.pod_id.get(), 2);
        assert_eq!(node.role, Some(NodeRole::Spine));
        assert_eq!(node.topology_dn().as_str(), "topology/pod-2/node-201");
    }

    #[test]
    fn decode_keeps_reported_serial_and_id() {
        let wire = WireNode::new("fabricNode")
            .with_attribute("dn", "topology/pod-1/node-1")
            .with_attribute("id", "1")
            .with_attribute("name", "apic1")
            .with_attribute("role", "controller")
            .with_attribute("serial", "TEP-1-1");
        let node = FabricNode::from_wire(&wire).unwrap();
        assert_eq!(node.serial.as_str(), "TEP-1-1");
        assert_eq!(node.id.get(), 1);
        assert_eq!(node.role, None);
        // Out-of-range ids and placeholder serials are refused on submit.
        assert!(matches!(
            node.validate(),
            Err(ValidationError::NodeId { .. })
        ));
        let node = FabricNode {
            id: NodeId::new(102).unwrap(),
            ..node
        };
        assert!(matches!(
            node.validate(),
            Err(ValidationError::Serial { .. })
        ));
    }

    #[test]
    fn decode_rejects_non_numeric_id() {
        let wire = WireNode::new("fabricNode")
            .with_attribute("id", "leaf")
            .with_attribute("serial", "ABC");
        assert!(matches!(
            FabricNode::from_wire(&wire),
            Err(DecodeError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn decommission_relation_names_topology_target() {
        let rel = NodeDecommission::new(PodId::new(1).unwrap(), NodeId::new(102).unwrap());
        assert_eq!(rel.rn(), "rsdecommissionNode-[topology/pod-1/node-102]");
        let attrs = rel.attributes();
        assert_eq!(attrs["tDn"], "topology/pod-1/node-102");
        assert_eq!(attrs["removeFromController"], "true");
    }
}
