// ── Path/name resolution ──
//
// A DN is never stored on an object; it is derived from the chain of
// ancestors the caller supplies, rooted at the outermost ancestor's
// anchor.

use crate::error::ValidationError;
use crate::model::{Dn, ManagedObject};

/// Resolve the DN of `object` below `ancestors` (outermost first).
///
/// Every object in the chain is validated and every parent/child pair
/// is checked before the DN is built.
pub fn resolve_dn(
    object: &dyn ManagedObject,
    ancestors: &[&dyn ManagedObject],
) -> Result<Dn, ValidationError> {
    let mut chain = ancestors.to_vec();
    chain.push(object);
    let dns = resolve_chain(&chain)?;
    dns.into_iter()
        .last()
        .ok_or_else(|| ValidationError::MissingAncestor {
            class: object.class_name().into(),
        })
}

/// The object's own RN, after validating it.
pub fn resolve_rn(object: &dyn ManagedObject) -> Result<String, ValidationError> {
    object.validate()?;
    Ok(object.rn())
}

/// DNs of every object in a root-to-leaf chain.
pub(crate) fn resolve_chain(chain: &[&dyn ManagedObject]) -> Result<Vec<Dn>, ValidationError> {
    let Some(root) = chain.first() else {
        return Ok(Vec::new());
    };
    let anchor = root
        .anchor()
        .ok_or_else(|| ValidationError::MissingAncestor {
            class: root.class_name().into(),
        })?;

    let mut dns = Vec::with_capacity(chain.len());
    let mut dn = Dn::new(anchor);
    let mut parent: Option<&dyn ManagedObject> = None;
    for &object in chain {
        object.validate()?;
        if let Some(parent) = parent {
            check_nesting(parent, object)?;
        }
        dn = dn.child(&object.rn());
        dns.push(dn.clone());
        parent = Some(object);
    }
    Ok(dns)
}

pub(crate) fn check_nesting(
    parent: &dyn ManagedObject,
    child: &dyn ManagedObject,
) -> Result<(), ValidationError> {
    if parent.accepts_child(child.class_name()) {
        Ok(())
    } else {
        Err(ValidationError::Nesting {
            parent: parent.class_name().into(),
            child: child.class_name().into(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        FabricNode, Location, NodeDecommission, NodeId, NodeIdentityPolicy, OutOfServicePolicy,
        PodId, SerialNumber, Tenant, Vrf,
    };

    fn node() -> FabricNode {
        FabricNode::new(
            "leaf-101",
            NodeId::new(101).unwrap(),
            PodId::new(1).unwrap(),
            SerialNumber::new("FOC0849N1BD").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn fabric_node_resolves_from_its_anchor() {
        let node = node();
        assert_eq!(
            resolve_dn(&node, &[]).unwrap().as_str(),
            "uni/controller/nodeidentpol/nodep-FOC0849N1BD"
        );
        assert_eq!(resolve_rn(&node).unwrap(), "nodep-FOC0849N1BD");
    }

    #[test]
    fn explicit_container_gives_the_same_dn() {
        let node = node();
        let policy = NodeIdentityPolicy::default();
        assert_eq!(
            resolve_dn(&node, &[&policy]).unwrap(),
            resolve_dn(&node, &[]).unwrap()
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let site = Location::site("hq");
        let building = Location::building("b1");
        let floor = Location::floor("f2");
        let first = resolve_dn(&floor, &[&site, &building]).unwrap();
        let second = resolve_dn(&floor, &[&site, &building]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "uni/fabric/site-hq/building-b1/floor-f2");
    }

    #[test]
    fn wrong_nesting_is_rejected() {
        let site = Location::site("hq");
        let room = Location::room("r1");
        assert!(matches!(
            resolve_dn(&room, &[&site]),
            Err(ValidationError::Nesting { .. })
        ));
    }

    #[test]
    fn unanchored_root_needs_an_ancestor() {
        let vrf = Vrf::new("prod", "blue");
        assert!(matches!(
            resolve_dn(&vrf, &[]),
            Err(ValidationError::MissingAncestor { .. })
        ));
        let tenant = vrf.parent_tenant();
        assert_eq!(
            resolve_dn(&vrf, &[&tenant]).unwrap().as_str(),
            "uni/tn-prod/ctx-blue"
        );
    }

    #[test]
    fn invalid_ancestor_fails_before_building() {
        let tenant = Tenant::new("bad name");
        let vrf = Vrf::new("bad name", "blue");
        assert!(matches!(
            resolve_dn(&vrf, &[&tenant]),
            Err(ValidationError::Name { .. })
        ));
    }

    #[test]
    fn decommission_relation_dn() {
        let rel = NodeDecommission::new(PodId::new(1).unwrap(), NodeId::new(102).unwrap());
        let policy = OutOfServicePolicy::default();
        assert_eq!(
            resolve_dn(&rel, &[&policy]).unwrap().as_str(),
            "uni/fabric/outofsvc/rsdecommissionNode-[topology/pod-1/node-102]"
        );
    }
}
