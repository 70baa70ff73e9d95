// ── Delta-tree encoder ──
//
// Builds the subtree posted to the controller. Only the targets carry the
// requested action; ancestors are path-only `modified` nodes unless the
// caller marked them as being created. Descendants travel only with a
// cascading create.

use std::collections::HashSet;

use aci_api::WireNode;
use tracing::trace;

use crate::error::ValidationError;
use crate::model::{Action, Dn, ManagedObject};
use crate::resolve::{check_nesting, resolve_chain};

/// Encode one target below `ancestors` (outermost first).
///
/// `Action::None` falls back to the target's own action.
pub fn encode(
    target: &dyn ManagedObject,
    action: Action,
    ancestors: &[&dyn ManagedObject],
) -> Result<WireNode, ValidationError> {
    encode_batch(&[target], action, ancestors)
}

/// Encode several sibling targets under one shared ancestor chain.
///
/// The root of the returned tree is the outermost ancestor, or the target
/// itself when no ancestors are given. Sibling targets must resolve to
/// distinct DNs.
pub fn encode_batch(
    targets: &[&dyn ManagedObject],
    action: Action,
    ancestors: &[&dyn ManagedObject],
) -> Result<WireNode, ValidationError> {
    if targets.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if targets.len() > 1 && ancestors.is_empty() {
        return Err(ValidationError::BatchWithoutParent);
    }

    let ancestor_dns = resolve_chain(ancestors)?;

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(targets.len());
    for &target in targets {
        let dn = match (ancestors.last(), ancestor_dns.last()) {
            (Some(&parent), Some(parent_dn)) => {
                target.validate()?;
                check_nesting(parent, target)?;
                parent_dn.child(&target.rn())
            }
            _ => resolve_chain(&[target])?
                .pop()
                .ok_or(ValidationError::EmptyBatch)?,
        };
        if !seen.insert(dn.clone()) {
            return Err(ValidationError::Duplicate { dn: dn.to_string() });
        }

        let action = match action {
            Action::None => target.action(),
            other => other,
        };
        if action == Action::None {
            return Err(ValidationError::MissingAction);
        }
        nodes.push(encode_subtree(target, &dn, action)?);
    }

    // Wrap the targets in their ancestors, innermost first.
    let mut children = nodes;
    for (&ancestor, dn) in ancestors.iter().zip(&ancestor_dns).rev() {
        let mut node = encode_ancestor(ancestor, dn)?;
        node.children = children;
        children = vec![node];
    }

    let root = children
        .into_iter()
        .next()
        .ok_or(ValidationError::EmptyBatch)?;
    trace!(class = %root.class, dn = root.dn().unwrap_or_default(), "encoded delta tree");
    Ok(root)
}

fn encode_ancestor(ancestor: &dyn ManagedObject, dn: &Dn) -> Result<WireNode, ValidationError> {
    let node = WireNode::new(ancestor.class_name()).with_attribute("dn", dn.as_str());
    match ancestor.action() {
        Action::Deleted => Err(ValidationError::DeletedAncestor { dn: dn.to_string() }),
        action @ (Action::Created | Action::CreatedModified) => {
            Ok(with_attributes(node, ancestor).with_attribute("status", status(action)))
        }
        Action::None | Action::Modified => Ok(node.with_attribute("status", "modified")),
    }
}

/// Emit `object` with `action`. A creating action carries every modelled
/// child along, each with its own action or, failing that, the parent's.
fn encode_subtree(
    object: &dyn ManagedObject,
    dn: &Dn,
    action: Action,
) -> Result<WireNode, ValidationError> {
    let node = WireNode::new(object.class_name()).with_attribute("dn", dn.as_str());
    let mut node = with_attributes(node, object).with_attribute("status", status(action));

    if !action.creates() {
        return Ok(node);
    }

    let mut seen = HashSet::new();
    for child in object.children() {
        child.validate()?;
        check_nesting(object, child)?;
        let child_dn = dn.child(&child.rn());
        if !seen.insert(child_dn.clone()) {
            return Err(ValidationError::Duplicate {
                dn: child_dn.to_string(),
            });
        }
        let child_action = match child.action() {
            Action::None => action,
            own => own,
        };
        node.children
            .push(encode_subtree(child, &child_dn, child_action)?);
    }
    Ok(node)
}

fn with_attributes(mut node: WireNode, object: &dyn ManagedObject) -> WireNode {
    for (key, value) in object.attributes() {
        node.attributes.entry(key).or_insert(value);
    }
    node
}

fn status(action: Action) -> &'static str {
    action.status().unwrap_or("modified")
}
