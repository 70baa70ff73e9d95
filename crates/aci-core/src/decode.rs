// ── Tree decoder ──
//
// Rebuilds typed objects from response trees. Each class implements
// `FromWire` for itself; recursion into children goes back through the
// same trait, so one walk serves every hierarchy.

use aci_api::{MitResponse, WireNode};

use crate::error::{DecodeError, ValidationError};
use crate::model::Dn;

/// Construction of a typed object from one wire node and its subtree.
pub trait FromWire: Sized {
    fn from_wire(node: &WireNode) -> Result<Self, DecodeError>;
}

/// Decode a single wire node.
pub fn decode<T: FromWire>(node: &WireNode) -> Result<T, DecodeError> {
    T::from_wire(node)
}

/// Decode every top-level object of a response. Any mismatch fails the
/// whole response.
pub fn decode_all<T: FromWire>(response: &MitResponse) -> Result<Vec<T>, DecodeError> {
    response.imdata.iter().map(T::from_wire).collect()
}

// ── Helpers for FromWire impls ──────────────────────────────────────

pub(crate) fn expect_class(node: &WireNode, accepted: &[&str]) -> Result<(), DecodeError> {
    if accepted.contains(&node.class.as_str()) {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedClass {
            expected: accepted.join(" or "),
            found: node.class.clone(),
        })
    }
}

pub(crate) fn required<'a>(node: &'a WireNode, attribute: &str) -> Result<&'a str, DecodeError> {
    node.attribute(attribute)
        .ok_or_else(|| DecodeError::MissingAttribute {
            class: node.class.clone(),
            attribute: attribute.to_owned(),
        })
}

pub(crate) fn optional(node: &WireNode, attribute: &str) -> Option<String> {
    node.attribute(attribute).map(str::to_owned)
}

pub(crate) fn invalid(node: &WireNode, attribute: &str, source: ValidationError) -> DecodeError {
    DecodeError::InvalidAttribute {
        class: node.class.clone(),
        attribute: attribute.to_owned(),
        source,
    }
}

/// The `name` attribute, or the naming value from the `rn` attribute or
/// the last segment of `dn`.
pub(crate) fn name_or_rn(node: &WireNode, prefix: &str) -> Result<String, DecodeError> {
    if let Some(name) = node.attribute("name") {
        return Ok(name.to_owned());
    }
    node.attribute("rn")
        .map(str::to_owned)
        .or_else(|| node.dn().map(|dn| Dn::new(dn).rn().to_owned()))
        .and_then(|rn| {
            rn.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .map(str::to_owned)
        })
        .ok_or_else(|| DecodeError::MissingAttribute {
            class: node.class.clone(),
            attribute: "name".into(),
        })
}
