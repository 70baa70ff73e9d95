// ── Managed-object capability ──
//
// Every concrete class describes itself through this trait: its class
// name, how its RN is formed, where it may sit in the tree, and which
// attributes it carries. Resolution, encoding and decoding are written
// once against it.

use aci_api::Attributes;

use super::action::Action;
use crate::error::ValidationError;

pub trait ManagedObject: Send + Sync {
    /// MIT class, e.g. `fvTenant`.
    fn class_name(&self) -> &'static str;

    /// RN prefix, e.g. `tn` for `tn-<name>`.
    fn rn_prefix(&self) -> &'static str;

    /// The naming value appended to the prefix. Singletons return an
    /// empty string and use the bare prefix as their RN.
    fn naming_value(&self) -> String;

    fn rn(&self) -> String {
        let value = self.naming_value();
        if value.is_empty() {
            self.rn_prefix().to_owned()
        } else {
            format!("{}-{value}", self.rn_prefix())
        }
    }

    fn action(&self) -> Action {
        Action::None
    }

    /// Fixed DN of this class's parent when it has no modelled parent
    /// object. Objects without an anchor must be given one as an ancestor.
    fn anchor(&self) -> Option<&'static str> {
        None
    }

    /// Whether an object of `class` may be a direct child of this one.
    fn accepts_child(&self, _class: &str) -> bool {
        false
    }

    /// Check identifier rules for this object alone.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Wire attributes without `dn` and `status`.
    fn attributes(&self) -> Attributes;

    /// Modelled children, in order.
    fn children(&self) -> Vec<&dyn ManagedObject> {
        Vec::new()
    }
}

impl std::fmt::Debug for dyn ManagedObject + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.class_name(), self.rn())
    }
}
