// ── Domain model ──
//
// Managed-object classes handled by this crate, plus the naming and
// status types they share.

pub mod action;
pub mod dn;
pub mod mo;
pub mod validate;

pub mod location;
pub mod node;
pub mod tenant;

// ── Re-exports ──────────────────────────────────────────────────────

pub use action::Action;
pub use dn::Dn;
pub use mo::ManagedObject;

pub use location::{Location, LocationLevel};
pub use node::{
    FabricNode, NodeDecommission, NodeId, NodeIdentityPolicy, NodeRole, OutOfServicePolicy, PodId,
    SerialNumber,
};
pub use tenant::{Tenant, Vrf};
