//! Typed access to the Cisco APIC Management Information Tree.
//!
//! Managed objects are modelled as plain Rust values implementing
//! [`ManagedObject`]. Their DNs are derived from the ancestor chain the
//! caller supplies ([`resolve_dn`]), turned into delta trees by
//! [`encode`], and rebuilt from responses by [`decode`]. [`Client`] wraps
//! an `aci_api::ApicClient` session with typed add/update/delete/list
//! operations per object kind.
//!
//! ```no_run
//! # async fn run() -> Result<(), aci_core::CoreError> {
//! use aci_core::{FabricNode, NodeId, PodId, SerialNumber};
//! use secrecy::SecretString;
//!
//! let client = aci_core::connect("apic1.example.com", "admin", SecretString::from("pw"))?;
//! client.login().await?;
//!
//! let node = FabricNode::new(
//!     "leaf-101",
//!     NodeId::new(101)?,
//!     PodId::new(1)?,
//!     SerialNumber::new("FOC0849N1BD")?,
//! )?;
//! client.add_nodes(&[node]).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod model;
pub mod resolve;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{Client, connect};
pub use config::{ClientConfig, TlsVerification};
pub use decode::{FromWire, decode, decode_all};
pub use encode::{encode, encode_batch};
pub use error::{CoreError, DecodeError, ValidationError};
pub use resolve::{resolve_dn, resolve_rn};

pub use model::{
    Action, Dn, FabricNode, Location, LocationLevel, ManagedObject, NodeDecommission, NodeId,
    NodeIdentityPolicy, NodeRole, OutOfServicePolicy, PodId, SerialNumber, Tenant, Vrf,
};

// Transport types that appear in this crate's public API.
pub use aci_api::{ApiError, ApiErrorKind, LoginInfo, MitResponse, SessionState, WireNode};
