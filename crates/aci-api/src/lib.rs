// aci-api: Async Rust transport for the Cisco APIC REST API

pub mod auth;
pub mod client;
pub mod error;
mod session;
pub mod transport;
pub mod wire;

pub use auth::{Credentials, LoginInfo, SessionState};
pub use client::ApicClient;
pub use error::{ApiError, ApiErrorKind, Error, ErrorDetail};
pub use transport::{TlsMode, TransportConfig};
pub use wire::{Attributes, MitResponse, WireNode};
