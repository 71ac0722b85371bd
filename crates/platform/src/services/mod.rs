//! Tenant-scoped integration services.
//!
//! Each service composes the same pipeline: resolve the tenant row from the
//! request's tenant reference, resolve that tenant's Provider credentials,
//! then delegate to the Provider. Every dependency is behind a trait so the
//! Provider client and the store can be doubled in tests.

pub mod audit;
pub mod cart;
pub mod credentials;
pub mod directory;
pub mod orders;

pub use audit::{AuditEntry, AuditSink};
pub use cart::{CartError, CartService};
pub use credentials::{CredentialError, CredentialSource, CredentialVault};
pub use directory::{PgTenantDirectory, TenantDirectory};
pub use orders::{OrderError, OrderService};
