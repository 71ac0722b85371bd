//! Domain models for the platform.
//!
//! Validated domain objects, separate from database row types (which live in
//! [`crate::db`]) and from Provider wire shapes (in [`crate::provider::types`]).

pub mod actor;
pub mod order;
pub mod tenant;

pub use actor::{CurrentActor, session_keys};
pub use order::{Order, OrderItem};
pub use tenant::Tenant;
