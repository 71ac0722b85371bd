//! Core types for Herba.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credentials;
pub mod email;
pub mod id;
pub mod status;

pub use credentials::ProviderCredentials;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
