//! Herba Core - Shared types library.
//!
//! This crate provides common types used across all Herba components:
//! - `platform` - Multi-tenant storefront server
//! - `cli` - Command-line tools for migrations and tenant management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, statuses, and
//!   Provider credentials
//! - `crypto` (feature `crypto`) - AES-256-GCM encryption of tenant Provider
//!   secrets at rest, shared by the platform (decrypt) and the CLI (encrypt)

#![cfg_attr(not(test), forbid(unsafe_code))]

#[cfg(feature = "crypto")]
pub mod crypto;
pub mod types;

pub use types::*;
