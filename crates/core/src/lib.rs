//! Larkspur Core - Shared types library.
//!
//! This crate provides common types used across all Larkspur components:
//! - `storefront` - Public-facing shop API
//! - `admin` - Internal back-office API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money, roles,
//!   and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
