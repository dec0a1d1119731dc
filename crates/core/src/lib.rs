//! Tilestore Core - Shared types and the catalog query layer.
//!
//! This crate provides the domain types used across all Tilestore components:
//! - `storefront` - Public-facing JSON storefront service
//! - `admin` - Internal catalog and order management service
//! - `cli` - Command-line tools (document database migrations)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses and the product/category/order models
//! - [`catalog`] - Filtering, sorting and pagination over a product collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use types::*;
