//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Listing/search over the cached product collection, categories
//! - `cart` - Joins session cart lines with catalog data for display
//! - `checkout` - Turns a cart into an order payload

pub mod cart;
pub mod catalog;
pub mod checkout;
