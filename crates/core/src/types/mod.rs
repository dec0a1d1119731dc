//! Core types for Tilestore.
//!
//! This module provides type-safe wrappers and models for the store's
//! domain concepts.

pub mod cart;
pub mod category;
pub mod coupon;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartError, CartLine, SessionKey, Wishlist};
pub use category::{Category, slugify};
pub use coupon::{Coupon, CouponError, DiscountKind};
pub use id::*;
pub use order::{NewOrder, Order, OrderLine, OrderTotals, ShippingInfo, ShippingInfoError};
pub use price::{Price, PriceError};
pub use product::{Product, Variant};
pub use status::*;
