//! Orders and checkout payloads.
//!
//! Orders are created at checkout, mutated only through admin status
//! transitions, and never deleted. Line prices are snapshots taken at the
//! time of purchase so later catalog edits do not change past orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, OrderId, ProductId, VariantId};
use super::price::Price;
use super::status::{OrderStatus, PaymentStatus};

/// Errors from validating shipping details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingInfoError {
    #[error("shipping field `{0}` is required")]
    MissingField(&'static str),
    #[error("phone number must contain 7 to 15 digits")]
    InvalidPhone,
}

/// Where and to whom an order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingInfo {
    /// Check that all required fields are present and the phone is plausible.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ShippingInfoError> {
        let required = [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("addressLine1", &self.address_line1),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ShippingInfoError::MissingField(name));
            }
        }

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !(7..=15).contains(&digits) {
            return Err(ShippingInfoError::InvalidPhone);
        }
        Ok(())
    }
}

/// A purchased line with its price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderLine {
    /// Quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Order money breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Price,
    pub discount: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Compute totals for `lines`, subtracting `discount` (clamped so the
    /// total never goes negative).
    #[must_use]
    pub fn compute(lines: &[OrderLine], discount: Price) -> Self {
        let subtotal: Price = lines.iter().map(OrderLine::line_total).sum();
        let discount = discount.min(subtotal);
        Self {
            subtotal,
            discount,
            total: subtotal.saturating_sub(discount),
        }
    }
}

/// The payload the storefront posts to the backend at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
