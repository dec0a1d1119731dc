//! Discount coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CouponId;
use super::price::Price;

/// Reasons a coupon cannot be applied to an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponError {
    #[error("coupon {0} is not active")]
    Inactive(String),
    #[error("coupon {0} has expired")]
    Expired(String),
    #[error("coupon {code} requires a minimum order of {minimum}")]
    BelowMinimum { code: String, minimum: Price },
    #[error("percentage discount must be between 0 and 100 (got {0})")]
    InvalidPercentage(Decimal),
}

/// How a coupon reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the subtotal, `0..=100`.
    Percentage(Decimal),
    /// Fixed amount off, capped at the subtotal.
    Fixed(Price),
}

impl DiscountKind {
    /// Check that a percentage lies within `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidPercentage`] otherwise.
    pub fn validate(&self) -> Result<(), CouponError> {
        match *self {
            Self::Percentage(percent) if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED => {
                Err(CouponError::InvalidPercentage(percent))
            }
            _ => Ok(()),
        }
    }
}

/// A discount coupon managed through the admin service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(alias = "_id")]
    pub id: CouponId,
    pub code: String,
    pub discount: DiscountKind,
    #[serde(default)]
    pub min_order: Option<Price>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl Coupon {
    /// Normalize a user-entered code for comparison and storage.
    #[must_use]
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }

    /// Whether this coupon matches a user-entered code (case-insensitive).
    #[must_use]
    pub fn matches_code(&self, code: &str) -> bool {
        Self::normalize_code(&self.code) == Self::normalize_code(code)
    }

    /// Check the discount definition itself.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidPercentage`] for percentages outside `0..=100`.
    pub fn validate(&self) -> Result<(), CouponError> {
        self.discount.validate()
    }

    /// Compute the discount this coupon gives on `subtotal` at time `now`.
    ///
    /// The discount never exceeds the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] if the coupon is inactive, expired, or the
    /// subtotal is below the coupon's minimum order.
    pub fn discount_for(&self, subtotal: Price, now: DateTime<Utc>) -> Result<Price, CouponError> {
        if !self.is_active {
            return Err(CouponError::Inactive(self.code.clone()));
        }
        if self.expires_at.is_some_and(|expires| expires <= now) {
            return Err(CouponError::Expired(self.code.clone()));
        }
        if let Some(minimum) = self.min_order
            && subtotal < minimum
        {
            return Err(CouponError::BelowMinimum {
                code: self.code.clone(),
                minimum,
            });
        }
        self.validate()?;

        let discount = match self.discount {
            DiscountKind::Percentage(percent) => subtotal.percent(percent),
            DiscountKind::Fixed(amount) => amount.min(subtotal),
        };
        Ok(discount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn coupon(discount: DiscountKind) -> Coupon {
        Coupon {
            id: CouponId::new("c1"),
            code: "TILE10".to_string(),
            discount,
            min_order: None,
            expires_at: None,
            is_active: true,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = coupon(DiscountKind::Percentage(Decimal::from(10)));
        let discount = coupon
            .discount_for(Price::from_units(250), Utc::now())
            .unwrap();
        assert_eq!(discount, Price::from_units(25));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let coupon = coupon(DiscountKind::Fixed(Price::from_units(500)));
        let discount = coupon
            .discount_for(Price::from_units(120), Utc::now())
            .unwrap();
        assert_eq!(discount, Price::from_units(120));
    }

    #[test]
    fn test_inactive_and_expired() {
        let now = Utc::now();
        let mut inactive = coupon(DiscountKind::Fixed(Price::from_units(5)));
        inactive.is_active = false;
        assert!(matches!(
            inactive.discount_for(Price::from_units(50), now),
            Err(CouponError::Inactive(_))
        ));

        let mut expired = coupon(DiscountKind::Fixed(Price::from_units(5)));
        expired.expires_at = Some(now - Duration::hours(1));
        assert!(matches!(
            expired.discount_for(Price::from_units(50), now),
            Err(CouponError::Expired(_))
        ));
    }

    #[test]
    fn test_minimum_order() {
        let mut coupon = coupon(DiscountKind::Fixed(Price::from_units(5)));
        coupon.min_order = Some(Price::from_units(100));
        let err = coupon
            .discount_for(Price::from_units(99), Utc::now())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "coupon TILE10 requires a minimum order of 100.00"
        );
        assert!(coupon.discount_for(Price::from_units(100), Utc::now()).is_ok());
    }

    #[test]
    fn test_code_matching_is_case_insensitive() {
        let coupon = coupon(DiscountKind::Fixed(Price::from_units(5)));
        assert!(coupon.matches_code(" tile10 "));
        assert!(!coupon.matches_code("TILE20"));
    }

    #[test]
    fn test_invalid_percentage() {
        let coupon = coupon(DiscountKind::Percentage(Decimal::from(150)));
        assert!(matches!(
            coupon.validate(),
            Err(CouponError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn test_discount_serde_shape() {
        let json = serde_json::to_value(DiscountKind::Percentage(Decimal::from(15))).unwrap();
        assert_eq!(json["type"], "percentage");
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = r#"{"_id": "k9", "code": "WELCOME", "discount": {"type": "fixed", "value": "100"}}"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert!(coupon.is_active);
        assert!(coupon.discount_for(Price::from_units(500), Utc::now()).is_ok());
    }
}
