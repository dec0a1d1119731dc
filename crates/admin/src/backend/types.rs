//! Write payloads sent to the backend.
//!
//! Each input is normalized before it leaves the admin service: slugs are
//! derived when missing, coupon codes are upper-cased, blank names rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tilestore_core::{
    CategoryId, Coupon, CouponError, DiscountKind, OrderStatus, Price, slugify,
};

/// Product variant as submitted by an admin (ids are assigned by the backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub room_types: Vec<String>,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

impl ProductInput {
    /// Trim fields and derive the slug from the name when absent.
    ///
    /// # Errors
    ///
    /// Returns a message if the name, slug or category is blank.
    pub fn normalize(mut self) -> Result<Self, String> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        if self.name.is_empty() {
            return Err("product name is required".to_string());
        }
        if self.category.is_empty() {
            return Err("product category is required".to_string());
        }
        self.slug = Some(normalize_slug(self.slug.as_deref(), &self.name)?);
        Ok(self)
    }
}

/// Create/update payload for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub weight: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CategoryInput {
    /// Trim the name and derive the slug when absent.
    ///
    /// # Errors
    ///
    /// Returns a message if the name or resulting slug is blank, or a
    /// top-level category claims a non-zero level.
    pub fn normalize(mut self) -> Result<Self, String> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err("category name is required".to_string());
        }
        if self.parent.is_none() && self.level != 0 {
            return Err("a category without a parent must have level 0".to_string());
        }
        if self.parent.is_some() && self.level == 0 {
            self.level = 1;
        }
        self.slug = Some(normalize_slug(self.slug.as_deref(), &self.name)?);
        Ok(self)
    }
}

/// Create payload for a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInput {
    pub code: String,
    pub discount: DiscountKind,
    #[serde(default)]
    pub min_order: Option<Price>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CouponInput {
    /// Upper-case the code and check the discount.
    ///
    /// # Errors
    ///
    /// Returns a message for a blank code or an out-of-range percentage.
    pub fn normalize(mut self) -> Result<Self, String> {
        self.code = Coupon::normalize_code(&self.code);
        if self.code.is_empty() {
            return Err("coupon code is required".to_string());
        }
        if self.code.contains(char::is_whitespace) {
            return Err("coupon code cannot contain spaces".to_string());
        }
        self.discount
            .validate()
            .map_err(|e: CouponError| e.to_string())?;
        Ok(self)
    }
}

/// Body of an order status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

const fn default_true() -> bool {
    true
}

fn normalize_slug(requested: Option<&str>, name: &str) -> Result<String, String> {
    let slug = slugify(requested.filter(|s| !s.trim().is_empty()).unwrap_or(name));
    if slug.is_empty() {
        return Err("slug must contain at least one letter or digit".to_string());
    }
    Ok(slug)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn category(name: &str, slug: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            slug: slug.map(String::from),
            parent: None,
            level: 0,
            weight: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_category_slug_derived_from_name() {
        let input = category("  Wall Tiles ", None).normalize().unwrap();
        assert_eq!(input.name, "Wall Tiles");
        assert_eq!(input.slug.as_deref(), Some("wall-tiles"));
    }

    #[test]
    fn test_category_explicit_slug_is_normalized() {
        let input = category("Bathroom", Some("Bath Room")).normalize().unwrap();
        assert_eq!(input.slug.as_deref(), Some("bath-room"));
    }

    #[test]
    fn test_category_rejects_unsluggable_name() {
        assert!(category("???", None).normalize().is_err());
        assert!(category("   ", None).normalize().is_err());
    }

    #[test]
    fn test_child_category_level() {
        let mut input = category("Bathroom", None);
        input.parent = Some(CategoryId::new("wall"));
        assert_eq!(input.normalize().unwrap().level, 1);

        let mut orphan = category("Bathroom", None);
        orphan.level = 2;
        assert!(orphan.normalize().is_err());
    }

    #[test]
    fn test_coupon_code_is_uppercased_and_percentage_checked() {
        let input = CouponInput {
            code: " summer10 ".to_string(),
            discount: DiscountKind::Percentage(Decimal::from(10)),
            min_order: None,
            expires_at: None,
            is_active: true,
        };
        assert_eq!(input.clone().normalize().unwrap().code, "SUMMER10");

        let too_much = CouponInput {
            discount: DiscountKind::Percentage(Decimal::from(101)),
            ..input
        };
        assert!(too_much.normalize().is_err());
    }

    #[test]
    fn test_product_requires_name_and_category() {
        let json = r#"{"name": "Ivory Matt 600x600", "category": "floor", "price": "80"}"#;
        let input: ProductInput = serde_json::from_str(json).unwrap();
        let input = input.normalize().unwrap();
        assert_eq!(input.slug.as_deref(), Some("ivory-matt-600x600"));

        let json = r#"{"name": "Ivory", "category": " ", "price": "80"}"#;
        let input: ProductInput = serde_json::from_str(json).unwrap();
        assert!(input.normalize().is_err());
    }
}
