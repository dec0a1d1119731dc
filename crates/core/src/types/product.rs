//! Product catalog models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::price::Price;

/// A tile or sanitary-ware product as served by the backend API.
///
/// Products are read-only from the storefront's perspective; the admin
/// service creates and edits them through the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Category slug.
    #[serde(default)]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Surface finishes, e.g. "matt", "glossy".
    #[serde(default)]
    pub finishes: Vec<String>,
    /// Rooms the product suits, e.g. "bathroom", "kitchen".
    #[serde(default)]
    pub room_types: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A color/size combination of a product with its own image set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(alias = "_id")]
    pub id: VariantId,
    #[serde(default)]
    pub color: Option<String>,
    /// Nominal tile size, e.g. "600x600".
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Whether any stock is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Colors offered across all variants.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().filter_map(|v| v.color.as_deref())
    }

    /// Sizes offered across all variants.
    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().filter_map(|v| v.size.as_deref())
    }

    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_document() {
        let json = r#"{
            "_id": "665f0c9e2b1a",
            "name": "Ivory Matt",
            "slug": "ivory-matt",
            "category": "floor-tiles",
            "price": 80,
            "stock": 12,
            "finishes": ["matt"],
            "roomTypes": ["bathroom"],
            "variants": [
                {"_id": "v1", "color": "ivory", "size": "600x600", "images": ["a.jpg"]},
                {"_id": "v2", "color": "grey"}
            ]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "665f0c9e2b1a");
        assert_eq!(product.room_types, vec!["bathroom".to_string()]);
        assert!(product.tags.is_empty());
        assert!(product.in_stock());
        assert_eq!(product.colors().collect::<Vec<_>>(), vec!["ivory", "grey"]);
        assert_eq!(product.sizes().collect::<Vec<_>>(), vec!["600x600"]);
        assert!(product.variant(&VariantId::new("v2")).is_some());
    }
}
