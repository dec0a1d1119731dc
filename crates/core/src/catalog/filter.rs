//! Product filter predicates.

use crate::types::{Price, Product};

/// Active filter criteria. Empty lists and `None` values impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub keyword: Option<String>,
    /// Category slug, compared case-insensitively.
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub finishes: Vec<String>,
    pub colors: Vec<String>,
    pub room_types: Vec<String>,
    pub sizes: Vec<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Whether no criterion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyword().is_none()
            && self.category().is_none()
            && self.tags.is_empty()
            && self.finishes.is_empty()
            && self.colors.is_empty()
            && self.room_types.is_empty()
            && self.sizes.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Whether `product` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_keyword(product)
            && self.matches_category(product)
            && self.matches_price(product)
            && intersects(&self.tags, product.tags.iter().map(String::as_str))
            && intersects(&self.finishes, product.finishes.iter().map(String::as_str))
            && intersects(&self.colors, product.colors())
            && intersects(&self.room_types, product.room_types.iter().map(String::as_str))
            && intersects(&self.sizes, product.sizes())
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    fn matches_keyword(&self, product: &Product) -> bool {
        self.keyword().is_none_or(|keyword| {
            fold(&product.name).contains(&fold(keyword))
        })
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category()
            .is_none_or(|category| fold(&product.category) == fold(category))
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

/// OR within a dimension: an empty wanted set always passes.
/// Case-insensitive comparison key, shared by every predicate.
fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

fn intersects<'a>(wanted: &[String], mut values: impl Iterator<Item = &'a str>) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let wanted: Vec<String> = wanted.iter().map(|w| fold(w)).collect();
    values.any(|value| wanted.contains(&fold(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Variant, VariantId};

    fn tile() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Carrara Marble Look".to_string(),
            slug: "carrara-marble-look".to_string(),
            description: String::new(),
            category: "Wall-Tiles".to_string(),
            price: Price::from_units(95),
            stock: 4,
            tags: vec!["bestseller".to_string()],
            finishes: vec!["glossy".to_string()],
            room_types: vec!["bathroom".to_string(), "kitchen".to_string()],
            variants: vec![
                Variant {
                    id: VariantId::new("v1"),
                    color: Some("White".to_string()),
                    size: Some("300x600".to_string()),
                    images: Vec::new(),
                },
                Variant {
                    id: VariantId::new("v2"),
                    color: Some("Grey".to_string()),
                    size: None,
                    images: Vec::new(),
                },
            ],
            created_at: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ProductFilter {
            keyword: Some("   ".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&tile()));
    }

    #[test]
    fn test_keyword_is_case_insensitive_substring() {
        let filter = ProductFilter {
            keyword: Some("MARBLE".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&tile()));

        let filter = ProductFilter {
            keyword: Some("onyx".to_string()),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&tile()));
    }

    #[test]
    fn test_category_match() {
        let filter = ProductFilter {
            category: Some("wall-tiles".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&tile()));

        let filter = ProductFilter {
            category: Some("floor-tiles".to_string()),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&tile()));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = ProductFilter {
            min_price: Some(Price::from_units(95)),
            max_price: Some(Price::from_units(95)),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&tile()));

        let filter = ProductFilter {
            max_price: Some(Price::from_units(94)),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&tile()));
    }

    #[test]
    fn test_or_within_and_across_dimensions() {
        let filter = ProductFilter {
            colors: vec!["black".to_string(), "grey".to_string()],
            room_types: vec!["kitchen".to_string()],
            ..ProductFilter::default()
        };
        assert!(filter.matches(&tile()));

        let filter = ProductFilter {
            colors: vec!["grey".to_string()],
            finishes: vec!["matt".to_string()],
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&tile()));
    }

    #[test]
    fn test_non_ascii_values_fold_like_keywords() {
        let mut product = tile();
        product.variants[0].color = Some("Écru".to_string());
        product.category = "Façade".to_string();

        let filter = ProductFilter {
            keyword: Some("CARRARA".to_string()),
            category: Some("FAÇADE".to_string()),
            colors: vec!["écru".to_string()],
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product));
    }

    #[test]
    fn test_sizes_come_from_variants() {
        let filter = ProductFilter {
            sizes: vec!["300X600".to_string()],
            ..ProductFilter::default()
        };
        assert!(filter.matches(&tile()));

        let filter = ProductFilter {
            sizes: vec!["600x600".to_string()],
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&tile()));
    }
}
