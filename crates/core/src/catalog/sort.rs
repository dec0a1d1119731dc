//! Catalog sort orders.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Requested ordering of catalog results. Sorting is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Backend order (merchandised).
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    /// Most recently created first; undated products last.
    Newest,
}

impl SortOrder {
    /// Sort `products` in place.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::Featured => {}
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::NameAsc => products.sort_by_cached_key(|p| p.name.to_lowercase()),
            Self::Newest => products.sort_by(|a, b| match (a.created_at, b.created_at) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{Price, ProductId};

    fn product(name: &str, price: u32, day: Option<u32>) -> Product {
        Product {
            id: ProductId::new(name),
            name: name.to_string(),
            slug: String::new(),
            description: String::new(),
            category: String::new(),
            price: Price::from_units(price),
            stock: 1,
            tags: Vec::new(),
            finishes: Vec::new(),
            room_types: Vec::new(),
            variants: Vec::new(),
            created_at: day.and_then(|d| Utc.with_ymd_and_hms(2026, 1, d, 0, 0, 0).single()),
        }
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_price_sorts_are_stable() {
        let a = product("a", 20, None);
        let b = product("b", 10, None);
        let c = product("c", 20, None);

        let mut asc = vec![&a, &b, &c];
        SortOrder::PriceAsc.apply(&mut asc);
        assert_eq!(names(&asc), vec!["b", "a", "c"]);

        let mut desc = vec![&a, &b, &c];
        SortOrder::PriceDesc.apply(&mut desc);
        assert_eq!(names(&desc), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let a = product("beige", 1, None);
        let b = product("Almond", 1, None);
        let mut products = vec![&a, &b];
        SortOrder::NameAsc.apply(&mut products);
        assert_eq!(names(&products), vec!["Almond", "beige"]);
    }

    #[test]
    fn test_newest_puts_undated_last() {
        let old = product("old", 1, Some(1));
        let undated = product("undated", 1, None);
        let new = product("new", 1, Some(20));
        let mut products = vec![&old, &undated, &new];
        SortOrder::Newest.apply(&mut products);
        assert_eq!(names(&products), vec!["new", "old", "undated"]);
    }
}
