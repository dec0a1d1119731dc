//! Catalog query layer.
//!
//! Turns user-supplied filter, sort and pagination parameters into a
//! filtered, paginated view over a product collection.
//!
//! # Matching
//!
//! A product passes when it satisfies the keyword predicate AND the category
//! predicate AND the price range AND, for every non-empty multi-valued filter
//! (tags, finishes, colors, room types, sizes), its attribute intersects the
//! requested set. Values within one dimension are OR-ed; dimensions are AND-ed.
//!
//! # Pagination
//!
//! The total is counted before paging. Page `n` (1-based) holds items
//! `[(n-1)*limit, n*limit)`; a page past the end is empty, not an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilestore_core::catalog::{self, ProductFilter, PageRequest, SortOrder};
//!
//! let filter = ProductFilter {
//!     keyword: Some("ivory".into()),
//!     min_price: Some(Price::from_units(90)),
//!     ..ProductFilter::default()
//! };
//! let page = catalog::search(&products, &filter, SortOrder::Featured, PageRequest::new(1, 12)?);
//! println!("{} of {}", page.products.len(), page.total_products);
//! ```

mod filter;
mod page;
mod query;
mod sort;

pub use filter::ProductFilter;
pub use page::{CatalogPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageError, PageRequest};
pub use query::{CatalogQuery, split_list};
pub use sort::SortOrder;

use crate::types::Product;

/// Filter, sort and paginate `products`.
#[must_use]
pub fn search(
    products: &[Product],
    filter: &ProductFilter,
    sort: SortOrder,
    page: PageRequest,
) -> CatalogPage<Product> {
    let mut matched: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    sort.apply(&mut matched);

    let total_products = matched.len();
    let products = matched
        .into_iter()
        .skip(page.offset())
        .take(page.limit_usize())
        .cloned()
        .collect();

    CatalogPage {
        products,
        total_products,
        total_pages: page.total_pages(total_products),
        current_page: page.page(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Price, ProductId};

    fn product(name: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            slug: String::new(),
            description: String::new(),
            category: "floor-tiles".to_string(),
            price: Price::from_units(price),
            stock: 10,
            tags: Vec::new(),
            finishes: Vec::new(),
            room_types: Vec::new(),
            variants: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_keyword_and_min_price() {
        let products = vec![product("Ivory Matt", 80), product("Ivory Glossy", 120)];
        let filter = ProductFilter {
            keyword: Some("ivory".to_string()),
            min_price: Some(Price::from_units(90)),
            ..ProductFilter::default()
        };

        let page = search(
            &products,
            &filter,
            SortOrder::Featured,
            PageRequest::new(1, 12).unwrap(),
        );

        assert_eq!(page.total_products, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Ivory Glossy");
    }

    #[test]
    fn test_pages_split_results() {
        let products: Vec<_> = (1..=7).map(|i| product(&format!("Tile {i}"), i * 10)).collect();
        let filter = ProductFilter::default();

        let first = search(&products, &filter, SortOrder::Featured, PageRequest::new(1, 3).unwrap());
        let last = search(&products, &filter, SortOrder::Featured, PageRequest::new(3, 3).unwrap());
        let beyond = search(&products, &filter, SortOrder::Featured, PageRequest::new(4, 3).unwrap());

        assert_eq!(first.total_pages, 3);
        assert_eq!(
            first.products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["Tile 1", "Tile 2", "Tile 3"]
        );
        assert_eq!(last.products.len(), 1);
        assert_eq!(last.products[0].name, "Tile 7");
        assert!(beyond.products.is_empty());
        assert_eq!(beyond.total_products, 7);
        assert_eq!(beyond.current_page, 4);
    }

    #[test]
    fn test_sort_applies_before_paging() {
        let products = vec![product("B", 30), product("A", 10), product("C", 20)];
        let page = search(
            &products,
            &ProductFilter::default(),
            SortOrder::PriceDesc,
            PageRequest::new(1, 2).unwrap(),
        );
        assert_eq!(
            page.products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["B", "C"]
        );
    }

    #[test]
    fn test_no_matches_has_zero_pages() {
        let products = vec![product("Ivory Matt", 80)];
        let filter = ProductFilter {
            keyword: Some("onyx".to_string()),
            ..ProductFilter::default()
        };
        let page = search(&products, &filter, SortOrder::Featured, PageRequest::default());
        assert_eq!(page.total_products, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.products.is_empty());
    }
}
