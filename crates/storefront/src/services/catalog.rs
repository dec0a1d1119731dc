//! Catalog listing and category lookups.

use std::collections::HashMap;

use tilestore_core::catalog::{self, CatalogPage, CatalogQuery, PageError};
use tilestore_core::{Category, Product, ProductId};
use tracing::instrument;

use crate::backend::{BackendClient, BackendError};

/// Run a catalog query over the backend's product collection.
///
/// A failed fetch is logged and served as an empty page; only an invalid
/// page request is an error.
///
/// # Errors
///
/// Returns [`PageError`] if the page or limit is zero.
#[instrument(skip(backend, query), fields(page = ?query.page, limit = ?query.limit))]
pub async fn list_products(
    backend: &BackendClient,
    query: &CatalogQuery,
) -> Result<CatalogPage<Product>, PageError> {
    let page = query.page_request()?;

    let products = match backend.get_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products, serving empty catalog");
            return Ok(CatalogPage::empty(page.page()));
        }
    };

    Ok(catalog::search(&products, &query.filter(), query.sort, page))
}

/// Active categories in display order.
///
/// # Errors
///
/// Returns an error if the categories cannot be fetched.
pub async fn active_categories(backend: &BackendClient) -> Result<Vec<Category>, BackendError> {
    let categories = backend.get_categories().await?;
    Ok(visible_categories(&categories))
}

fn visible_categories(categories: &[Category]) -> Vec<Category> {
    let mut visible: Vec<Category> = categories.iter().filter(|c| c.is_active).cloned().collect();
    visible.sort_by(Category::display_order);
    visible
}

/// Find a product in the (cached) collection by id.
///
/// # Errors
///
/// Returns an error if the collection cannot be fetched.
pub async fn find_product(
    backend: &BackendClient,
    id: &ProductId,
) -> Result<Option<Product>, BackendError> {
    let products = backend.get_products().await?;
    Ok(products.iter().find(|p| &p.id == id).cloned())
}

/// Look up `ids` in `products`, keeping the order of `ids` and skipping ids
/// that are no longer in the catalog.
#[must_use]
pub fn resolve_products<'a>(products: &'a [Product], ids: &[ProductId]) -> Vec<&'a Product> {
    let by_id: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();
    ids.iter().filter_map(|id| by_id.get(id).copied()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tilestore_core::{CategoryId, Price};

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            slug: id.to_string(),
            description: String::new(),
            category: "floor".to_string(),
            price: Price::from_units(10),
            stock: 1,
            tags: vec![],
            finishes: vec![],
            room_types: vec![],
            variants: vec![],
            created_at: None,
        }
    }

    fn category(name: &str, level: u8, weight: i32, is_active: bool) -> Category {
        Category {
            id: CategoryId::new(name),
            name: name.to_string(),
            slug: tilestore_core::slugify(name),
            parent: None,
            level,
            weight,
            is_active,
        }
    }

    #[test]
    fn test_resolve_products_keeps_order_and_skips_missing() {
        let products = vec![product("a"), product("b"), product("c")];
        let ids = vec![ProductId::new("c"), ProductId::new("gone"), ProductId::new("a")];

        let resolved: Vec<_> = resolve_products(&products, &ids)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(resolved, vec!["c", "a"]);
    }

    #[test]
    fn test_visible_categories_hides_inactive_and_sorts() {
        let categories = vec![
            category("Wall", 0, 2, true),
            category("Clearance", 0, 0, false),
            category("Floor", 0, 1, true),
        ];

        let names: Vec<_> = visible_categories(&categories)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Floor", "Wall"]);
    }
}
