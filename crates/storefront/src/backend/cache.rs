//! Cache types for backend API responses.

use std::sync::Arc;

use tilestore_core::{Category, Product};

/// Cache key for cached collections.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Categories,
}

/// Cached value types. Collections are shared, never cloned per request.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Categories(Arc<Vec<Category>>),
}
