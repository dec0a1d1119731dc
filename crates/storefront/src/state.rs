//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::StorefrontConfig;
use crate::store::{CartStore, InMemoryStore, WishlistStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers the backend client and the
/// session-scoped stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    wishlists: Arc<dyn WishlistStore>,
    carts: Arc<dyn CartStore>,
}

impl AppState {
    /// Create state backed by the in-memory wishlist/cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let store = Arc::new(InMemoryStore::new());
        Self::with_stores(config, store.clone(), store)
    }

    /// Create state with caller-provided stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn with_stores(
        config: StorefrontConfig,
        wishlists: Arc<dyn WishlistStore>,
        carts: Arc<dyn CartStore>,
    ) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend, config.catalog_cache_ttl)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                wishlists,
                carts,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Wishlist storage.
    #[must_use]
    pub fn wishlists(&self) -> &dyn WishlistStore {
        self.inner.wishlists.as_ref()
    }

    /// Cart storage.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.carts.as_ref()
    }
}
