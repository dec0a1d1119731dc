//! Session-scoped wishlist and cart storage.
//!
//! Handlers receive the visitor's [`SessionKey`] explicitly and pass it to a
//! store; no store holds ambient per-request state. The only implementation
//! shipped is [`InMemoryStore`], which does not survive restarts and is not
//! shared between instances.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use tilestore_core::{Cart, CartError, ProductId, SessionKey, VariantId, Wishlist};

/// Errors from wishlist/cart storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested cart change is invalid.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Wishlist persistence keyed by session.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// The session's wishlist (empty if none).
    async fn wishlist(&self, session: SessionKey) -> StoreResult<Wishlist>;

    /// Add a product. Returns `false` if it was already present.
    async fn add_to_wishlist(&self, session: SessionKey, product_id: ProductId)
    -> StoreResult<bool>;

    /// Remove a product. Returns whether it was present.
    async fn remove_from_wishlist(
        &self,
        session: SessionKey,
        product_id: &ProductId,
    ) -> StoreResult<bool>;
}

/// Cart persistence keyed by session.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The session's cart (empty if none).
    async fn cart(&self, session: SessionKey) -> StoreResult<Cart>;

    /// Add items, merging with an existing line for the same product/variant.
    async fn add_to_cart(
        &self,
        session: SessionKey,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        quantity: u32,
    ) -> StoreResult<Cart>;

    /// Set a line's quantity (zero removes it). Returns `None` if the line
    /// does not exist.
    async fn set_quantity(
        &self,
        session: SessionKey,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> StoreResult<Option<Cart>>;

    /// Remove a line. Returns whether it existed.
    async fn remove_from_cart(
        &self,
        session: SessionKey,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> StoreResult<bool>;

    /// Empty the cart.
    async fn clear_cart(&self, session: SessionKey) -> StoreResult<()>;
}
