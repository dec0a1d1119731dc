//! In-memory wishlist/cart store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tilestore_core::{Cart, ProductId, SessionKey, VariantId, Wishlist};
use tokio::sync::RwLock;

use super::{CartStore, StoreResult, WishlistStore};

/// Process-local store. Every mutation happens under a single write lock, so
/// concurrent requests for the same session never lose updates.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    wishlists: Arc<RwLock<HashMap<SessionKey, Wishlist>>>,
    carts: Arc<RwLock<HashMap<SessionKey, Cart>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistStore for InMemoryStore {
    async fn wishlist(&self, session: SessionKey) -> StoreResult<Wishlist> {
        let wishlists = self.wishlists.read().await;
        Ok(wishlists.get(&session).cloned().unwrap_or_default())
    }

    async fn add_to_wishlist(
        &self,
        session: SessionKey,
        product_id: ProductId,
    ) -> StoreResult<bool> {
        let mut wishlists = self.wishlists.write().await;
        Ok(wishlists.entry(session).or_default().add(product_id))
    }

    async fn remove_from_wishlist(
        &self,
        session: SessionKey,
        product_id: &ProductId,
    ) -> StoreResult<bool> {
        let mut wishlists = self.wishlists.write().await;
        let Some(wishlist) = wishlists.get_mut(&session) else {
            return Ok(false);
        };
        let removed = wishlist.remove(product_id);
        if wishlist.is_empty() {
            wishlists.remove(&session);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn cart(&self, session: SessionKey) -> StoreResult<Cart> {
        let carts = self.carts.read().await;
        Ok(carts.get(&session).cloned().unwrap_or_default())
    }

    async fn add_to_cart(
        &self,
        session: SessionKey,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        quantity: u32,
    ) -> StoreResult<Cart> {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(session).or_default();
        if let Err(err) = cart.add(product_id, variant_id, quantity) {
            if cart.is_empty() {
                carts.remove(&session);
            }
            return Err(err.into());
        }
        Ok(cart.clone())
    }

    async fn set_quantity(
        &self,
        session: SessionKey,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> StoreResult<Option<Cart>> {
        let mut carts = self.carts.write().await;
        let Some(cart) = carts.get_mut(&session) else {
            return Ok(None);
        };
        if !cart.set_quantity(product_id, variant_id, quantity)? {
            return Ok(None);
        }
        let updated = cart.clone();
        if updated.is_empty() {
            carts.remove(&session);
        }
        Ok(Some(updated))
    }

    async fn remove_from_cart(
        &self,
        session: SessionKey,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> StoreResult<bool> {
        let mut carts = self.carts.write().await;
        let Some(cart) = carts.get_mut(&session) else {
            return Ok(false);
        };
        let removed = cart.remove(product_id, variant_id);
        if cart.is_empty() {
            carts.remove(&session);
        }
        Ok(removed)
    }

    async fn clear_cart(&self, session: SessionKey) -> StoreResult<()> {
        self.carts.write().await.remove(&session);
        Ok(())
    }
}
