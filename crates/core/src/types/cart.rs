//! Session-scoped cart and wishlist state.
//!
//! Both are ephemeral: they associate an anonymous session with product ids
//! and carry no durability guarantee.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{ProductId, VariantId};

/// Maximum quantity of a single cart line.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Anonymous session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(Uuid);

impl SessionKey {
    /// Generate a fresh random session key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for SessionKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("quantity cannot exceed {MAX_LINE_QUANTITY}")]
    TooMany,
}

/// One product (and optional variant) in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

impl CartLine {
    fn is(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        &self.product_id == product_id && self.variant_id.as_ref() == variant_id
    }
}

/// A session's cart. Lines keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` of a product. An existing line for the same
    /// product/variant pair has its quantity increased instead.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity and
    /// [`CartError::TooMany`] if the line would exceed [`MAX_LINE_QUANTITY`].
    pub fn add(
        &mut self,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.is(&product_id, variant_id.as_ref()))
        {
            let total = line.quantity.saturating_add(quantity);
            if total > MAX_LINE_QUANTITY {
                return Err(CartError::TooMany);
            }
            line.quantity = total;
            return Ok(());
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::TooMany);
        }
        self.lines.push(CartLine {
            product_id,
            variant_id,
            quantity,
        });
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line. Returns whether a line
    /// was found.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TooMany`] above [`MAX_LINE_QUANTITY`].
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove(product_id, variant_id));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::TooMany);
        }
        match self.lines.iter_mut().find(|l| l.is(product_id, variant_id)) {
            Some(line) => {
                line.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line. Returns whether it existed.
    pub fn remove(&mut self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.is(product_id, variant_id));
        self.lines.len() != before
    }

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A session's wishlist: a set of product ids in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<ProductId>);

impl Wishlist {
    /// Add a product. Returns `false` if it was already present.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        self.0.push(product_id);
        true
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| id != product_id);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.0.contains(product_id)
    }

    #[must_use]
    pub fn product_ids(&self) -> &[ProductId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_same_product_sums_quantities() {
        let mut cart = Cart::default();
        cart.add(pid("p1"), None, 2).unwrap();
        cart.add(pid("p1"), None, 3).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_variants_are_separate_lines() {
        let mut cart = Cart::default();
        cart.add(pid("p1"), Some(VariantId::new("ivory")), 1).unwrap();
        cart.add(pid("p1"), Some(VariantId::new("grey")), 1).unwrap();
        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(pid("p1"), None, 2).unwrap();
        assert!(cart.set_quantity(&pid("p1"), None, 0).unwrap());
        assert!(cart.is_empty());
        assert!(!cart.set_quantity(&pid("p1"), None, 4).unwrap());
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(pid("p1"), None, 0), Err(CartError::ZeroQuantity));
        cart.add(pid("p1"), None, MAX_LINE_QUANTITY).unwrap();
        assert_eq!(cart.add(pid("p1"), None, 1), Err(CartError::TooMany));
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_wishlist_set_semantics() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add(pid("p1")));
        assert!(!wishlist.add(pid("p1")));
        assert!(wishlist.add(pid("p2")));
        assert_eq!(wishlist.product_ids(), &[pid("p1"), pid("p2")]);
        assert!(wishlist.remove(&pid("p1")));
        assert!(!wishlist.remove(&pid("p1")));
        assert_eq!(wishlist.len(), 1);
    }
}
