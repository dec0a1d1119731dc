//! Cart display.

use serde::Serialize;
use tilestore_core::{Cart, Price, Product, ProductId, VariantId};

/// A cart line joined with current catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
    /// `None` when the product has left the catalog.
    pub name: Option<String>,
    pub unit_price: Option<Price>,
    pub line_total: Option<Price>,
}

/// The cart as returned to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    /// Sum over lines whose product is still in the catalog.
    pub subtotal: Price,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, products: &[Product]) -> Self {
        let lines: Vec<CartLineView> = cart
            .lines
            .iter()
            .map(|line| {
                let product = products.iter().find(|p| p.id == line.product_id);
                CartLineView {
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                    quantity: line.quantity,
                    name: product.map(|p| p.name.clone()),
                    unit_price: product.map(|p| p.price),
                    line_total: product.map(|p| p.price.times(line.quantity)),
                }
            })
            .collect();

        let subtotal = lines.iter().filter_map(|l| l.line_total).sum();

        Self {
            lines,
            item_count: cart.item_count(),
            subtotal,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_view_prices_known_lines() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p1", "name": "Ivory Matt", "price": "80"}"#,
        )
        .unwrap();

        let mut cart = Cart::default();
        cart.add(ProductId::new("p1"), None, 2).unwrap();
        cart.add(ProductId::new("gone"), None, 1).unwrap();

        let view = CartView::new(&cart, &[product]);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, Price::from_units(160));
        assert_eq!(view.lines[0].name.as_deref(), Some("Ivory Matt"));
        assert!(view.lines[1].unit_price.is_none());
    }
}
