//! Checkout: turning a session cart into an order.
//!
//! Prices are snapshotted from the catalog at checkout time. Stock is checked
//! per product across all of its variants in the cart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tilestore_core::{
    Cart, Coupon, CouponError, NewOrder, OrderLine, OrderTotals, Price, Product, ProductId,
    ShippingInfo, ShippingInfoError, VariantId,
};

/// Reasons a cart cannot be checked out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("product {0} is no longer available")]
    UnknownProduct(ProductId),

    #[error("product {product_id} has no variant {variant_id}")]
    UnknownVariant {
        product_id: ProductId,
        variant_id: VariantId,
    },

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("only {available} of {name} in stock")]
    InsufficientStock { name: String, available: u32 },

    #[error("coupon {0} does not exist")]
    UnknownCoupon(String),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Shipping(#[from] ShippingInfoError),
}

/// Build the order payload for `cart`.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, references a product or
/// variant the catalog no longer has, asks for more than is in stock, the
/// shipping details are incomplete, or the coupon does not apply.
pub fn build_order(
    cart: &Cart,
    products: &[Product],
    coupon: Option<&Coupon>,
    shipping: ShippingInfo,
    now: DateTime<Utc>,
) -> Result<NewOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    shipping.validate()?;

    let by_id: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();
    let mut requested: HashMap<&ProductId, u32> = HashMap::new();
    let mut lines = Vec::with_capacity(cart.lines.len());

    for line in &cart.lines {
        let product = by_id
            .get(&line.product_id)
            .copied()
            .ok_or_else(|| CheckoutError::UnknownProduct(line.product_id.clone()))?;

        if let Some(variant_id) = &line.variant_id
            && product.variant(variant_id).is_none()
        {
            return Err(CheckoutError::UnknownVariant {
                product_id: product.id.clone(),
                variant_id: variant_id.clone(),
            });
        }

        if !product.in_stock() {
            return Err(CheckoutError::OutOfStock(product.name.clone()));
        }

        let total = requested.entry(&product.id).or_default();
        *total = total.saturating_add(line.quantity);
        if *total > product.stock {
            return Err(CheckoutError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
            });
        }

        lines.push(OrderLine {
            product_id: product.id.clone(),
            variant_id: line.variant_id.clone(),
            name: product.name.clone(),
            quantity: line.quantity,
            unit_price: product.price,
        });
    }

    let subtotal: Price = lines.iter().map(OrderLine::line_total).sum();
    let discount = match coupon {
        Some(coupon) => coupon.discount_for(subtotal, now)?,
        None => Price::ZERO,
    };

    Ok(NewOrder {
        totals: OrderTotals::compute(&lines, discount),
        lines,
        shipping,
        coupon_code: coupon.map(|c| Coupon::normalize_code(&c.code)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tilestore_core::{CouponId, DiscountKind, Variant};

    use super::*;

    fn product(id: &str, price: u32, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tile {id}"),
            slug: id.to_string(),
            description: String::new(),
            category: "floor".to_string(),
            price: Price::from_units(price),
            stock,
            tags: vec![],
            finishes: vec![],
            room_types: vec![],
            variants: vec![Variant {
                id: VariantId::new(format!("{id}-ivory")),
                color: Some("ivory".to_string()),
                size: Some("600x600".to_string()),
                images: vec![],
            }],
            created_at: None,
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "A. Customer".to_string(),
            phone: "9876543210".to_string(),
            address_line1: "12 Ceramic Road".to_string(),
            address_line2: None,
            city: "Morbi".to_string(),
            postal_code: "363641".to_string(),
            country: "IN".to_string(),
        }
    }

    fn coupon(percent: u32) -> Coupon {
        Coupon {
            id: CouponId::new("c1"),
            code: "tile10".to_string(),
            discount: DiscountKind::Percentage(Decimal::from(percent)),
            min_order: None,
            expires_at: None,
            is_active: true,
        }
    }

    fn cart(lines: &[(&str, Option<&str>, u32)]) -> Cart {
        let mut cart = Cart::default();
        for (id, variant, qty) in lines {
            cart.add(ProductId::new(*id), variant.map(VariantId::new), *qty)
                .unwrap();
        }
        cart
    }

    #[test]
    fn test_builds_order_with_price_snapshot_and_coupon() {
        let products = vec![product("p1", 80, 10), product("p2", 120, 5)];
        let cart = cart(&[("p1", Some("p1-ivory"), 2), ("p2", None, 1)]);

        let order = build_order(&cart, &products, Some(&coupon(10)), shipping(), Utc::now()).unwrap();

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].unit_price, Price::from_units(80));
        assert_eq!(order.totals.subtotal, Price::from_units(280));
        assert_eq!(order.totals.discount, Price::from_units(28));
        assert_eq!(order.totals.total, Price::from_units(252));
        assert_eq!(order.coupon_code.as_deref(), Some("TILE10"));
    }

    #[test]
    fn test_empty_cart() {
        let err = build_order(&Cart::default(), &[], None, shipping(), Utc::now()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_unknown_product_and_variant() {
        let products = vec![product("p1", 80, 10)];

        let err = build_order(&cart(&[("gone", None, 1)]), &products, None, shipping(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownProduct(_)));

        let err = build_order(
            &cart(&[("p1", Some("p1-teal"), 1)]),
            &products,
            None,
            shipping(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownVariant { .. }));
    }

    #[test]
    fn test_stock_counts_all_variants_of_a_product() {
        let products = vec![product("p1", 80, 3)];
        let cart = cart(&[("p1", None, 2), ("p1", Some("p1-ivory"), 2)]);

        let err = build_order(&cart, &products, None, shipping(), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InsufficientStock {
                name: "Tile p1".to_string(),
                available: 3
            }
        );
    }

    #[test]
    fn test_sold_out_product() {
        let products = vec![product("p1", 80, 0)];

        let err = build_order(&cart(&[("p1", None, 1)]), &products, None, shipping(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::OutOfStock("Tile p1".to_string()));
        assert_eq!(err.to_string(), "Tile p1 is out of stock");
    }

    #[test]
    fn test_inapplicable_coupon() {
        let products = vec![product("p1", 80, 10)];
        let mut expired = coupon(10);
        expired.is_active = false;

        let err = build_order(&cart(&[("p1", None, 1)]), &products, Some(&expired), shipping(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Coupon(CouponError::Inactive(_))));
    }

    #[test]
    fn test_shipping_is_validated() {
        let products = vec![product("p1", 80, 10)];
        let mut incomplete = shipping();
        incomplete.full_name = String::new();

        let err = build_order(&cart(&[("p1", None, 1)]), &products, None, incomplete, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::Shipping(ShippingInfoError::MissingField("fullName"))
        );
    }
}
