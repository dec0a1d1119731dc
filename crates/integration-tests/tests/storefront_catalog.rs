//! Catalog listing, product detail and category tests.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use tilestore_integration_tests::{SERVICE_TOKEN, TestContext, money};

fn names(page: &Value) -> Vec<&str> {
    page["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_keyword_and_price_filters_combine() {
    let ctx = TestContext::new().await;

    let page: Value = ctx
        .client
        .get(ctx.storefront("/api/products?keyword=ivory&minPrice=90"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(names(&page), ["Ivory Glossy 600x1200"]);
    assert_eq!(page["totalProducts"], 1);
    assert_eq!(page["totalPages"], 1);
}

#[tokio::test]
async fn test_pagination_reports_totals_and_empty_pages() {
    let ctx = TestContext::new().await;

    let first: Value = ctx
        .client
        .get(ctx.storefront("/api/products?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["products"].as_array().unwrap().len(), 2);
    assert_eq!(first["totalProducts"], 3);
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["currentPage"], 1);

    let second: Value = ctx
        .client
        .get(ctx.storefront("/api/products?limit=2&page=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["products"].as_array().unwrap().len(), 1);

    let beyond: Value = ctx
        .client
        .get(ctx.storefront("/api/products?limit=2&page=5"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(beyond["products"].as_array().unwrap().is_empty());
    assert_eq!(beyond["currentPage"], 5);
    assert_eq!(beyond["totalPages"], 2);
}

#[tokio::test]
async fn test_sort_by_price_ascending() {
    let ctx = TestContext::new().await;

    let page: Value = ctx
        .client
        .get(ctx.storefront("/api/products?sort=price_asc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let prices: Vec<_> = page["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| money(&p["price"]))
        .collect();
    assert_eq!(
        prices,
        [Decimal::from(45), Decimal::from(80), Decimal::from(120)]
    );
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.storefront("/api/products?limit=0"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_detail_by_slug() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.storefront("/api/products/ivory-matt-600x600"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Value = response.json().await.unwrap();
    assert_eq!(product["id"], "p1");
    assert_eq!(product["variants"][0]["size"], "600x600");

    let missing = ctx
        .client
        .get(ctx.storefront("/api/products/no-such-tile"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_are_active_and_ordered() {
    let ctx = TestContext::new().await;

    let categories: Vec<Value> = ctx
        .client
        .get(ctx.storefront("/api/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let slugs: Vec<&str> = categories
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["wall", "floor", "bathroom", "bathroom"]);

    // Same slug under two parents
    assert_eq!(categories[2]["parent"], "c2");
    assert_eq!(categories[3]["parent"], "c1");
}

#[tokio::test]
async fn test_backend_calls_carry_service_token_and_are_cached() {
    let ctx = TestContext::new().await;

    for _ in 0..2 {
        let response = ctx
            .client
            .get(ctx.storefront("/api/products"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let calls = ctx.backend.requests_to("GET", "/products");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bearer.as_deref(), Some(SERVICE_TOKEN));
}

#[tokio::test]
async fn test_list_filters_or_within_and_across_dimensions() {
    let ctx = TestContext::new().await;

    // Both colors accepted, blank item ignored, then narrowed by room type
    let page: Value = ctx
        .client
        .get(ctx.storefront(
            "/api/products?colors=ivory,%20grey,&roomTypes=bathroom&sort=price_asc",
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&page), ["Charcoal Wall 300x450", "Ivory Glossy 600x1200"]);
    assert_eq!(page["totalProducts"], 2);

    let page: Value = ctx
        .client
        .get(ctx.storefront("/api/products?sizes=600x600,300x450&finishes=matt"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&page), ["Ivory Matt 600x600", "Charcoal Wall 300x450"]);

    let page: Value = ctx
        .client
        .get(ctx.storefront(
            "/api/products?sizes=600x600,300x450&finishes=matt&colors=GREY",
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&page), ["Charcoal Wall 300x450"]);
}

#[tokio::test]
async fn test_list_filter_with_no_match_is_empty_not_error() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.storefront("/api/products?tags=large-format,&roomTypes=kitchen"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = response.json().await.unwrap();
    assert!(page["products"].as_array().unwrap().is_empty());
    assert_eq!(page["totalProducts"], 0);
    assert_eq!(page["totalPages"], 0);
    assert_eq!(page["currentPage"], 1);
}
