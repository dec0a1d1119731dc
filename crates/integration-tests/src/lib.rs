//! Integration tests for Tilestore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tilestore-integration-tests
//! ```
//!
//! No external services are needed: each test starts a [`FakeBackend`], a
//! storefront and an admin server on ephemeral local ports and talks to them
//! over real HTTP.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Listing, detail, categories, caching
//! - `storefront_session` - Wishlist and cart through the session cookie
//! - `storefront_checkout` - Orders, coupons, order history
//! - `admin_api` - Admin CRUD and order status transitions

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

pub mod fake_backend;

use axum::Router;
use secrecy::SecretString;
use serde_json::{Value, json};

pub use fake_backend::{ADMIN_TOKEN, BackendData, FakeBackend, RecordedRequest, SERVICE_TOKEN};

/// Running servers plus a cookie-keeping HTTP client.
pub struct TestContext {
    pub backend: FakeBackend,
    pub storefront_url: String,
    pub admin_url: String,
    pub client: reqwest::Client,
}

impl TestContext {
    /// Start everything against [`sample_data`].
    pub async fn new() -> Self {
        Self::with_data(sample_data()).await
    }

    /// Start everything against `data`.
    pub async fn with_data(data: BackendData) -> Self {
        let backend = FakeBackend::new(data);
        let backend_url = serve(backend.router()).await;

        let mut backend_config =
            tilestore_storefront::config::BackendConfig::new(&backend_url).unwrap();
        backend_config.token = Some(SecretString::from(SERVICE_TOKEN.to_string()));
        let storefront_config =
            tilestore_storefront::config::StorefrontConfig::new("http://127.0.0.1", backend_config);
        let storefront_state =
            tilestore_storefront::state::AppState::new(storefront_config).unwrap();
        let storefront_url = serve(tilestore_storefront::app(storefront_state)).await;

        let admin_config = tilestore_admin::config::AdminConfig::new(&backend_url).unwrap();
        let admin_state = tilestore_admin::state::AppState::new(admin_config).unwrap();
        let admin_url = serve(tilestore_admin::app(admin_state)).await;

        Self {
            backend,
            storefront_url,
            admin_url,
            client: new_client(),
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Absolute admin URL for `path`.
    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Admin request with the accepted bearer token.
    #[must_use]
    pub fn admin_request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.admin(path))
            .bearer_auth(ADMIN_TOKEN)
    }
}

/// A client with its own cookie jar, i.e. a separate visitor.
#[must_use]
pub fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Read a money field, which may be a JSON string or number.
#[must_use]
pub fn money(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

/// Shipping details that pass validation.
#[must_use]
pub fn shipping() -> Value {
    json!({
        "fullName": "Asha Patel",
        "phone": "+91 98765 43210",
        "addressLine1": "14 Ceramic Zone",
        "city": "Morbi",
        "postalCode": "363641",
        "country": "IN"
    })
}

/// A small tile catalog.
///
/// | id | name                   | category | price | stock | finish | rooms            |
/// |----|------------------------|----------|-------|-------|--------|------------------|
/// | p1 | Ivory Matt 600x600     | floor    | 80    | 50    | matt   | living-room      |
/// | p2 | Ivory Glossy 600x1200  | floor    | 120   | 3     | glossy | bathroom         |
/// | p3 | Charcoal Wall 300x450  | wall     | 45    | 0     | matt   | kitchen,bathroom |
#[must_use]
pub fn sample_data() -> BackendData {
    let products = json!([
        {
            "_id": "p1", "name": "Ivory Matt 600x600", "slug": "ivory-matt-600x600",
            "category": "floor", "price": "80", "stock": 50,
            "tags": ["vitrified"], "finishes": ["matt"], "roomTypes": ["living-room"],
            "variants": [{"_id": "v1", "color": "ivory", "size": "600x600"}],
            "createdAt": "2026-01-10T00:00:00Z"
        },
        {
            "_id": "p2", "name": "Ivory Glossy 600x1200", "slug": "ivory-glossy-600x1200",
            "category": "floor", "price": "120", "stock": 3,
            "tags": ["vitrified", "large-format"], "finishes": ["glossy"], "roomTypes": ["bathroom"],
            "variants": [{"_id": "v2", "color": "ivory", "size": "600x1200"}],
            "createdAt": "2026-03-02T00:00:00Z"
        },
        {
            "_id": "p3", "name": "Charcoal Wall 300x450", "slug": "charcoal-wall-300x450",
            "category": "wall", "price": "45", "stock": 0,
            "tags": ["ceramic"], "finishes": ["matt"], "roomTypes": ["kitchen", "bathroom"],
            "variants": [{"_id": "v3", "color": "grey", "size": "300x450"}]
        }
    ]);

    let categories = json!([
        {"_id": "c1", "name": "Floor Tiles", "slug": "floor", "level": 0, "weight": 1},
        {"_id": "c2", "name": "Wall Tiles", "slug": "wall", "level": 0, "weight": 0},
        {"_id": "c3", "name": "Bathroom", "slug": "bathroom", "parent": "c2", "level": 1},
        {"_id": "c4", "name": "Bathroom", "slug": "bathroom", "parent": "c1", "level": 1},
        {"_id": "c5", "name": "Clearance", "slug": "clearance", "level": 0, "isActive": false}
    ]);

    let coupons = json!([
        {"_id": "k1", "code": "SAVE10", "discount": {"type": "percentage", "value": "10"}, "isActive": true},
        {"_id": "k2", "code": "OLD50", "discount": {"type": "fixed", "value": "50"},
         "expiresAt": "2020-01-01T00:00:00Z", "isActive": true}
    ]);

    let orders = json!([
        {
            "_id": "o1", "customer": "cust-1", "status": "pending",
            "lines": [{"productId": "p1", "name": "Ivory Matt 600x600", "quantity": 2, "unitPrice": "80"}],
            "shipping": shipping(),
            "subtotal": "160", "discount": "0", "total": "160",
            "createdAt": "2026-09-01T10:00:00Z"
        },
        {
            "_id": "o2", "customer": "cust-2", "status": "shipped",
            "lines": [{"productId": "p2", "name": "Ivory Glossy 600x1200", "quantity": 1, "unitPrice": "120"}],
            "shipping": shipping(),
            "subtotal": "120", "discount": "0", "total": "120",
            "createdAt": "2026-09-05T10:00:00Z"
        }
    ]);

    BackendData {
        products: serde_json::from_value(products).unwrap(),
        categories: serde_json::from_value(categories).unwrap(),
        coupons: serde_json::from_value(coupons).unwrap(),
        orders: serde_json::from_value(orders).unwrap(),
    }
}
