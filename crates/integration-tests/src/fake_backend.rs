//! In-process stand-in for the backend REST API.
//!
//! Holds products, categories, coupons and orders in memory, records every
//! request it receives, and enforces the admin bearer token on admin-only
//! endpoints. Status transitions are NOT validated here; that is the admin
//! service's job.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use tilestore_core::{
    Category, Coupon, NewOrder, Order, OrderId, OrderStatus, PaymentStatus, Product,
};

/// Bearer token the storefront uses for its own backend calls.
pub const SERVICE_TOKEN: &str = "storefront-service-token";

/// Bearer token the fake accepts on admin endpoints.
pub const ADMIN_TOKEN: &str = "admin-token";

/// First numeric suffix for minted ids, above every fixture id.
const FIRST_MINTED_ID: u64 = 100;

/// Everything the fake backend stores.
#[derive(Debug, Clone, Default)]
pub struct BackendData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub coupons: Vec<Coupon>,
    pub orders: Vec<Order>,
}

/// A request as seen by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

/// Shared handle to the fake backend's state.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

struct Inner {
    data: Mutex<BackendData>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicU64,
}

impl FakeBackend {
    #[must_use]
    pub fn new(data: BackendData) -> Self {
        Self {
            inner: Arc::new(Inner {
                data: Mutex::new(data),
                requests: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(FIRST_MINTED_ID),
            }),
        }
    }

    /// Router serving the backend API.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{key}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/categories", get(list_categories).post(create_category))
            .route(
                "/categories/{id}",
                put(update_category).delete(delete_category),
            )
            .route("/coupons", get(list_coupons).post(create_coupon))
            .route("/coupons/{key}", get(get_coupon).delete(delete_coupon))
            .route("/orders", get(list_orders).post(create_order))
            .route("/orders/my", get(my_orders))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/status", put(set_order_status))
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }

    /// Snapshot of the stored data.
    #[must_use]
    pub fn data(&self) -> BackendData {
        self.lock().clone()
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Requests matching `method` and `path` exactly.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BackendData> {
        self.inner.data.lock().unwrap()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!(
            "{prefix}{}",
            self.inner.next_id.fetch_add(1, Ordering::Relaxed)
        )
    }

    /// Give a JSON document an `_id` and its variants an `id` each.
    fn assign_ids(&self, mut body: Value, id: &str) -> Value {
        if let Some(object) = body.as_object_mut() {
            object.insert("_id".to_string(), json!(id));
            if let Some(variants) = object.get_mut("variants").and_then(Value::as_array_mut) {
                for variant in variants {
                    if let Some(variant) = variant.as_object_mut()
                        && !variant.contains_key("id")
                        && !variant.contains_key("_id")
                    {
                        variant.insert("id".to_string(), json!(self.next_id("v")));
                    }
                }
            }
        }
        body
    }
}

async fn record(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let bearer = bearer(request.headers()).map(String::from);
    backend
        .inner
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(String::from),
            bearer,
        });
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    if bearer(headers) == Some(ADMIN_TOKEN) {
        Ok(())
    } else {
        Err(message(StatusCode::UNAUTHORIZED, "invalid token"))
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn not_found() -> Response {
    message(StatusCode::NOT_FOUND, "not found")
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Response> {
    serde_json::from_value(body)
        .map_err(|e| message(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(backend): State<FakeBackend>) -> Response {
    Json(json!({ "products": backend.lock().products })).into_response()
}

async fn get_product(State(backend): State<FakeBackend>, Path(slug): Path<String>) -> Response {
    backend
        .lock()
        .products
        .iter()
        .find(|p| p.slug == slug)
        .map_or_else(not_found, |p| Json(json!({ "data": p })).into_response())
}

async fn create_product(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let id = backend.next_id("p");
    let product: Product = match parse(backend.assign_ids(body, &id)) {
        Ok(product) => product,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    if data.products.iter().any(|p| p.slug == product.slug) {
        return message(StatusCode::CONFLICT, "slug already exists");
    }
    data.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let product: Product = match parse(backend.assign_ids(body, &id)) {
        Ok(product) => product,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    match data.products.iter_mut().find(|p| p.id.as_str() == id) {
        Some(existing) => {
            *existing = product.clone();
            Json(product).into_response()
        }
        None => not_found(),
    }
}

async fn delete_product(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut data = backend.lock();
    let before = data.products.len();
    data.products.retain(|p| p.id.as_str() != id);
    if data.products.len() == before {
        not_found()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(State(backend): State<FakeBackend>) -> Response {
    Json(backend.lock().categories.clone()).into_response()
}

async fn create_category(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let id = backend.next_id("c");
    let category: Category = match parse(backend.assign_ids(body, &id)) {
        Ok(category) => category,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    if data.categories.iter().any(|c| c.conflicts_with(&category)) {
        return message(StatusCode::CONFLICT, "category slug already used under this parent");
    }
    data.categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn update_category(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let category: Category = match parse(backend.assign_ids(body, &id)) {
        Ok(category) => category,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    match data.categories.iter_mut().find(|c| c.id.as_str() == id) {
        Some(existing) => {
            *existing = category.clone();
            Json(category).into_response()
        }
        None => not_found(),
    }
}

async fn delete_category(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut data = backend.lock();
    let before = data.categories.len();
    data.categories.retain(|c| c.id.as_str() != id);
    if data.categories.len() == before {
        not_found()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

// =============================================================================
// Coupons
// =============================================================================

async fn list_coupons(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    Json(json!({ "data": backend.lock().coupons })).into_response()
}

async fn get_coupon(State(backend): State<FakeBackend>, Path(code): Path<String>) -> Response {
    backend
        .lock()
        .coupons
        .iter()
        .find(|c| c.code == code)
        .map_or_else(not_found, |c| Json(c).into_response())
}

async fn create_coupon(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let id = backend.next_id("k");
    let coupon: Coupon = match parse(backend.assign_ids(body, &id)) {
        Ok(coupon) => coupon,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    if data.coupons.iter().any(|c| c.code == coupon.code) {
        return message(StatusCode::CONFLICT, "coupon code already exists");
    }
    data.coupons.push(coupon.clone());
    (StatusCode::CREATED, Json(coupon)).into_response()
}

async fn delete_coupon(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let mut data = backend.lock();
    let before = data.coupons.len();
    data.coupons.retain(|c| c.id.as_str() != id);
    if data.coupons.len() == before {
        not_found()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Ignores `?status=` on purpose so callers must filter themselves.
async fn list_orders(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    Json(json!({ "orders": backend.lock().orders })).into_response()
}

async fn my_orders(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    let Some(token) = bearer(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "missing token");
    };
    let orders: Vec<Order> = backend
        .lock()
        .orders
        .iter()
        .filter(|o| o.customer.as_ref().is_some_and(|c| c.as_str() == token))
        .cloned()
        .collect();
    Json(orders).into_response()
}

async fn get_order(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    backend
        .lock()
        .orders
        .iter()
        .find(|o| o.id.as_str() == id)
        .map_or_else(not_found, |o| Json(json!({ "data": o })).into_response())
}

async fn create_order(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let new_order: NewOrder = match parse(body) {
        Ok(order) => order,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    for line in &new_order.lines {
        let Some(product) = data.products.iter_mut().find(|p| p.id == line.product_id) else {
            return message(StatusCode::UNPROCESSABLE_ENTITY, "unknown product");
        };
        product.stock = product.stock.saturating_sub(line.quantity);
    }

    let order = Order {
        id: OrderId::new(backend.next_id("o")),
        customer: None,
        lines: new_order.lines,
        shipping: new_order.shipping,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        coupon_code: new_order.coupon_code,
        totals: new_order.totals,
        created_at: Utc::now(),
    };
    data.orders.push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn set_order_status(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }
    let status: OrderStatus = match parse(body["status"].clone()) {
        Ok(status) => status,
        Err(response) => return response,
    };

    let mut data = backend.lock();
    match data.orders.iter_mut().find(|o| o.id.as_str() == id) {
        Some(order) => {
            order.status = status;
            Json(order.clone()).into_response()
        }
        None => not_found(),
    }
}
