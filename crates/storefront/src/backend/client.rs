//! Backend API client implementation.
//!
//! Caches the product and category collections using `moka`; everything else
//! goes straight to the backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tilestore_core::{Category, Coupon, NewOrder, Order, Product};
use tracing::{debug, instrument};
use url::Url;

use super::BackendError;
use super::cache::{CacheKey, CacheValue};
use crate::config::BackendConfig;

/// Maximum characters of a response body included in logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// Response envelopes
// =============================================================================

/// Collections arrive either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "products",
            alias = "categories",
            alias = "orders",
            alias = "items"
        )]
        data: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Single resources arrive either bare or as `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemResponse<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemResponse<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheap to clone; all clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackendClient {
    /// Create a new backend client whose collection cache lives for `cache_ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig, cache_ttl: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Build an absolute URL from path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| BackendError::InvalidUrl(self.inner.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Start a request. `bearer` overrides the service token when present.
    fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match bearer.or_else(|| self.inner.token.as_ref().map(|t| t.expose_secret())) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let path = response.url().path().to_string();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited(retry_after(&response)));
        }

        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        match status {
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(path)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Unauthorized),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(BackendError::Rejected(rejection_message(&body)))
            }
            _ => {
                tracing::error!(
                    status = %status,
                    path = %path,
                    body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                    "Backend API returned non-success status"
                );
                Err(BackendError::Status(status.as_u16()))
            }
        }
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse backend API response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get the full product collection (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint(&["products"])?;
        let response: ListResponse<Product> = self.send(self.request(Method::GET, url, None)).await?;
        let products = Arc::new(response.into_vec());
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a single product by slug.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product(&self, slug: &str) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products", slug])?;
        let response: ItemResponse<Product> = self.send(self.request(Method::GET, url, None)).await?;
        Ok(response.into_inner())
    }

    /// Get all categories (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Arc<Vec<Category>>, BackendError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint(&["categories"])?;
        let response: ListResponse<Category> =
            self.send(self.request(Method::GET, url, None)).await?;
        let categories = Arc::new(response.into_vec());

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;

        Ok(categories)
    }

    /// Drop cached collections so the next read refetches.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate(&CacheKey::Products).await;
        self.inner.cache.invalidate(&CacheKey::Categories).await;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Look up a coupon by its code.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for unknown codes.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn get_coupon(&self, code: &str) -> Result<Coupon, BackendError> {
        let url = self.endpoint(&["coupons", &Coupon::normalize_code(code)])?;
        let response: ItemResponse<Coupon> = self.send(self.request(Method::GET, url, None)).await?;
        Ok(response.into_inner())
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` if the backend refuses the order.
    #[instrument(skip(self, order), fields(lines = order.lines.len(), total = %order.totals.total))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, BackendError> {
        let url = self.endpoint(&["orders"])?;
        let request = self.request(Method::POST, url, None).json(order);
        let response: ItemResponse<Order> = self.send(request).await?;
        Ok(response.into_inner())
    }

    /// Get the order history of the customer identified by `bearer`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` if the backend rejects the token.
    #[instrument(skip(self, bearer))]
    pub async fn get_my_orders(&self, bearer: &str) -> Result<Vec<Order>, BackendError> {
        let url = self.endpoint(&["orders", "my"])?;
        let response: ListResponse<Order> =
            self.send(self.request(Method::GET, url, Some(bearer))).await?;
        Ok(response.into_vec())
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the backend answers at all. Any non-5xx response counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or failing.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response: Response = self
            .request(Method::GET, self.inner.base_url.clone(), None)
            .send()
            .await?;
        if response.status().is_server_error() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Parse a `Retry-After` header in seconds, defaulting to 1.
fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
}

/// Pull a human-readable message out of a backend error body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| "request rejected by backend".to_string())
}
