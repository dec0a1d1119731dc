//! Backend API client implementation.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tilestore_core::{
    Category, CategoryId, Coupon, CouponId, Order, OrderId, OrderStatus, Product, ProductId,
};
use tracing::{debug, instrument};
use url::Url;

use super::BackendError;
use super::types::{CategoryInput, CouponInput, ProductInput, StatusUpdate};
use crate::config::AdminConfig;

const LOG_BODY_LIMIT: usize = 500;

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
            alias = "coupons",
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

/// Client for the backend REST API, authenticating as the calling admin.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AdminConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.backend_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.backend_url.clone(),
            }),
        })
    }

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

    fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.inner.client.request(method, url).bearer_auth(token)
    }

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
            StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
            StatusCode::FORBIDDEN => Err(BackendError::Forbidden),
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

    async fn list<T: DeserializeOwned>(
        &self,
        token: &str,
        url: Url,
    ) -> Result<Vec<T>, BackendError> {
        let response: ListResponse<T> = self.send(self.request(Method::GET, url, token)).await?;
        Ok(response.into_vec())
    }

    async fn item<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response: ItemResponse<T> = self.send(request).await?;
        Ok(response.into_inner())
    }

    async fn delete(&self, token: &str, segments: &[&str]) -> Result<(), BackendError> {
        let url = self.endpoint(segments)?;
        self.execute(self.request(Method::DELETE, url, token)).await?;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List every product, uncached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, BackendError> {
        let products: Vec<Product> = self.list(token, self.endpoint(&["products"])?).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` if the backend refuses the payload.
    #[instrument(skip_all, fields(slug = ?input.slug))]
    pub async fn create_product(
        &self,
        token: &str,
        input: &ProductInput,
    ) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products"])?;
        self.item(self.request(Method::POST, url, token).json(input))
            .await
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.item(self.request(Method::PUT, url, token).json(input))
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn delete_product(&self, token: &str, id: &ProductId) -> Result<(), BackendError> {
        self.delete(token, &["products", id.as_str()]).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List orders, optionally restricted to one status.
    ///
    /// The filter is passed to the backend as `?status=`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all, fields(status = ?status))]
    pub async fn list_orders(
        &self,
        token: &str,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, BackendError> {
        let mut url = self.endpoint(&["orders"])?;
        if let Some(status) = status {
            url.query_pairs_mut()
                .append_pair("status", &status.to_string());
        }
        self.list(token, url).await
    }

    /// Get a single order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the order does not exist.
    #[instrument(skip_all, fields(order_id = %id))]
    pub async fn get_order(&self, token: &str, id: &OrderId) -> Result<Order, BackendError> {
        let url = self.endpoint(&["orders", id.as_str()])?;
        self.item(self.request(Method::GET, url, token)).await
    }

    /// Set an order's status. Callers validate the transition first.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` if the backend refuses the change.
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &str,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let url = self.endpoint(&["orders", id.as_str(), "status"])?;
        self.item(
            self.request(Method::PUT, url, token)
                .json(&StatusUpdate { status }),
        )
        .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List every category, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, BackendError> {
        self.list(token, self.endpoint(&["categories"])?).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` for a duplicate `(slug, parent)` pair.
    #[instrument(skip_all, fields(slug = ?input.slug))]
    pub async fn create_category(
        &self,
        token: &str,
        input: &CategoryInput,
    ) -> Result<Category, BackendError> {
        let url = self.endpoint(&["categories"])?;
        self.item(self.request(Method::POST, url, token).json(input))
            .await
    }

    /// Replace a category.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the category does not exist.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn update_category(
        &self,
        token: &str,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, BackendError> {
        let url = self.endpoint(&["categories", id.as_str()])?;
        self.item(self.request(Method::PUT, url, token).json(input))
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the category does not exist.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn delete_category(&self, token: &str, id: &CategoryId) -> Result<(), BackendError> {
        self.delete(token, &["categories", id.as_str()]).await
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// List every coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn list_coupons(&self, token: &str) -> Result<Vec<Coupon>, BackendError> {
        self.list(token, self.endpoint(&["coupons"])?).await
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` for a duplicate code.
    #[instrument(skip_all, fields(code = %input.code))]
    pub async fn create_coupon(
        &self,
        token: &str,
        input: &CouponInput,
    ) -> Result<Coupon, BackendError> {
        let url = self.endpoint(&["coupons"])?;
        self.item(self.request(Method::POST, url, token).json(input))
            .await
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the coupon does not exist.
    #[instrument(skip_all, fields(coupon_id = %id))]
    pub async fn delete_coupon(&self, token: &str, id: &CouponId) -> Result<(), BackendError> {
        self.delete(token, &["coupons", id.as_str()]).await
    }

    /// Check that the backend answers at all. Any non-5xx response counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or failing.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await?;
        if response.status().is_server_error() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
}

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
