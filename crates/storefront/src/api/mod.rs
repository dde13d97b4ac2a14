//! web-larek order API client.
//!
//! # Architecture
//!
//! - [`Transport`] is the generic get/post collaborator; [`HttpTransport`]
//!   implements it over `reqwest`
//! - [`ShopApi`] adds the typed endpoints on top of any transport
//! - The product list is cached in memory via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_storefront::api::{HttpTransport, ShopApi};
//!
//! let transport = HttpTransport::new(config.api_url()?, config.request_timeout)?;
//! let api = ShopApi::new(transport, config.catalog_cache_ttl);
//!
//! let products = api.get_product_list().await?;
//! let result = api.create_order(&order).await?;
//! ```

mod cache;
mod transport;

pub use transport::{ApiPostMethod, HttpTransport, Transport};

use std::future::Future;
use std::time::Duration;

use larek_core::{Order, OrderResult, Product, ProductList};
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::checkout::OrderGateway;
use cache::CacheKey;

const PRODUCT_LIST_PATH: &str = "/product/";
const ORDER_PATH: &str = "/order/";

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Typed access to the catalog and order endpoints.
pub struct ShopApi<T> {
    transport: T,
    cache: Cache<CacheKey, Vec<Product>>,
}

impl<T: Transport> ShopApi<T> {
    /// Create a client; the product list is cached for `catalog_ttl`.
    #[must_use]
    pub fn new(transport: T, catalog_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(catalog_ttl)
            .build();
        Self { transport, cache }
    }

    /// Fetch the catalog, unwrapping the `{total, items}` envelope.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the reply is malformed.
    #[instrument(skip(self))]
    pub async fn get_product_list(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(items) = self.cache.get(&CacheKey::ProductList).await {
            debug!(items = items.len(), "product list cache hit");
            return Ok(items);
        }

        let list: ProductList = self.transport.get(PRODUCT_LIST_PATH).await?;
        debug!(total = list.total, items = list.items.len(), "fetched product list");
        self.cache
            .insert(CacheKey::ProductList, list.items.clone())
            .await;
        Ok(list.items)
    }

    /// Drop the cached product list.
    pub async fn invalidate_catalog(&self) {
        self.cache.invalidate(&CacheKey::ProductList).await;
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the order.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    pub async fn create_order(&self, order: &Order) -> Result<OrderResult, ApiError> {
        self.transport
            .post(ORDER_PATH, order, ApiPostMethod::Post)
            .await
    }
}

impl<T: Transport> OrderGateway for ShopApi<T> {
    fn create_order(&self, order: &Order) -> impl Future<Output = Result<OrderResult, ApiError>> {
        Self::create_order(self, order)
    }
}
