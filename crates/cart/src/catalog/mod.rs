//! Catalog API client: product and stock lookups.
//!
//! # Architecture
//!
//! - The catalog service is the source of truth for stock - NO local sync,
//!   stock is fetched on demand and never cached
//! - [`StockService`] is the seam the cart store depends on; [`CatalogClient`]
//!   is the production implementation over plain REST endpoints
//!
//! # Endpoints
//!
//! - `GET /products/{id}` - descriptive product record
//! - `GET /stock/{id}` - current available quantity
//!
//! No authentication, retries, or pagination: the catalog API is an open
//! read-only collaborator.

mod client;
mod types;

use std::future::Future;

use thiserror::Error;

use shopcart_core::ProductId;

pub use client::CatalogClient;
pub use types::{Product, StockLevel};

/// Errors that can occur when interacting with the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog returned an unexpected status code.
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// Product and stock lookups, as the cart store consumes them.
///
/// Implementations must be cheap to share; the store calls these while
/// holding its snapshot lock.
pub trait StockService: Send + Sync {
    /// Fetch the descriptive product record.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the current available quantity.
    fn stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockLevel, CatalogError>> + Send;
}

impl<T: StockService> StockService for &T {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<StockLevel, CatalogError> {
        (**self).stock(id).await
    }
}
