//! HTTP implementation of the catalog lookups.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use shopcart_core::ProductId;

use crate::config::CartConfig;

use super::{CatalogError, Product, StockLevel, StockService};

/// Client for the catalog REST API.
///
/// Cheap to clone; the HTTP connection pool is shared behind an `Arc`.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CartConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.catalog_base_url.clone(),
            }),
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|_| CatalogError::NotFound(path.to_string()))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status));
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }
}

impl StockService for CatalogClient {
    /// Fetch a product record from `GET /products/{id}`.
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("products/{id}")).await
    }

    /// Fetch the available quantity from `GET /stock/{id}`.
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockLevel, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }
}
