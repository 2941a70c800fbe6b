//! Wire types for the catalog API.

use serde::{Deserialize, Serialize};
use shopcart_core::{Price, ProductId};

/// Descriptive product record, as returned by `GET /products/{id}`.
///
/// Copied into the cart at insertion time; the cart never re-fetches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
}

/// Available quantity for a product, as returned by `GET /stock/{id}`.
///
/// Transient: fetched on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_decode() {
        let stock: StockLevel = serde_json::from_str(r#"{"id":7,"amount":5}"#).expect("decode");
        assert_eq!(stock.id, ProductId::new(7));
        assert_eq!(stock.amount, 5);
    }

    #[test]
    fn test_product_decode_without_image() {
        let product: Product = serde_json::from_str(
            r#"{"id":3,"title":"Trail Sneaker","price":{"amount":"179.90"}}"#,
        )
        .expect("decode");
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.title, "Trail Sneaker");
        assert_eq!(product.price.display(), "$179.90");
        assert!(product.image.is_none());
    }
}
