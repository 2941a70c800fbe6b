//! Unified error handling for cart operations.
//!
//! Every store operation returns `Result<(), CartError>` so callers and
//! tests can tell a business-rule rejection from an I/O failure. The store
//! additionally pushes the matching user-facing message through its
//! [`NotificationSink`](crate::NotificationSink); see [`crate::notify`].

use thiserror::Error;

use shopcart_core::ProductId;

use crate::catalog::CatalogError;
use crate::persistence::PersistenceError;

/// Errors a cart operation can return.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds the catalog's available stock.
    #[error("Out of stock for product {id}: requested {requested}, available {available}")]
    OutOfStock {
        id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The requested quantity is below 1 or not representable.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Product or stock lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The storage slot could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::OutOfStock {
            id: ProductId::new(7),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Out of stock for product 7: requested 6, available 5"
        );

        let err = CartError::InvalidAmount(-2);
        assert_eq!(err.to_string(), "Invalid amount: -2");
    }
}
