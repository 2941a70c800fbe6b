//! Cart line item model.

use serde::{Deserialize, Serialize};
use shopcart_core::ProductId;

use crate::catalog::Product;

/// A single line in the cart: the product record copied from the catalog at
/// insertion time, plus the selected quantity.
///
/// The product fields are flattened so the persisted blob keeps them at the
/// same level as `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Selected quantity. Always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// Input for [`CartStore::update_product_amount`](crate::CartStore::update_product_amount).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity. Values below 1 are rejected.
    pub amount: i64,
}
