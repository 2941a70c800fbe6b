//! The cart state container.
//!
//! [`CartStore`] owns the current cart snapshot and is the single writer to
//! the storage slot that mirrors it. Every mutation follows the same shape:
//! stage the change on a copy of the snapshot, validate it against the
//! catalog's stock level, persist the copy in full, and only then commit it
//! in memory. A failed step leaves both the snapshot and the slot untouched.
//!
//! Operations hold the snapshot lock for their full duration (including the
//! stock lookup), so concurrent calls serialize rather than reading a stale
//! snapshot and losing each other's updates.

use tokio::sync::Mutex;
use tracing::instrument;

use shopcart_core::ProductId;

use crate::catalog::StockService;
use crate::error::{CartError, Result};
use crate::models::{CartItem, UpdateProductAmount};
use crate::notify::{NotificationSink, messages};
use crate::persistence::PersistenceAdapter;

/// In-process cart store, synchronized to a persistent storage slot and
/// validated against the catalog's stock levels.
pub struct CartStore<S, P, N> {
    stock: S,
    persistence: P,
    notifier: N,
    items: Mutex<Vec<CartItem>>,
}

impl<S, P, N> CartStore<S, P, N>
where
    S: StockService,
    P: PersistenceAdapter,
    N: NotificationSink,
{
    /// Create a store, loading the snapshot from the storage slot.
    ///
    /// An unwritten slot yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read or parsed.
    pub fn new(stock: S, persistence: P, notifier: N) -> Result<Self> {
        let items = persistence.load()?.unwrap_or_default();
        Ok(Self {
            stock,
            persistence,
            notifier,
            items: Mutex::new(items),
        })
    }

    /// Current snapshot of the cart.
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    /// Total quantity across all lines (cart badge count).
    pub async fn total_quantity(&self) -> u32 {
        self.items.lock().await.iter().map(|item| item.amount).sum()
    }

    /// Add one unit of `id` to the cart.
    ///
    /// A product not yet in the cart is fetched from the catalog and added
    /// with amount 1; an existing line is incremented. Either way the result
    /// must not exceed the available stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the incremented amount exceeds
    /// availability, or a catalog/persistence error if a lookup or the save
    /// fails. The cart is unchanged on any error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> Result<()> {
        let mut items = self.items.lock().await;
        match self.stage_add(&items, id).await {
            Ok(updated) => {
                *items = updated;
                Ok(())
            }
            Err(e) => {
                self.report_failure(&e, messages::ADD_FAILED);
                Err(e)
            }
        }
    }

    async fn stage_add(&self, items: &[CartItem], id: ProductId) -> Result<Vec<CartItem>> {
        let mut updated = items.to_vec();
        let found = updated.iter_mut().find(|item| item.product_id() == id);

        let available = self.stock.stock(id).await?.amount;
        let current = found.as_ref().map_or(0, |item| item.amount);
        let candidate = current + 1;

        if candidate > available {
            return Err(CartError::OutOfStock {
                id,
                requested: candidate,
                available,
            });
        }

        if let Some(item) = found {
            item.amount = candidate;
        } else {
            let product = self.stock.product(id).await?;
            updated.push(CartItem { product, amount: 1 });
        }

        self.persistence.save(&updated)?;
        Ok(updated)
    }

    /// Remove the line for `id` entirely, regardless of its quantity.
    ///
    /// Removing an id that is not in the cart is a vacuous success: no error,
    /// no notification. The snapshot is re-persisted either way.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the save fails; the in-memory cart is
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<()> {
        let mut items = self.items.lock().await;

        let mut updated = items.clone();
        updated.retain(|item| item.product_id() != id);

        if let Err(e) = self.persistence.save(&updated).map_err(CartError::from) {
            self.report_failure(&e, messages::REMOVE_FAILED);
            return Err(e);
        }

        *items = updated;
        Ok(())
    }

    /// Set the line for `product_id` to exactly `amount`.
    ///
    /// Amounts below 1 are rejected up front; a line can never be set to a
    /// non-positive quantity. If the product is not in the cart, the snapshot
    /// is re-persisted unchanged and the call succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidAmount`] for amounts below 1,
    /// [`CartError::OutOfStock`] if the requested amount exceeds
    /// availability, or a catalog/persistence error if a lookup or the save
    /// fails. The cart is unchanged on any error.
    #[instrument(skip(self), fields(product_id = %input.product_id, amount = input.amount))]
    pub async fn update_product_amount(&self, input: UpdateProductAmount) -> Result<()> {
        let requested = u32::try_from(input.amount)
            .ok()
            .filter(|&amount| amount >= 1)
            .ok_or(CartError::InvalidAmount(input.amount))?;

        let mut items = self.items.lock().await;
        match self.stage_update(&items, input.product_id, requested).await {
            Ok(updated) => {
                *items = updated;
                Ok(())
            }
            Err(e) => {
                self.report_failure(&e, messages::UPDATE_FAILED);
                Err(e)
            }
        }
    }

    async fn stage_update(
        &self,
        items: &[CartItem],
        id: ProductId,
        requested: u32,
    ) -> Result<Vec<CartItem>> {
        let mut updated = items.to_vec();

        if let Some(item) = updated.iter_mut().find(|item| item.product_id() == id) {
            let available = self.stock.stock(id).await?.amount;
            if requested > available {
                return Err(CartError::OutOfStock {
                    id,
                    requested,
                    available,
                });
            }
            item.amount = requested;
        }

        self.persistence.save(&updated)?;
        Ok(updated)
    }

    /// Map a failure to its user-facing message and push it through the sink.
    fn report_failure(&self, error: &CartError, fallback: &'static str) {
        let message = match error {
            CartError::OutOfStock { .. } => messages::OUT_OF_STOCK,
            // Invalid amounts never reach the staging path; nothing to show.
            CartError::InvalidAmount(_) => return,
            CartError::Catalog(_) | CartError::Persistence(_) => fallback,
        };
        tracing::warn!(error = %error, "Cart operation failed");
        self.notifier.notify(message);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use rust_decimal::Decimal;
    use shopcart_core::{CurrencyCode, Price};

    use crate::catalog::{CatalogError, Product, StockLevel};
    use crate::notify::RecordingNotifier;
    use crate::persistence::MemoryStorage;

    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::new(17990, 2), CurrencyCode::USD),
            image: Some(format!("https://cdn.example.com/{id}.jpg")),
        }
    }

    /// Catalog fake backed by a stock table, with a kill switch for
    /// exercising lookup-failure paths.
    #[derive(Default)]
    struct FakeCatalog {
        stock: HashMap<i32, u32>,
        failing: AtomicBool,
    }

    impl FakeCatalog {
        fn with_stock(entries: &[(i32, u32)]) -> Self {
            Self {
                stock: entries.iter().copied().collect(),
                failing: AtomicBool::new(false),
            }
        }

        fn fail_lookups(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    impl StockService for FakeCatalog {
        async fn product(&self, id: ProductId) -> std::result::Result<Product, CatalogError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::NotFound(format!("products/{id}")));
            }
            self.stock
                .contains_key(&id.as_i32())
                .then(|| product(id.as_i32()))
                .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
        }

        async fn stock(&self, id: ProductId) -> std::result::Result<StockLevel, CatalogError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::NotFound(format!("stock/{id}")));
            }
            self.stock
                .get(&id.as_i32())
                .map(|&amount| StockLevel { id, amount })
                .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
        }
    }

    fn store<'a>(
        catalog: &'a FakeCatalog,
        notifier: &'a RecordingNotifier,
    ) -> CartStore<&'a FakeCatalog, MemoryStorage, &'a RecordingNotifier> {
        CartStore::new(catalog, MemoryStorage::new(), notifier).expect("empty slot")
    }

    #[tokio::test]
    async fn test_add_new_product_appends_with_amount_one() {
        let catalog = FakeCatalog::with_stock(&[(7, 5)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(7)).await.expect("add");

        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id(), ProductId::new(7));
        assert_eq!(items[0].amount, 1);
        assert_eq!(items[0].product.title, "Product 7");
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let catalog = FakeCatalog::with_stock(&[(7, 5)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(7)).await.expect("first");
        store.add_product(ProductId::new(7)).await.expect("second");

        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 2);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let catalog = FakeCatalog::with_stock(&[(7, 1)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(7)).await.expect("first");
        let err = store.add_product(ProductId::new(7)).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(store.items().await[0].amount, 1);
        assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK.to_string()]);
    }

    #[tokio::test]
    async fn test_add_lookup_failure_leaves_cart_unchanged() {
        let catalog = FakeCatalog::with_stock(&[(7, 5)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        catalog.fail_lookups();
        let err = store.add_product(ProductId::new(7)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(_)));
        assert!(store.items().await.is_empty());
        assert_eq!(notifier.messages(), vec![messages::ADD_FAILED.to_string()]);
    }

    #[tokio::test]
    async fn test_remove_deletes_line_regardless_of_amount() {
        let catalog = FakeCatalog::with_stock(&[(3, 10)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        for _ in 0..4 {
            store.add_product(ProductId::new(3)).await.expect("add");
        }
        assert_eq!(store.items().await[0].amount, 4);

        store.remove_product(ProductId::new(3)).await.expect("remove");
        assert!(store.items().await.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_product_is_vacuous() {
        let catalog = FakeCatalog::with_stock(&[(3, 10)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(3)).await.expect("add");
        store
            .remove_product(ProductId::new(99))
            .await
            .expect("vacuous remove");

        assert_eq!(store.items().await.len(), 1);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount_within_stock() {
        let catalog = FakeCatalog::with_stock(&[(3, 10)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(3)).await.expect("add");
        store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(3),
                amount: 10,
            })
            .await
            .expect("update");

        assert_eq!(store.items().await[0].amount, 10);
    }

    #[tokio::test]
    async fn test_update_beyond_stock_is_rejected() {
        let catalog = FakeCatalog::with_stock(&[(3, 9)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(3)).await.expect("add");
        store.add_product(ProductId::new(3)).await.expect("add");

        let err = store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(3),
                amount: 10,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 10,
                available: 9,
                ..
            }
        ));
        assert_eq!(store.items().await[0].amount, 2);
        assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK.to_string()]);
    }

    #[tokio::test]
    async fn test_update_rejects_non_positive_amounts() {
        let catalog = FakeCatalog::with_stock(&[(3, 9)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(3)).await.expect("add");

        for amount in [0, -1, -50] {
            let err = store
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(3),
                    amount,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, CartError::InvalidAmount(a) if a == amount));
        }

        assert_eq!(store.items().await[0].amount, 1);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_update_absent_product_is_a_noop_write() {
        let catalog = FakeCatalog::with_stock(&[(3, 9)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(99),
                amount: 2,
            })
            .await
            .expect("no-op update");

        assert!(store.items().await.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_reloads_from_slot() {
        let catalog = FakeCatalog::with_stock(&[(7, 5), (3, 2)]);
        let notifier = RecordingNotifier::new();
        let storage = MemoryStorage::new();

        {
            let store = CartStore::new(&catalog, &storage, &notifier).expect("empty slot");
            store.add_product(ProductId::new(7)).await.expect("add");
            store.add_product(ProductId::new(3)).await.expect("add");
            store.add_product(ProductId::new(7)).await.expect("add");
        }

        let reloaded = CartStore::new(&catalog, &storage, &notifier).expect("reload");
        let items = reloaded.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id(), ProductId::new(7));
        assert_eq!(items[0].amount, 2);
        assert_eq!(items[1].product_id(), ProductId::new(3));
        assert_eq!(items[1].amount, 1);
    }

    #[tokio::test]
    async fn test_total_quantity_sums_lines() {
        let catalog = FakeCatalog::with_stock(&[(7, 5), (3, 2)]);
        let notifier = RecordingNotifier::new();
        let store = store(&catalog, &notifier);

        store.add_product(ProductId::new(7)).await.expect("add");
        store.add_product(ProductId::new(7)).await.expect("add");
        store.add_product(ProductId::new(3)).await.expect("add");

        assert_eq!(store.total_quantity().await, 3);
    }
}
