//! Test support for the Shopcart integration tests.
//!
//! Provides in-memory fakes for the cart store's collaborator seams so the
//! tests in `tests/` can exercise full cart flows without a catalog service
//! or a real storage slot.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;

use shopcart_cart::{
    CartItem, CatalogError, PersistenceAdapter, PersistenceError, Product, StockLevel,
    StockService,
};
use shopcart_core::{CurrencyCode, Price, ProductId};

/// Install a fmt subscriber so `RUST_LOG=debug` surfaces the store's
/// tracing output during test runs. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Build a catalog product record for tests.
#[must_use]
pub fn product(id: i32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::new(Decimal::new(17990, 2), CurrencyCode::USD),
        image: Some(format!("https://cdn.example.com/{id}.jpg")),
    }
}

/// Catalog fake backed by a stock table.
///
/// Lookups can be switched to fail wholesale to exercise the store's
/// failure paths.
#[derive(Default)]
pub struct FakeCatalog {
    stock: HashMap<i32, u32>,
    failing: AtomicBool,
}

impl FakeCatalog {
    /// Create a catalog with the given `(product id, available stock)` table.
    #[must_use]
    pub fn with_stock(entries: &[(i32, u32)]) -> Self {
        Self {
            stock: entries.iter().copied().collect(),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent lookup fail, as a network outage would.
    pub fn fail_lookups(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl StockService for FakeCatalog {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::NotFound(format!("products/{id}")));
        }
        self.stock
            .contains_key(&id.as_i32())
            .then(|| product(id.as_i32()))
            .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
    }

    async fn stock(&self, id: ProductId) -> Result<StockLevel, CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::NotFound(format!("stock/{id}")));
        }
        self.stock
            .get(&id.as_i32())
            .map(|&amount| StockLevel { id, amount })
            .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
    }
}

/// Storage fake whose writes can be switched to fail, wrapping a working
/// in-memory slot.
#[derive(Default)]
pub struct FlakyStorage {
    inner: shopcart_cart::MemoryStorage,
    fail_saves: AtomicBool,
}

impl FlakyStorage {
    /// Create a working slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail, as a full disk would.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// The wrapped slot, for asserting on persisted contents.
    #[must_use]
    pub const fn inner(&self) -> &shopcart_cart::MemoryStorage {
        &self.inner
    }
}

impl PersistenceAdapter for FlakyStorage {
    fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError> {
        self.inner.load()
    }

    fn save(&self, items: &[CartItem]) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io(io::Error::other("slot unavailable")));
        }
        self.inner.save(items)
    }
}
