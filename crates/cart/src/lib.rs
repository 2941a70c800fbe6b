//! Shopcart cart state container.
//!
//! This crate holds the user's cart as an in-process list of line items,
//! mirrors it to a persistent storage slot, and validates every addition or
//! quantity change against the catalog's stock levels.
//!
//! # Architecture
//!
//! [`CartStore`] composes three collaborator seams, each behind a trait so
//! tests can swap in fakes:
//!
//! - [`StockService`] - product and stock lookups ([`CatalogClient`] over HTTP)
//! - [`PersistenceAdapter`] - the serialized cart slot ([`FileStorage`])
//! - [`NotificationSink`] - user-facing failure messages ([`TracingNotifier`])
//!
//! Every mutation stages its change on a copy of the snapshot, persists the
//! copy in full, and only then commits it in memory. Operations hold the
//! store's lock for their full duration, so concurrent calls serialize
//! instead of clobbering each other's writes.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopcart_cart::{CartConfig, CartStore, CatalogClient, FileStorage, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::new(
//!     CatalogClient::new(&config),
//!     FileStorage::new(config.storage_path()),
//!     TracingNotifier,
//! )?;
//!
//! store.add_product(ProductId::new(7)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod store;

pub use catalog::{CatalogClient, CatalogError, Product, StockLevel, StockService};
pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use models::{CartItem, UpdateProductAmount};
pub use notify::{NotificationSink, RecordingNotifier, TracingNotifier, messages};
pub use persistence::{FileStorage, MemoryStorage, PersistenceAdapter, PersistenceError};
pub use store::CartStore;
