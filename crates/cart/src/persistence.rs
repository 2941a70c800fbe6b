//! Durable storage for the cart snapshot.
//!
//! The cart lives in a single named slot: one serialized blob, read once at
//! startup and overwritten in full on every successful mutation. There is no
//! incremental diff persistence.
//!
//! [`PersistenceAdapter`] is the seam; [`FileStorage`] backs the slot with a
//! JSON file, and [`MemoryStorage`] keeps it in-process for tests.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::models::CartItem;

/// Errors that can occur reading or writing the storage slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored blob could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Load/save seam for the serialized cart slot.
///
/// Methods take `&self`; implementations use interior mutability where they
/// need it, so the adapter can be shared behind the store.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the slot.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError>;

    /// Overwrite the slot with the full item sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be serialized or written.
    fn save(&self, items: &[CartItem]) -> Result<(), PersistenceError>;
}

impl<T: PersistenceAdapter> PersistenceAdapter for &T {
    fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, items: &[CartItem]) -> Result<(), PersistenceError> {
        (**self).save(items)
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed storage slot: one JSON file holding the item sequence.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file-backed slot at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PersistenceAdapter for FileStorage {
    fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError> {
        let blob = match std::fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&blob)?))
    }

    fn save(&self, items: &[CartItem]) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(items)?;
        std::fs::write(&self.path, blob)?;
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage slot for tests.
///
/// Round-trips through the same JSON serialization as [`FileStorage`], so
/// tests exercise the real blob format.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot contents, as a file adapter would persist them.
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<CartItem>>, PersistenceError> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_deref() {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn save(&self, items: &[CartItem]) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(items)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob);
        Ok(())
    }
}
