//! User-facing failure notifications.
//!
//! The store never surfaces raw error details to the user; it pushes one of
//! a small set of localized messages through [`NotificationSink`] and leaves
//! the diagnostics to `tracing`. The UI layer decides how to display them
//! (toast, banner, etc.).

use std::sync::{Mutex, PoisonError};

/// The message catalogue the store emits.
pub mod messages {
    /// Shared by add and update when the requested quantity exceeds stock.
    pub const OUT_OF_STOCK: &str = "Requested quantity is out of stock";
    /// Add failed for any other reason (lookup or persistence).
    pub const ADD_FAILED: &str = "Failed to add the product";
    /// Remove failed (persistence only; no lookup happens on remove).
    pub const REMOVE_FAILED: &str = "Failed to remove the product";
    /// Update failed for any other reason (lookup or persistence).
    pub const UPDATE_FAILED: &str = "Failed to update the cart";
}

/// Sink for transient, human-readable error messages.
pub trait NotificationSink: Send + Sync {
    /// Display `message` to the user.
    fn notify(&self, message: &str);
}

impl<T: NotificationSink> NotificationSink for &T {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

/// Production sink: emits the message through `tracing` at `warn` level.
///
/// Storefront frontends typically install their own sink that feeds the UI's
/// toast component; this one makes headless and server-side use observable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "shopcart::notify", "{message}");
    }
}

/// Test sink: records every message in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages notified so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
