//! Shopcart Core - Shared types library.
//!
//! This crate provides common types used across all Shopcart components:
//! - `cart` - The cart state container and its collaborators
//! - `integration-tests` - End-to-end cart flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
