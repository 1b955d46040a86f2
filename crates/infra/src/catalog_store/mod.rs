//! Catalog persistence boundary.
//!
//! This module defines the storage-facing abstraction for products, per-size
//! stock rows, and best-seller membership, without making any storage
//! assumptions. Two backends ship: an in-memory twin for tests/dev and a
//! Postgres adapter for deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::{CatalogStore, StoreError};
