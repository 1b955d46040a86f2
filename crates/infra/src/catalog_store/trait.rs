use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use houndwear_catalog::{Product, ProductFields, SizeStock};
use houndwear_core::{ProductId, Size};

/// Catalog store operation error.
///
/// These are **infrastructure errors** (missing rows, locks, drivers) as
/// opposed to domain errors (validation, invariants). The API boundary maps
/// them to 5xx responses; `NotFound` from an update is the one exception
/// and surfaces as 404.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The database driver reported a failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Persistence for products, their per-size stock rows, and the
/// best-seller membership list.
///
/// ## Identity
///
/// Product ids are allocated by the store on `create_product` (serial
/// column in Postgres, counter in memory) and never reused within a store.
///
/// ## Stock rows
///
/// A (product, size) pair maps to at most one row. `upsert_size_stock`
/// inserts or overwrites that row; rows with stock 0 are kept, since
/// "carried but sold out" and "never carried" are different answers.
/// Reads scoped to one product return rows in canonical size order.
///
/// ## Implementation requirements
///
/// - `update_product` on an unknown id fails with [`StoreError::NotFound`];
///   it never upserts.
/// - `list_products` returns id (allocation) order.
/// - `best_sellers`/`save_best_sellers` preserve membership order exactly.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a new product, allocating its id.
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// Overwrite the fields of an existing product.
    async fn update_product(&self, id: ProductId, fields: ProductFields)
    -> Result<(), StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_size_stock(
        &self,
        id: ProductId,
        size: Size,
    ) -> Result<Option<SizeStock>, StoreError>;

    /// All stock rows of one product, canonical size order.
    async fn list_size_stock(&self, id: ProductId) -> Result<Vec<SizeStock>, StoreError>;

    /// Every stock row in the catalog.
    async fn list_all_size_stock(&self) -> Result<Vec<SizeStock>, StoreError>;

    /// Insert or overwrite the row keyed by `(row.product_id, row.size)`.
    async fn upsert_size_stock(&self, row: SizeStock) -> Result<(), StoreError>;

    /// Best-seller membership in stored order.
    async fn best_sellers(&self) -> Result<Vec<ProductId>, StoreError>;

    /// Replace the best-seller membership wholesale.
    async fn save_best_sellers(&self, ids: &[ProductId]) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        (**self).create_product(fields).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<(), StoreError> {
        (**self).update_product(id, fields).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn get_size_stock(
        &self,
        id: ProductId,
        size: Size,
    ) -> Result<Option<SizeStock>, StoreError> {
        (**self).get_size_stock(id, size).await
    }

    async fn list_size_stock(&self, id: ProductId) -> Result<Vec<SizeStock>, StoreError> {
        (**self).list_size_stock(id).await
    }

    async fn list_all_size_stock(&self) -> Result<Vec<SizeStock>, StoreError> {
        (**self).list_all_size_stock().await
    }

    async fn upsert_size_stock(&self, row: SizeStock) -> Result<(), StoreError> {
        (**self).upsert_size_stock(row).await
    }

    async fn best_sellers(&self) -> Result<Vec<ProductId>, StoreError> {
        (**self).best_sellers().await
    }

    async fn save_best_sellers(&self, ids: &[ProductId]) -> Result<(), StoreError> {
        (**self).save_best_sellers(ids).await
    }
}
