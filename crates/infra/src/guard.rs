//! Store-backed purchase-quantity guard.

use houndwear_catalog::{QuantityBounds, StockBySize, default_size};
use houndwear_core::{ProductId, Size};

use crate::catalog_store::{CatalogStore, StoreError};

/// Answers how many units a shopper may take of one size, from live rows.
///
/// A missing stock row counts as zero stock and yields the degenerate
/// bounds that block purchase.
pub struct StockConstraintGuard<S> {
    store: S,
}

impl<S: CatalogStore> StockConstraintGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn bounds_for(
        &self,
        id: ProductId,
        size: Size,
    ) -> Result<QuantityBounds, StoreError> {
        let stock = self
            .store
            .get_size_stock(id, size)
            .await?
            .map(|row| row.stock)
            .unwrap_or(0);
        Ok(QuantityBounds::for_stock(stock))
    }

    /// Size the product page preselects, from the product's live rows.
    pub async fn default_size(&self, id: ProductId) -> Result<Option<Size>, StoreError> {
        let rows = self.store.list_size_stock(id).await?;
        let by_size: StockBySize = rows.iter().map(|row| (row.size, row.stock)).collect();
        Ok(default_size(&by_size))
    }
}
