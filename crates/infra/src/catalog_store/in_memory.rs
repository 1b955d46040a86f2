use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use houndwear_catalog::{Product, ProductFields, SizeStock};
use houndwear_core::{ProductId, Size};

use super::r#trait::{CatalogStore, StoreError};

/// In-memory catalog store.
///
/// Intended for tests/dev. Ids come from an atomic counter starting at 1,
/// matching the serial allocation of the Postgres adapter.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<BTreeMap<ProductId, Product>>,
    stock: RwLock<BTreeMap<(ProductId, Size), u32>>,
    best: RwLock<Vec<ProductId>>,
    next_id: AtomicI64,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let id = ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let product = fields.into_product(id);

        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        if !products.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        products.insert(id, fields.into_product(id));
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(products.values().cloned().collect())
    }

    async fn get_size_stock(
        &self,
        id: ProductId,
        size: Size,
    ) -> Result<Option<SizeStock>, StoreError> {
        let stock = self.stock.read().map_err(|_| StoreError::Poisoned)?;
        Ok(stock
            .get(&(id, size))
            .map(|&units| SizeStock::new(id, size, units)))
    }

    async fn list_size_stock(&self, id: ProductId) -> Result<Vec<SizeStock>, StoreError> {
        let stock = self.stock.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Size::ALL
            .into_iter()
            .filter_map(|size| {
                stock
                    .get(&(id, size))
                    .map(|&units| SizeStock::new(id, size, units))
            })
            .collect())
    }

    async fn list_all_size_stock(&self) -> Result<Vec<SizeStock>, StoreError> {
        let stock = self.stock.read().map_err(|_| StoreError::Poisoned)?;
        Ok(stock
            .iter()
            .map(|(&(id, size), &units)| SizeStock::new(id, size, units))
            .collect())
    }

    async fn upsert_size_stock(&self, row: SizeStock) -> Result<(), StoreError> {
        let mut stock = self.stock.write().map_err(|_| StoreError::Poisoned)?;
        stock.insert((row.product_id, row.size), row.stock);
        Ok(())
    }

    async fn best_sellers(&self) -> Result<Vec<ProductId>, StoreError> {
        let best = self.best.read().map_err(|_| StoreError::Poisoned)?;
        Ok(best.clone())
    }

    async fn save_best_sellers(&self, ids: &[ProductId]) -> Result<(), StoreError> {
        let mut best = self.best.write().map_err(|_| StoreError::Poisoned)?;
        *best = ids.to_vec();
        Ok(())
    }
}
