//! Read-side catalog queries.
//!
//! [`CatalogQueryService`] answers shop and admin reads by pulling fresh
//! rows from the store and handing them to the pure filter and facet
//! functions. Every answer is recomputed from a live read; nothing here
//! caches, so a reconcile is visible to the very next query.

use serde::Serialize;

use houndwear_catalog::{
    ALL_SENTINEL, FilterParams, Product, SizeStock, StockBySize, available_sizes, categories,
    default_size, filter_catalog,
};
use houndwear_core::{Price, ProductId, Size};

use crate::catalog_store::{CatalogStore, StoreError};

/// Filter facets for the shop page.
///
/// `sizes` carries display tokens with the "All" sentinel first; only
/// sizes with stock somewhere in the catalog appear after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
}

/// Everything the product page needs to render its size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    /// Sizes with stock > 0, canonical order.
    pub in_stock_sizes: Vec<Size>,
    /// Preselected size: first in stock, else first carried.
    pub default_size: Option<Size>,
}

/// One row of the admin product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminProductRow {
    pub product: Product,
    pub sizes: Vec<SizeStock>,
    pub total_stock: u64,
    pub discounted_price: Price,
    pub best_seller: bool,
}

pub struct CatalogQueryService<S> {
    store: S,
}

impl<S: CatalogStore> CatalogQueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn facets(&self) -> Result<Facets, StoreError> {
        let products = self.store.list_products().await?;
        let stock = self.store.list_all_size_stock().await?;

        let sizes = std::iter::once(ALL_SENTINEL.to_string())
            .chain(
                available_sizes(&stock)
                    .into_iter()
                    .map(|size| size.to_string()),
            )
            .collect();

        Ok(Facets {
            categories: categories(&products),
            sizes,
        })
    }

    pub async fn filter(&self, params: &FilterParams) -> Result<Vec<Product>, StoreError> {
        let products = self.store.list_products().await?;
        let stock = self.store.list_all_size_stock().await?;

        Ok(filter_catalog(&products, &stock, params)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn product_detail(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, StoreError> {
        let Some(product) = self.store.get_product(id).await? else {
            return Ok(None);
        };

        let rows = self.store.list_size_stock(id).await?;
        let by_size: StockBySize = rows.iter().map(|row| (row.size, row.stock)).collect();
        let in_stock_sizes = rows
            .iter()
            .filter(|row| row.in_stock())
            .map(|row| row.size)
            .collect();

        Ok(Some(ProductDetail {
            product,
            in_stock_sizes,
            default_size: default_size(&by_size),
        }))
    }

    pub async fn admin_products(&self) -> Result<Vec<AdminProductRow>, StoreError> {
        let products = self.store.list_products().await?;
        let best = self.store.best_sellers().await?;

        let mut table = Vec::with_capacity(products.len());
        for product in products {
            let sizes = self.store.list_size_stock(product.id).await?;
            let total_stock = sizes.iter().map(|row| u64::from(row.stock)).sum();
            let discounted_price = product.discounted_price();
            let best_seller = best.contains(&product.id);
            table.push(AdminProductRow {
                product,
                sizes,
                total_stock,
                discounted_price,
                best_seller,
            });
        }
        Ok(table)
    }
}
