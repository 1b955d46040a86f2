//! Postgres-backed catalog store.
//!
//! Persists products, per-size stock rows, and best-seller membership in
//! PostgreSQL. The schema is bootstrapped on connect with idempotent
//! `CREATE TABLE IF NOT EXISTS` statements, so a fresh database is usable
//! without a separate migration step.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | RowNotFound | `NotFound` | fetch of a row that must exist |
//! | Database | `Database` | constraint violations, driver failures |
//! | PoolClosed | `Database` | connection pool was shut down |
//! | Other | `Database` | network errors, connection failures, etc. |
//!
//! `update_product` additionally reports `NotFound` when the `UPDATE`
//! affects zero rows.
//!
//! ## Thread Safety
//!
//! `PostgresCatalogStore` is `Send + Sync` and can be shared across
//! threads. All operations go through the SQLx connection pool, which
//! handles thread-safe connection management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use houndwear_catalog::{Product, ProductFields, SizeStock};
use houndwear_core::{Price, ProductId, Size};

use super::r#trait::{CatalogStore, StoreError};

/// Postgres adapter for the catalog store.
///
/// Ids are allocated by the `BIGSERIAL` primary key of `products`. Stock
/// rows live in `product_sizes` keyed by `(product_id, size)`; best-seller
/// membership lives in `best_products` ordered by an explicit position
/// column and replaced wholesale inside one transaction.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and bootstrap the schema.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the tables if they do not exist yet. Idempotent.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id               BIGSERIAL PRIMARY KEY,
                name             TEXT NOT NULL,
                price_cents      BIGINT NOT NULL CHECK (price_cents >= 0),
                discount_percent SMALLINT NOT NULL CHECK (discount_percent BETWEEN 0 AND 100),
                category         TEXT NOT NULL,
                description      TEXT NOT NULL DEFAULT '',
                images           JSONB NOT NULL DEFAULT '[]'::jsonb,
                active           BOOLEAN NOT NULL DEFAULT TRUE,
                created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_products_table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_sizes (
                product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                size       TEXT NOT NULL,
                stock      BIGINT NOT NULL CHECK (stock >= 0),
                PRIMARY KEY (product_id, size)
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product_sizes_table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS best_products (
                position   BIGINT PRIMARY KEY,
                product_id BIGINT NOT NULL UNIQUE REFERENCES products(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_best_products_table", e))?;

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self, fields), fields(name = %fields.name), err)]
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let images = images_json(&fields.images)?;

        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, discount_percent, category, description, images, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price.cents() as i64)
        .bind(i16::from(fields.discount_percent))
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(&images)
        .bind(fields.active)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::Database(format!("failed to read allocated id: {e}")))?;

        Ok(fields.into_product(ProductId::new(id)))
    }

    #[instrument(skip(self, fields), fields(product_id = %id), err)]
    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<(), StoreError> {
        let images = images_json(&fields.images)?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2,
                price_cents = $3,
                discount_percent = $4,
                category = $5,
                description = $6,
                images = $7,
                active = $8
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(fields.price.cents() as i64)
        .bind(i16::from(fields.discount_percent))
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(&images)
        .bind(fields.active)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_cents, discount_percent, category, description, images, active
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(|row| ProductRow::read(&row).and_then(Product::try_from))
            .transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, discount_percent, category, description, images, active
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(ProductRow::read(&row).and_then(Product::try_from)?);
        }
        Ok(products)
    }

    async fn get_size_stock(
        &self,
        id: ProductId,
        size: Size,
    ) -> Result<Option<SizeStock>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT product_id, size, stock
            FROM product_sizes
            WHERE product_id = $1 AND size = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(size.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_size_stock", e))?;

        row.map(|row| SizeRow::read(&row).and_then(SizeStock::try_from))
            .transpose()
    }

    async fn list_size_stock(&self, id: ProductId) -> Result<Vec<SizeStock>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, size, stock
            FROM product_sizes
            WHERE product_id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_size_stock", e))?;

        let mut stock = convert_size_rows(rows)?;
        // Canonical order is the enum order; sorting the size tokens in SQL
        // would put L before M before S.
        stock.sort_by_key(|row| row.size);
        Ok(stock)
    }

    async fn list_all_size_stock(&self) -> Result<Vec<SizeStock>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, size, stock
            FROM product_sizes
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all_size_stock", e))?;

        let mut stock = convert_size_rows(rows)?;
        stock.sort_by_key(|row| (row.product_id, row.size));
        Ok(stock)
    }

    #[instrument(
        skip(self),
        fields(product_id = %row.product_id, size = %row.size, stock = row.stock),
        err
    )]
    async fn upsert_size_stock(&self, row: SizeStock) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO product_sizes (product_id, size, stock)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, size)
            DO UPDATE SET stock = EXCLUDED.stock
            "#,
        )
        .bind(row.product_id.as_i64())
        .bind(row.size.as_str())
        .bind(i64::from(row.stock))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_size_stock", e))?;

        Ok(())
    }

    async fn best_sellers(&self) -> Result<Vec<ProductId>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id
            FROM best_products
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("best_sellers", e))?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: i64 = row
                .try_get("product_id")
                .map_err(|e| StoreError::Database(format!("failed to read product_id: {e}")))?;
            ids.push(ProductId::new(raw));
        }
        Ok(ids)
    }

    #[instrument(skip(self, ids), fields(members = ids.len()), err)]
    async fn save_best_sellers(&self, ids: &[ProductId]) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("DELETE FROM best_products")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clear_best_sellers", e))?;

        for (position, id) in ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO best_products (position, product_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(position as i64)
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_best_seller", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(())
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => StoreError::Database(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Database(format!("sqlx error in {operation}: {other}")),
    }
}

fn images_json(images: &[String]) -> Result<JsonValue, StoreError> {
    serde_json::to_value(images)
        .map_err(|e| StoreError::Database(format!("failed to encode images: {e}")))
}

fn convert_size_rows(rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<SizeStock>, StoreError> {
    let mut stock = Vec::with_capacity(rows.len());
    for row in rows {
        stock.push(SizeRow::read(&row).and_then(SizeStock::try_from)?);
    }
    Ok(stock)
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    price_cents: i64,
    discount_percent: i16,
    category: String,
    description: String,
    images: JsonValue,
    active: bool,
}

impl ProductRow {
    fn read(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let read = |column: &str, e: sqlx::Error| {
            StoreError::Database(format!("failed to read {column}: {e}"))
        };
        Ok(ProductRow {
            id: row.try_get("id").map_err(|e| read("id", e))?,
            name: row.try_get("name").map_err(|e| read("name", e))?,
            price_cents: row
                .try_get("price_cents")
                .map_err(|e| read("price_cents", e))?,
            discount_percent: row
                .try_get("discount_percent")
                .map_err(|e| read("discount_percent", e))?,
            category: row.try_get("category").map_err(|e| read("category", e))?,
            description: row
                .try_get("description")
                .map_err(|e| read("description", e))?,
            images: row.try_get("images").map_err(|e| read("images", e))?,
            active: row.try_get("active").map_err(|e| read("active", e))?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price_cents = u64::try_from(row.price_cents).map_err(|_| {
            StoreError::Database(format!("negative price_cents for product {}", row.id))
        })?;
        let discount_percent = u8::try_from(row.discount_percent).map_err(|_| {
            StoreError::Database(format!("discount out of range for product {}", row.id))
        })?;
        let images: Vec<String> = serde_json::from_value(row.images).map_err(|e| {
            StoreError::Database(format!("invalid images payload for product {}: {e}", row.id))
        })?;

        Ok(Product {
            id: ProductId::new(row.id),
            name: row.name,
            price: Price::from_cents(price_cents),
            discount_percent,
            category: row.category,
            description: row.description,
            images,
            active: row.active,
        })
    }
}

#[derive(Debug)]
struct SizeRow {
    product_id: i64,
    size: String,
    stock: i64,
}

impl SizeRow {
    fn read(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let read = |column: &str, e: sqlx::Error| {
            StoreError::Database(format!("failed to read {column}: {e}"))
        };
        Ok(SizeRow {
            product_id: row
                .try_get("product_id")
                .map_err(|e| read("product_id", e))?,
            size: row.try_get("size").map_err(|e| read("size", e))?,
            stock: row.try_get("stock").map_err(|e| read("stock", e))?,
        })
    }
}

impl TryFrom<SizeRow> for SizeStock {
    type Error = StoreError;

    fn try_from(row: SizeRow) -> Result<Self, Self::Error> {
        let size: Size = row.size.parse().map_err(|_| {
            StoreError::Database(format!(
                "unknown size token {:?} for product {}",
                row.size, row.product_id
            ))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            StoreError::Database(format!(
                "stock out of range for product {} size {size}",
                row.product_id
            ))
        })?;

        Ok(SizeStock::new(ProductId::new(row.product_id), size, stock))
    }
}
