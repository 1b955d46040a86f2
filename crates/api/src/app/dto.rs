//! Request DTOs and JSON mapping helpers.
//!
//! Admin submissions deserialize straight into the domain's
//! `ProductSubmission`; the shapes here are the ones that need query-string
//! parsing or response assembly.

use serde::Deserialize;
use serde_json::json;

use houndwear_catalog::{CategoryFilter, FilterParams, Product, SizeFilter};
use houndwear_core::DomainError;
use houndwear_infra::query::{AdminProductRow, ProductDetail};

/// Query-string form of a shop filter. Empty strings mean "All".
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: String,
}

impl ShopQuery {
    pub fn into_filter(self) -> Result<FilterParams, DomainError> {
        Ok(FilterParams {
            search: self.search,
            category: CategoryFilter::from_param(&self.category),
            size: SizeFilter::from_param(&self.size)?,
        })
    }
}

/// Query-string form of a bounds lookup.
#[derive(Debug, Deserialize)]
pub struct BoundsQuery {
    pub size: String,
}

// JSON mapping helpers

pub fn product_to_json(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id,
        "name": product.name,
        "price_cents": product.price.cents(),
        "discount_percent": product.discount_percent,
        "discounted_price_cents": product.discounted_price().cents(),
        "category": product.category,
        "description": product.description,
        "images": product.images,
        "active": product.active,
    })
}

/// Shop page body: the applied params echoed back plus the matching items,
/// so a client can render the result against the query that produced it.
pub fn shop_page_to_json(params: &FilterParams, products: &[Product]) -> serde_json::Value {
    json!({
        "params": {
            "search": params.search,
            "category": params.category.as_param(),
            "size": params.size.as_param(),
        },
        "items": products.iter().map(product_to_json).collect::<Vec<_>>(),
    })
}

pub fn detail_to_json(detail: &ProductDetail) -> serde_json::Value {
    json!({
        "product": product_to_json(&detail.product),
        "in_stock_sizes": detail.in_stock_sizes,
        "default_size": detail.default_size,
    })
}

pub fn admin_row_to_json(row: &AdminProductRow) -> serde_json::Value {
    json!({
        "product": product_to_json(&row.product),
        "sizes": row
            .sizes
            .iter()
            .map(|row| json!({ "size": row.size, "stock": row.stock }))
            .collect::<Vec<_>>(),
        "total_stock": row.total_stock,
        "discounted_price_cents": row.discounted_price.cents(),
        "best_seller": row.best_seller,
    })
}
