//! Catalog domain module.
//!
//! This crate contains business rules for products, per-size stock, shop
//! filtering, and quantity bounds, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod best_sellers;
pub mod event;
pub mod filter;
pub mod guard;
pub mod product;
pub mod stock;

pub use best_sellers::BestSellerSet;
pub use event::{BestSellersChanged, CatalogEvent, ProductCreated, StockReconciled};
pub use filter::{
    ALL_SENTINEL, CategoryFilter, FilterParams, SizeFilter, available_sizes, categories,
    filter_catalog,
};
pub use guard::{QuantityBounds, default_size};
pub use product::{Product, ProductFields, ProductSubmission, SizeStockEntry, ValidatedSubmission};
pub use stock::{SizeStock, StockBySize};
