//! Shop filtering and facet derivation.
//!
//! Everything here is a pure function over a catalog snapshot. Facets and
//! listings are recomputed in full on every call; nothing is cached or
//! incrementally maintained, so a facet can never disagree with the rows it
//! was derived from.

use serde::{Deserialize, Serialize};

use houndwear_core::Size;

use crate::product::Product;
use crate::stock::SizeStock;

/// Sentinel facet value meaning "no restriction".
pub const ALL_SENTINEL: &str = "All";

/// Category restriction of a shop query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse the wire value, treating the sentinel (or blank) as `All`.
    pub fn from_param(value: &str) -> Self {
        if value.is_empty() || value == ALL_SENTINEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_SENTINEL,
            CategoryFilter::Category(name) => name,
        }
    }
}

/// Size restriction of a shop query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeFilter {
    #[default]
    All,
    Size(Size),
}

impl SizeFilter {
    /// Parse the wire value, treating the sentinel (or blank) as `All`.
    pub fn from_param(value: &str) -> Result<Self, houndwear_core::DomainError> {
        if value.is_empty() || value == ALL_SENTINEL {
            Ok(SizeFilter::All)
        } else {
            Ok(SizeFilter::Size(value.parse()?))
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            SizeFilter::All => ALL_SENTINEL,
            SizeFilter::Size(size) => size.as_str(),
        }
    }
}

/// One shop query: free-text search plus category and size restrictions.
///
/// The default value (empty search, both filters `All`) matches every
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterParams {
    pub search: String,
    pub category: CategoryFilter,
    pub size: SizeFilter,
}

/// Distinct category facet values, `"All"` first, then first-appearance
/// order over the snapshot.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_SENTINEL.to_string()];
    for product in products {
        if !out[1..].contains(&product.category) {
            out.push(product.category.clone());
        }
    }
    out
}

/// Sizes with stock somewhere in the catalog, canonical order.
///
/// A size whose every row is at 0 does not appear; the all-zero facet is
/// how a sold-out size drops out of the shop selector.
pub fn available_sizes(rows: &[SizeStock]) -> Vec<Size> {
    Size::ALL
        .into_iter()
        .filter(|size| rows.iter().any(|row| row.size == *size && row.in_stock()))
        .collect()
}

/// Apply a shop query to a catalog snapshot.
///
/// A product is kept when all three hold:
/// - its name contains the search term case-insensitively (an empty term
///   matches everything),
/// - the category filter is `All` or matches exactly,
/// - the size filter is `All`, or the product has stock above 0 in exactly
///   that size. A product with no rows at all is excluded by every concrete
///   size filter.
///
/// The `active` flag does not participate.
pub fn filter_catalog<'a>(
    products: &'a [Product],
    rows: &[SizeStock],
    params: &FilterParams,
) -> Vec<&'a Product> {
    let needle = params.search.to_lowercase();
    products
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .filter(|product| match &params.category {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => product.category == *category,
        })
        .filter(|product| match params.size {
            SizeFilter::All => true,
            SizeFilter::Size(size) => rows
                .iter()
                .any(|row| row.product_id == product.id && row.size == size && row.in_stock()),
        })
        .collect()
}
