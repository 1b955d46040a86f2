use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use houndwear_core::{DomainError, Price, ProductId, Size};

use crate::stock::StockBySize;

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Whole-number percentage, 0..=100.
    pub discount_percent: u8,
    pub category: String,
    pub description: String,
    /// Ordered image URLs; the first one is the listing/cart thumbnail.
    pub images: Vec<String>,
    pub active: bool,
}

impl Product {
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount_percent)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Validated product fields without an identity (create and edit payloads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub price: Price,
    pub discount_percent: u8,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
    pub active: bool,
}

impl ProductFields {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            discount_percent: self.discount_percent,
            category: self.category,
            description: self.description,
            images: self.images,
            active: self.active,
        }
    }
}

/// One size row of an admin submission, raw wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStockEntry {
    pub size: Size,
    pub stock: i64,
}

/// An admin product submission before validation.
///
/// Numeric fields arrive as signed wire integers; `validate` narrows them
/// into domain types. Nothing is written anywhere until validation passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub name: String,
    pub price_cents: i64,
    pub discount_percent: i64,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
    pub active: bool,
    pub sizes: Vec<SizeStockEntry>,
}

/// A submission that passed validation: typed fields plus a complete
/// per-size stock map in canonical size order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub fields: ProductFields,
    pub stock: StockBySize,
}

impl ProductSubmission {
    /// Validate the submission, fail-fast on the first offending field.
    ///
    /// Check order: name, price, discount, then each size row in submitted
    /// order, then size coverage. Every size of the enumeration must appear
    /// exactly once; a complete map is required so no stale row can survive
    /// a reconciliation.
    pub fn validate(self) -> Result<ValidatedSubmission, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "name cannot be empty"));
        }

        if self.price_cents < 0 {
            return Err(DomainError::validation(
                "price_cents",
                "price must be zero or greater",
            ));
        }

        if !(0..=100).contains(&self.discount_percent) {
            return Err(DomainError::validation(
                "discount_percent",
                "discount must be between 0 and 100",
            ));
        }

        let mut stock = BTreeMap::new();
        for entry in &self.sizes {
            if entry.stock < 0 {
                return Err(DomainError::validation(
                    format!("stock.{}", entry.size),
                    "stock cannot be negative",
                ));
            }
            let units = u32::try_from(entry.stock).map_err(|_| {
                DomainError::validation(format!("stock.{}", entry.size), "stock is out of range")
            })?;
            if stock.insert(entry.size, units).is_some() {
                return Err(DomainError::validation(
                    "sizes",
                    format!("duplicate size {}", entry.size),
                ));
            }
        }
        for size in Size::ALL {
            if !stock.contains_key(&size) {
                return Err(DomainError::validation(
                    "sizes",
                    format!("missing size {size}"),
                ));
            }
        }

        // Blank image slots from admin forms are dropped, order kept.
        let images = self
            .images
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect();

        Ok(ValidatedSubmission {
            fields: ProductFields {
                name: self.name,
                price: Price::from_cents(self.price_cents as u64),
                discount_percent: self.discount_percent as u8,
                category: self.category,
                description: self.description,
                images,
                active: self.active,
            },
            stock,
        })
    }
}
