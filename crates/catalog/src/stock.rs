use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use houndwear_core::{ProductId, Size};

/// Per-size stock keyed by size, canonical size order.
pub type StockBySize = BTreeMap<Size, u32>;

/// One per-size stock row: (product, size) unique, stock never negative.
///
/// A size with stock 0 is still a row. Keeping the row distinguishes
/// "carried but sold out" from "never carried", and keeps the size visible
/// to later admin edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStock {
    pub product_id: ProductId,
    pub size: Size,
    pub stock: u32,
}

impl SizeStock {
    pub fn new(product_id: ProductId, size: Size, stock: u32) -> Self {
        Self {
            product_id,
            size,
            stock,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
