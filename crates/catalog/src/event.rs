use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use houndwear_core::ProductId;
use houndwear_events::Event;

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockReconciled. Stock rows for the product were rewritten;
/// readers holding derived state should refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReconciled {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BestSellersChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSellersChanged {
    pub product_id: ProductId,
    /// Whether the product is featured after the change.
    pub featured: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    ProductCreated(ProductCreated),
    StockReconciled(StockReconciled),
    BestSellersChanged(BestSellersChanged),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ProductCreated(_) => "catalog.product.created",
            CatalogEvent::StockReconciled(_) => "catalog.stock.reconciled",
            CatalogEvent::BestSellersChanged(_) => "catalog.best_sellers.changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::ProductCreated(e) => e.occurred_at,
            CatalogEvent::StockReconciled(e) => e.occurred_at,
            CatalogEvent::BestSellersChanged(e) => e.occurred_at,
        }
    }
}
