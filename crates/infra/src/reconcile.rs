//! Stock reconciliation service.
//!
//! [`StockReconciler`] owns the write path for products and their per-size
//! stock rows. Submissions are validated before any row is touched, so a
//! rejected submission leaves the store exactly as it was. Size rows are
//! written one at a time in canonical size order; when a write fails
//! mid-batch the error reports which sizes were committed and which were
//! skipped so callers can surface the exact damage.

use tracing::instrument;

use houndwear_catalog::{
    CatalogEvent, Product, ProductCreated, ProductSubmission, SizeStock, StockBySize,
    StockReconciled,
};
use houndwear_core::{DomainError, ProductId, Size};
use houndwear_events::EventBus;

use crate::catalog_store::{CatalogStore, StoreError};

/// What happened to a single size row during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SizeOutcome {
    /// No row existed for this size; one was inserted.
    Inserted,
    /// A row existed with a different count and was overwritten.
    Updated { from: u32 },
    /// The stored count already matched; the row was left alone.
    Unchanged,
}

/// One size row's reconciliation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SizeWrite {
    pub size: Size,
    pub stock: u32,
    #[serde(flatten)]
    pub outcome: SizeOutcome,
}

/// Full record of a reconciliation pass, one entry per carried size.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReconcileReport {
    pub product_id: ProductId,
    pub writes: Vec<SizeWrite>,
}

impl ReconcileReport {
    /// True when at least one row was inserted or overwritten.
    pub fn changed(&self) -> bool {
        self.writes
            .iter()
            .any(|write| write.outcome != SizeOutcome::Unchanged)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A size write failed after earlier sizes had already been committed.
    /// `committed` holds the records for sizes written before the failure,
    /// `skipped` the sizes never attempted.
    #[error(
        "stock write for size {size} failed after {} committed ({} skipped): {source}",
        committed.len(),
        skipped.len()
    )]
    PartialWrite {
        size: Size,
        committed: Vec<SizeWrite>,
        skipped: Vec<Size>,
        source: StoreError,
    },
}

/// Write-path service for catalog products and stock.
///
/// Generic over the store and the event bus so tests can run against the
/// in-memory pair while deployments use Postgres.
pub struct StockReconciler<S, B> {
    store: S,
    bus: B,
}

impl<S, B> StockReconciler<S, B>
where
    S: CatalogStore,
    B: EventBus<CatalogEvent>,
{
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    /// Validate a submission and create the product with its stock rows.
    ///
    /// All five sizes get a row, including zero-stock ones, so later
    /// reconciles always find something to compare against.
    #[instrument(skip(self, submission), fields(name = %submission.name), err)]
    pub async fn create(
        &self,
        submission: ProductSubmission,
    ) -> Result<(Product, ReconcileReport), ReconcileError> {
        let validated = submission.validate()?;
        let product = self.store.create_product(validated.fields).await?;

        self.publish(CatalogEvent::ProductCreated(ProductCreated {
            product_id: product.id,
            occurred_at: chrono::Utc::now(),
        }));
        tracing::info!(product_id = %product.id, "product created");

        let report = self.write_sizes(product.id, &validated.stock).await?;
        Ok((product, report))
    }

    /// Validate a submission and converge an existing product's rows to it.
    ///
    /// Fails with [`DomainError::NotFound`] before writing anything when the
    /// product does not exist; reconciliation never creates products as a
    /// side effect.
    #[instrument(skip(self, submission), fields(product_id = %id), err)]
    pub async fn reconcile(
        &self,
        id: ProductId,
        submission: ProductSubmission,
    ) -> Result<ReconcileReport, ReconcileError> {
        let validated = submission.validate()?;
        if self.store.get_product(id).await?.is_none() {
            return Err(DomainError::NotFound.into());
        }

        self.store.update_product(id, validated.fields).await?;
        self.write_sizes(id, &validated.stock).await
    }

    async fn write_sizes(
        &self,
        id: ProductId,
        desired: &StockBySize,
    ) -> Result<ReconcileReport, ReconcileError> {
        let mut writes = Vec::with_capacity(desired.len());
        let mut committed_change = false;

        // BTreeMap iteration gives canonical size order (XS through XL).
        for (&size, &stock) in desired {
            match self.apply_size(id, size, stock).await {
                Ok(write) => {
                    if write.outcome != SizeOutcome::Unchanged {
                        committed_change = true;
                    }
                    writes.push(write);
                }
                Err(source) => {
                    let skipped: Vec<Size> = Size::ALL
                        .into_iter()
                        .skip_while(|s| *s != size)
                        .skip(1)
                        .collect();
                    tracing::error!(
                        product_id = %id,
                        size = %size,
                        error = %source,
                        committed = writes.len(),
                        "stock write halted mid-batch"
                    );
                    // Earlier sizes are already visible to readers, so the
                    // refresh notification still has to go out.
                    if committed_change {
                        self.publish_reconciled(id);
                    }
                    return Err(ReconcileError::PartialWrite {
                        size,
                        committed: writes,
                        skipped,
                        source,
                    });
                }
            }
        }

        if committed_change {
            self.publish_reconciled(id);
        }
        Ok(ReconcileReport {
            product_id: id,
            writes,
        })
    }

    async fn apply_size(
        &self,
        id: ProductId,
        size: Size,
        stock: u32,
    ) -> Result<SizeWrite, StoreError> {
        let current = self.store.get_size_stock(id, size).await?;
        let outcome = match current {
            None => {
                self.store
                    .upsert_size_stock(SizeStock::new(id, size, stock))
                    .await?;
                SizeOutcome::Inserted
            }
            Some(row) if row.stock != stock => {
                self.store
                    .upsert_size_stock(SizeStock::new(id, size, stock))
                    .await?;
                SizeOutcome::Updated { from: row.stock }
            }
            Some(_) => SizeOutcome::Unchanged,
        };
        Ok(SizeWrite {
            size,
            stock,
            outcome,
        })
    }

    fn publish_reconciled(&self, id: ProductId) {
        self.publish(CatalogEvent::StockReconciled(StockReconciled {
            product_id: id,
            occurred_at: chrono::Utc::now(),
        }));
    }

    /// Publishing is best-effort; a full or closed bus must not fail the
    /// write that already happened.
    fn publish(&self, event: CatalogEvent) {
        if let Err(e) = self.bus.publish(event) {
            tracing::warn!(error = ?e, "failed to publish catalog event");
        }
    }
}
