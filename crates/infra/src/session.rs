//! Shopper session facade.
//!
//! [`ShopperSession`] wires the pieces one browsing session needs: fenced
//! catalog searches, the quantity guard, and the cart store. Add-to-cart
//! runs the whole consistency pipeline in one call: look the product up,
//! clamp the requested quantity against live stock, snapshot the display
//! fields, then merge into the cart.

use houndwear_cart::{CartError, CartEvent, CartStateStore, CartStorage, LineKey, LineSnapshot};
use houndwear_catalog::{FilterParams, Product};
use houndwear_core::{DomainError, ProductId, Size};
use houndwear_events::EventBus;

use crate::catalog_store::{CatalogStore, StoreError};
use crate::fence::RequestFence;
use crate::guard::StockConstraintGuard;
use crate::query::CatalogQueryService;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// One shopper's live session over a shared catalog store.
pub struct ShopperSession<S, CS, B> {
    query: CatalogQueryService<S>,
    guard: StockConstraintGuard<S>,
    cart: CartStateStore<CS, B>,
    fence: RequestFence,
}

impl<S, CS, B> ShopperSession<S, CS, B>
where
    S: CatalogStore + Clone,
    CS: CartStorage,
    B: EventBus<CartEvent>,
{
    pub fn new(store: S, cart: CartStateStore<CS, B>) -> Self {
        Self {
            query: CatalogQueryService::new(store.clone()),
            guard: StockConstraintGuard::new(store),
            cart,
            fence: RequestFence::new(),
        }
    }

    pub fn cart(&self) -> &CartStateStore<CS, B> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStateStore<CS, B> {
        &mut self.cart
    }

    /// Fenced catalog search.
    ///
    /// `Ok(None)` means a newer search superseded this one while it was
    /// running; the caller drops the response and keeps whatever the newer
    /// search renders.
    pub async fn search(
        &self,
        params: &FilterParams,
    ) -> Result<Option<Vec<Product>>, SessionError> {
        let ticket = self.fence.begin();
        let results = self.query.filter(params).await?;

        if !self.fence.admit(ticket) {
            tracing::debug!(request = ticket.value(), "dropping superseded search response");
            return Ok(None);
        }
        Ok(Some(results))
    }

    /// Size the product page preselects for this product.
    pub async fn default_size(&self, product_id: ProductId) -> Result<Option<Size>, SessionError> {
        Ok(self.guard.default_size(product_id).await?)
    }

    /// Add a product size to the cart, clamped to live stock.
    ///
    /// Returns the quantity actually merged. Out-of-stock sizes fail with
    /// an invariant violation rather than silently adding zero units.
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        size: Size,
        requested: u32,
    ) -> Result<u32, SessionError> {
        let detail = self
            .query
            .product_detail(product_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let bounds = self.guard.bounds_for(product_id, size).await?;
        if !bounds.permits_purchase() {
            return Err(DomainError::invariant(format!(
                "size {size} of product {product_id} is out of stock"
            ))
            .into());
        }

        let quantity = bounds.clamp(requested);
        let snapshot = LineSnapshot {
            name: detail.product.name.clone(),
            unit_price: detail.product.discounted_price(),
            image: detail.product.thumbnail().map(str::to_string),
        };

        self.cart
            .add(LineKey::new(product_id, size), quantity, snapshot)?;
        Ok(quantity)
    }
}
