//! Featured-products set.

use serde::{Deserialize, Serialize};

use houndwear_core::{DomainError, ProductId};

/// Ordered set of featured product ids, capacity 5.
///
/// Membership order is insertion order. Ids are references into the
/// catalog, not owners: whoever deletes a product must also remove it here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestSellerSet {
    ids: Vec<ProductId>,
}

impl BestSellerSet {
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted membership, re-applying the capacity and
    /// uniqueness rules.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Result<Self, DomainError> {
        let mut set = Self::new();
        for id in ids {
            set.insert(id)?;
        }
        Ok(set)
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= Self::CAPACITY
    }

    /// Append a product, rejecting duplicates and inserts beyond capacity.
    pub fn insert(&mut self, id: ProductId) -> Result<(), DomainError> {
        if self.contains(id) {
            return Err(DomainError::conflict(format!(
                "product {id} is already a best seller"
            )));
        }
        if self.is_full() {
            return Err(DomainError::invariant(format!(
                "best sellers are limited to {} products",
                Self::CAPACITY
            )));
        }
        self.ids.push(id);
        Ok(())
    }

    /// Remove a product; `false` if it was not a member.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|member| *member != id);
        self.ids.len() != before
    }

    /// Flip membership. `Ok(true)` means the product is now featured,
    /// `Ok(false)` that it was removed. Turning a product on while the set
    /// is full fails; turning one off always succeeds.
    pub fn toggle(&mut self, id: ProductId) -> Result<bool, DomainError> {
        if self.remove(id) {
            Ok(false)
        } else {
            self.insert(id)?;
            Ok(true)
        }
    }
}
