//! Cart persistence port.

use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors surfaced by cart persistence adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartStorageError {
    #[error("cart storage io: {0}")]
    Io(String),

    #[error("cart storage lock poisoned")]
    Poisoned,
}

/// Whole-blob persistence for the cart.
///
/// The cart is written as one serialized text record under a single key;
/// there is no per-line persistence. `load` returning `Ok(None)` means
/// nothing was ever written (a first visit), which is not an error.
pub trait CartStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, CartStorageError>;
    fn save(&self, blob: &str) -> Result<(), CartStorageError>;
}

impl<S> CartStorage for Arc<S>
where
    S: CartStorage + ?Sized,
{
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), CartStorageError> {
        (**self).save(blob)
    }
}

/// In-memory cart storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCartStorage {
    inner: RwLock<Option<String>>,
}

impl InMemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for InMemoryCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        let slot = self.inner.read().map_err(|_| CartStorageError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, blob: &str) -> Result<(), CartStorageError> {
        let mut slot = self.inner.write().map_err(|_| CartStorageError::Poisoned)?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}
