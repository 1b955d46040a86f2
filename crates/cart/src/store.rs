//! Cart state store: pure state plus persistence and notification.
//!
//! The store owns a `Cart` value and runs every mutation through the same
//! pipeline:
//!
//! ```text
//! mutate in memory → save full blob → notify subscribers
//! ```
//!
//! A failed save is fatal for the mutation: the prior in-memory state is
//! restored and the error returned, so memory never claims what storage
//! does not hold. A failed notification is logged and swallowed; the state
//! is already persisted and observers re-read on their next event.

use chrono::Utc;
use houndwear_events::{EventBus, Subscription};

use thiserror::Error;

use crate::event::{CartChanged, CartEvent};
use crate::line::{CartLine, LineKey, LineSnapshot};
use crate::state::Cart;
use crate::storage::{CartStorage, CartStorageError};

#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart blob failed; in-memory state was rolled back.
    #[error("cart persistence failed: {0}")]
    Storage(#[from] CartStorageError),

    /// The persisted blob does not parse as a cart.
    #[error("persisted cart is corrupt: {0}")]
    Corrupt(String),

    /// The cart could not be serialized for persistence.
    #[error("cart could not be encoded: {0}")]
    Encode(String),
}

/// Single-owner cart store for one browsing session.
///
/// Mutations take `&mut self`; shoppers act sequentially. Observers get a
/// `Subscription` from [`CartStateStore::subscribe`] and receive one
/// `CartEvent::Changed` per visible change. Changes made by another
/// context become visible (and are announced on the same channel) through
/// [`CartStateStore::reload`]; there is no second ambient signal to watch.
#[derive(Debug)]
pub struct CartStateStore<S, B> {
    storage: S,
    bus: B,
    cart: Cart,
}

impl<S, B> CartStateStore<S, B>
where
    S: CartStorage,
    B: EventBus<CartEvent>,
{
    /// Open the store, reading whatever blob a previous session left.
    ///
    /// An absent blob is an empty cart; a present-but-unparsable blob is
    /// surfaced as [`CartError::Corrupt`] rather than silently discarded.
    pub fn open(storage: S, bus: B) -> Result<Self, CartError> {
        let cart = read_cart(&storage)?;
        Ok(Self { storage, bus, cart })
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn units(&self) -> u32 {
        self.cart.units()
    }

    pub fn total(&self) -> houndwear_core::Price {
        self.cart.total()
    }

    pub fn get(&self, key: LineKey) -> Option<&CartLine> {
        self.cart.get(key)
    }

    /// Merge units into the cart (see [`Cart::add`]), persist, notify.
    pub fn add(
        &mut self,
        key: LineKey,
        quantity: u32,
        snapshot: LineSnapshot,
    ) -> Result<(), CartError> {
        let prior = self.cart.clone();
        self.cart.add(key, quantity, snapshot);
        self.commit(prior)
    }

    /// Set a line's quantity to `max(1, quantity)`, persist, notify.
    ///
    /// An absent line is a silent no-op: nothing is written, no event
    /// fires.
    pub fn update_quantity(&mut self, key: LineKey, quantity: u32) -> Result<(), CartError> {
        let prior = self.cart.clone();
        if !self.cart.update_quantity(key, quantity) {
            return Ok(());
        }
        self.commit(prior)
    }

    /// Remove a line, persist, notify. Absent lines are a silent no-op.
    pub fn remove(&mut self, key: LineKey) -> Result<(), CartError> {
        let prior = self.cart.clone();
        if !self.cart.remove(key) {
            return Ok(());
        }
        self.commit(prior)
    }

    /// Empty the cart, persist, notify. Already-empty is a silent no-op.
    pub fn clear(&mut self) -> Result<(), CartError> {
        if self.cart.is_empty() {
            return Ok(());
        }
        let prior = self.cart.clone();
        self.cart.clear();
        self.commit(prior)
    }

    /// Re-read the persisted blob and announce the now-visible state.
    ///
    /// This is how a write from another context (another tab, another
    /// process sharing the storage) enters this store: same channel, same
    /// event shape as a local mutation.
    pub fn reload(&mut self) -> Result<(), CartError> {
        self.cart = read_cart(&self.storage)?;
        self.notify();
        Ok(())
    }

    /// Subscribe to cart change notifications.
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    fn commit(&mut self, prior: Cart) -> Result<(), CartError> {
        let blob =
            serde_json::to_string(self.cart.lines()).map_err(|e| CartError::Encode(e.to_string()))?;

        if let Err(e) = self.storage.save(&blob) {
            tracing::error!(error = %e, "cart save failed, keeping prior state");
            self.cart = prior;
            return Err(e.into());
        }

        self.notify();
        Ok(())
    }

    fn notify(&self) {
        let event = CartEvent::Changed(CartChanged {
            lines: self.cart.len() as u32,
            units: self.cart.units(),
            occurred_at: Utc::now(),
        });
        if let Err(e) = self.bus.publish(event) {
            tracing::warn!(error = ?e, "cart change notification failed");
        }
    }
}

fn read_cart<S: CartStorage>(storage: &S) -> Result<Cart, CartError> {
    match storage.load()? {
        None => Ok(Cart::empty()),
        Some(blob) => {
            let lines: Vec<CartLine> =
                serde_json::from_str(&blob).map_err(|e| CartError::Corrupt(e.to_string()))?;
            Ok(Cart::from_lines(lines))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use houndwear_core::{Price, ProductId, Size};
    use houndwear_events::InMemoryEventBus;

    use crate::storage::InMemoryCartStorage;

    fn key(id: i64, size: Size) -> LineKey {
        LineKey::new(ProductId::new(id), size)
    }

    fn snapshot(name: &str, cents: u64) -> LineSnapshot {
        LineSnapshot {
            name: name.to_string(),
            unit_price: Price::from_cents(cents),
            image: None,
        }
    }

    fn open_store(
        storage: Arc<InMemoryCartStorage>,
    ) -> CartStateStore<Arc<InMemoryCartStorage>, Arc<InMemoryEventBus<CartEvent>>> {
        CartStateStore::open(storage, Arc::new(InMemoryEventBus::new())).unwrap()
    }

    /// Storage that can be switched into a failing mode mid-test.
    struct FlakyStorage {
        inner: InMemoryCartStorage,
        failing: AtomicBool,
    }

    impl FlakyStorage {
        fn new() -> Self {
            Self {
                inner: InMemoryCartStorage::new(),
                failing: AtomicBool::new(false),
            }
        }

        fn fail_next_saves(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    impl CartStorage for FlakyStorage {
        fn load(&self) -> Result<Option<String>, CartStorageError> {
            self.inner.load()
        }

        fn save(&self, blob: &str) -> Result<(), CartStorageError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CartStorageError::Io("disk full".to_string()));
            }
            self.inner.save(blob)
        }
    }

    #[test]
    fn mutations_persist_the_full_line_sequence() {
        let storage = Arc::new(InMemoryCartStorage::new());
        let mut store = open_store(storage.clone());

        store
            .add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400))
            .unwrap();
        store.add(key(2, Size::S), 1, snapshot("Bandana", 900)).unwrap();

        let blob = storage.load().unwrap().unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(&blob).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn cart_round_trips_through_storage() {
        let storage = Arc::new(InMemoryCartStorage::new());
        let mut store = open_store(storage.clone());
        store
            .add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400))
            .unwrap();
        store.add(key(2, Size::S), 3, snapshot("Bandana", 900)).unwrap();
        let written: Vec<CartLine> = store.lines().to_vec();

        let reopened = open_store(storage);

        assert_eq!(reopened.lines(), written.as_slice());
        assert_eq!(reopened.total(), Price::from_cents(2 * 5400 + 3 * 900));
    }

    #[test]
    fn absent_blob_opens_an_empty_cart() {
        let store = open_store(Arc::new(InMemoryCartStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_reset() {
        let storage = Arc::new(InMemoryCartStorage::new());
        storage.save("not json").unwrap();

        let err = CartStateStore::open(storage, Arc::new(InMemoryEventBus::<CartEvent>::new()))
            .unwrap_err();
        match err {
            CartError::Corrupt(_) => {}
            other => panic!("Expected Corrupt error, got {other:?}"),
        }
    }

    #[test]
    fn every_visible_change_fires_one_event() {
        let mut store = open_store(Arc::new(InMemoryCartStorage::new()));
        let events = store.subscribe();

        store
            .add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400))
            .unwrap();
        store.update_quantity(key(1, Size::M), 5).unwrap();
        store.remove(key(1, Size::M)).unwrap();

        let CartEvent::Changed(first) = events.try_recv().unwrap();
        assert_eq!(first.units, 2);
        let CartEvent::Changed(second) = events.try_recv().unwrap();
        assert_eq!(second.units, 5);
        let CartEvent::Changed(third) = events.try_recv().unwrap();
        assert_eq!(third.units, 0);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn no_op_mutations_neither_persist_nor_notify() {
        let storage = Arc::new(InMemoryCartStorage::new());
        let mut store = open_store(storage.clone());
        let events = store.subscribe();

        store.update_quantity(key(9, Size::XL), 3).unwrap();
        store.remove(key(9, Size::XL)).unwrap();
        store.clear().unwrap();

        assert!(storage.load().unwrap().is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn failed_save_keeps_prior_state_and_returns_the_error() {
        let storage = Arc::new(FlakyStorage::new());
        let mut store =
            CartStateStore::open(storage.clone(), Arc::new(InMemoryEventBus::new())).unwrap();
        let events = store.subscribe();

        store
            .add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400))
            .unwrap();
        assert!(events.try_recv().is_ok());

        storage.fail_next_saves();
        let err = store.add(key(2, Size::S), 1, snapshot("Bandana", 900)).unwrap_err();
        match err {
            CartError::Storage(CartStorageError::Io(_)) => {}
            other => panic!("Expected Storage error, got {other:?}"),
        }

        // The failed mutation left no trace: one line, no second event.
        assert_eq!(store.len(), 1);
        assert_eq!(store.units(), 2);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn reload_picks_up_external_writes_and_notifies() {
        let storage = Arc::new(InMemoryCartStorage::new());
        let mut store = open_store(storage.clone());
        let events = store.subscribe();

        // Another context rewrites the shared blob behind our back.
        let external = vec![CartLine::new(
            key(3, Size::L),
            4,
            snapshot("Puffer Vest", 6200),
        )];
        storage.save(&serde_json::to_string(&external).unwrap()).unwrap();
        assert!(store.is_empty());

        store.reload().unwrap();

        assert_eq!(store.lines(), external.as_slice());
        let CartEvent::Changed(event) = events.try_recv().unwrap();
        assert_eq!(event.units, 4);
    }
}
