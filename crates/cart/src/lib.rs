//! Cart domain module.
//!
//! The shopper-held cart: ordered lines keyed by (product, size), merge
//! semantics, and the persistence/notification ports the state store runs
//! through. State math is pure; the only IO is whatever `CartStorage`
//! adapter is plugged in.

pub mod event;
pub mod line;
pub mod state;
pub mod storage;
pub mod store;

pub use event::{CartChanged, CartEvent};
pub use line::{CartLine, LineKey, LineSnapshot};
pub use state::Cart;
pub use storage::{CartStorage, CartStorageError, InMemoryCartStorage};
pub use store::{CartError, CartStateStore};
