//! `houndwear-events` — change-notification mechanics.
//!
//! Transport pieces only (bus trait, subscriptions, in-memory bus). The
//! messages themselves live with the domain that emits them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
