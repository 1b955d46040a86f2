//! Event publishing/subscription abstraction (mechanics only).
//!
//! A pub/sub mechanism for distributing change notifications to multiple
//! consumers (UI refreshers, projections, stream bridges). The bus is
//! intentionally **lightweight** and makes minimal assumptions:
//!
//! - **Transport-agnostic**: works with in-memory channels, broadcast
//!   channels, message queues, etc.
//! - **At-least-once delivery**: a message may be seen more than once;
//!   consumers must be idempotent
//! - **No persistence**: the bus distributes, the stores remain the source
//!   of truth — a consumer that missed a message re-reads instead of
//!   replaying

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of every message published to the bus
/// (broadcast semantics). Designed for single-threaded consumption; hand
/// one subscription to one consumer loop.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// loop {
///     match subscription.recv_timeout(Duration::from_secs(1)) {
///         Ok(event) => refresh(event)?,
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// Sits between state mutations and their observers:
///
/// ```text
/// Mutation → Store (persist) → Event Bus (publish) → Consumers
/// ```
///
/// State is **persisted first**, then published. A failed publication
/// therefore never loses data; observers catch up on their next read.
///
/// ## Delivery
///
/// At-least-once, broadcast to every subscriber, ordering only as strong as
/// the implementation provides. Consumers must tolerate duplicates.
///
/// ## Thread safety
///
/// Implementations are `Send + Sync`; multiple threads may publish
/// concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
