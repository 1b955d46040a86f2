//! Stale-response fence for overlapping catalog reads.
//!
//! Shop searches can overlap when a shopper types faster than queries
//! resolve. The fence hands out monotonically increasing tickets and only
//! admits the newest one, so a slow older response is dropped instead of
//! clobbering the result of the request that superseded it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket for one fenced request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Newest-wins admission for responses that may arrive out of order.
#[derive(Debug, Default)]
pub struct RequestFence {
    issued: AtomicU64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Issue the next ticket, superseding every earlier one.
    pub fn begin(&self) -> RequestId {
        RequestId(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while `id` is still the newest issued ticket.
    pub fn admit(&self, id: RequestId) -> bool {
        self.issued.load(Ordering::SeqCst) == id.0
    }
}
