use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use houndwear_events::Event;

/// Event: CartChanged. Fired after any cart mutation reaches storage, and
/// after a `reload` makes an external write visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartChanged {
    /// Distinct lines now in the cart.
    pub lines: u32,
    /// Total units across lines (the badge number).
    pub units: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    Changed(CartChanged),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::Changed(_) => "cart.changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::Changed(e) => e.occurred_at,
        }
    }
}
