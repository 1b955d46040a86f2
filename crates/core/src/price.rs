//! Money amounts in the smallest currency unit.

use serde::{Deserialize, Serialize};

/// A price in cents.
///
/// Amounts stay integral end to end; rendering as dollars is a presentation
/// concern. Single implicit currency.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Self = Self(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Price after a percentage discount, floored to whole cents.
    ///
    /// Percentages above 100 are treated as 100.
    pub fn discounted(&self, percent: u8) -> Self {
        let keep = 100 - u128::from(percent.min(100));
        Self((u128::from(self.0) * keep / 100) as u64)
    }

    /// Line total for `quantity` units.
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_floors_to_whole_cents() {
        assert_eq!(Price::from_cents(999).discounted(10), Price::from_cents(899));
        assert_eq!(Price::from_cents(100).discounted(33), Price::from_cents(67));
    }

    #[test]
    fn discount_edges() {
        assert_eq!(Price::from_cents(4500).discounted(0), Price::from_cents(4500));
        assert_eq!(Price::from_cents(4500).discounted(100), Price::ZERO);
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        assert_eq!(Price::from_cents(2500).times(3), Price::from_cents(7500));
        assert_eq!(Price::from_cents(2500).times(0), Price::ZERO);
    }
}
