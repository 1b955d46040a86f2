//! Quantity bounds math for one (product, size) selection.

use serde::{Deserialize, Serialize};

use houndwear_core::Size;

use crate::stock::StockBySize;

/// Inclusive quantity range derived from current stock.
///
/// `min` is always 1. At stock 0 the range is the degenerate `[1, 0]`:
/// clamping keeps the displayed quantity at 1 while callers disable the
/// add action. The range is a point-in-time read, not a reservation, so it
/// narrows the oversell window without closing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityBounds {
    pub min: u32,
    pub max: u32,
}

impl QuantityBounds {
    pub fn for_stock(stock: u32) -> Self {
        Self { min: 1, max: stock }
    }

    /// `max(min, min(requested, max))`.
    pub fn clamp(&self, requested: u32) -> u32 {
        self.min.max(requested.min(self.max))
    }

    pub fn permits_purchase(&self) -> bool {
        self.max >= self.min
    }
}

/// The size a selector starts on.
///
/// First size in canonical order with stock above 0; if everything is sold
/// out, the first size the product carries at all, so the selector is never
/// empty while rows exist. `None` only for a product with no rows.
pub fn default_size(stock: &StockBySize) -> Option<Size> {
    Size::ALL
        .into_iter()
        .find(|size| stock.get(size).copied().unwrap_or(0) > 0)
        .or_else(|| stock.keys().next().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn clamp_limits_request_to_stock() {
        // Stock 3 for the selected size: a request for 10 lands on 3.
        let bounds = QuantityBounds::for_stock(3);
        assert_eq!(bounds.clamp(10), 3);
        assert_eq!(bounds.clamp(2), 2);
    }

    #[test]
    fn clamp_raises_zero_to_the_floor() {
        let bounds = QuantityBounds::for_stock(3);
        assert_eq!(bounds.clamp(0), 1);
    }

    #[test]
    fn zero_stock_bounds_are_degenerate_but_stable() {
        let bounds = QuantityBounds::for_stock(0);
        assert_eq!(bounds, QuantityBounds { min: 1, max: 0 });
        assert_eq!(bounds.clamp(5), 1);
        assert!(!bounds.permits_purchase());
    }

    #[test]
    fn default_size_prefers_first_in_stock() {
        let stock: StockBySize =
            BTreeMap::from([(Size::XS, 0), (Size::S, 0), (Size::M, 4), (Size::L, 2)]);

        assert_eq!(default_size(&stock), Some(Size::M));
    }

    #[test]
    fn default_size_falls_back_to_first_carried_size() {
        let stock: StockBySize = BTreeMap::from([(Size::S, 0), (Size::XL, 0)]);

        assert_eq!(default_size(&stock), Some(Size::S));
    }

    #[test]
    fn default_size_is_none_without_rows() {
        assert_eq!(default_size(&BTreeMap::new()), None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: a clamped quantity is inside `[1, max(1, stock)]`
            /// and untouched when already inside `[1, stock]`.
            #[test]
            fn clamp_lands_inside_the_range(stock in 0u32..10_000, requested in 0u32..20_000) {
                let bounds = QuantityBounds::for_stock(stock);
                let clamped = bounds.clamp(requested);

                prop_assert!(clamped >= 1);
                prop_assert!(clamped <= stock.max(1));
                if requested >= 1 && requested <= stock {
                    prop_assert_eq!(clamped, requested);
                }
            }

            /// Property: clamp is idempotent.
            #[test]
            fn clamp_is_idempotent(stock in 0u32..10_000, requested in 0u32..20_000) {
                let bounds = QuantityBounds::for_stock(stock);
                let once = bounds.clamp(requested);

                prop_assert_eq!(bounds.clamp(once), once);
            }
        }
    }
}
