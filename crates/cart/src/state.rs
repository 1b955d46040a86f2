//! Pure cart state: an ordered line collection with merge semantics.

use houndwear_core::Price;

use crate::line::{CartLine, LineKey, LineSnapshot};

/// The in-memory cart value.
///
/// Lines keep the order they were first added in; merging into an existing
/// line never moves it. Quantities never drop below 1: hitting zero is
/// expressed by removing the line, not by keeping an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild from persisted lines, as written by a previous session.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines (the cart badge number).
    pub fn units(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Order total, recomputed from the lines on every call.
    pub fn total(&self) -> Price {
        Price::from_cents(
            self.lines
                .iter()
                .map(|line| line.line_total().cents())
                .sum(),
        )
    }

    pub fn get(&self, key: LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == key)
    }

    /// Add units of a (product, size) pick.
    ///
    /// An existing line absorbs the quantity (`q1` then `q2` leaves
    /// `q1 + q2`); otherwise a new line is appended. Quantities below 1
    /// are raised to 1 before merging.
    pub fn add(&mut self, key: LineKey, quantity: u32, snapshot: LineSnapshot) {
        let quantity = quantity.max(1);
        match self.lines.iter_mut().find(|line| line.key() == key) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(key, quantity, snapshot)),
        }
    }

    /// Set a line's quantity to `max(1, quantity)`.
    ///
    /// Returns `false` (state untouched) when no such line exists.
    pub fn update_quantity(&mut self, key: LineKey, quantity: u32) -> bool {
        match self.lines.iter_mut().find(|line| line.key() == key) {
            Some(line) => {
                line.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` (state untouched) when absent.
    pub fn remove(&mut self, key: LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.key() != key);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use houndwear_core::{ProductId, Size};

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

    #[test]
    fn adding_the_same_key_merges_quantities() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        cart.add(key(1, Size::M), 3, snapshot("Harness Jacket", 5400));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn different_sizes_are_separate_lines() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 1, snapshot("Harness Jacket", 5400));
        cart.add(key(1, Size::L), 1, snapshot("Harness Jacket", 5400));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn merge_keeps_first_added_order() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 1, snapshot("Harness Jacket", 5400));
        cart.add(key(2, Size::S), 1, snapshot("Bandana", 900));
        cart.add(key(1, Size::M), 4, snapshot("Harness Jacket", 5400));

        let keys: Vec<LineKey> = cart.lines().iter().map(CartLine::key).collect();
        assert_eq!(keys, vec![key(1, Size::M), key(2, Size::S)]);
    }

    #[test]
    fn add_raises_zero_quantity_to_one() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::S), 0, snapshot("Bandana", 900));

        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn update_quantity_clamps_to_the_floor() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 3, snapshot("Harness Jacket", 5400));

        assert!(cart.update_quantity(key(1, Size::M), 0));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn update_quantity_on_absent_line_is_a_no_op() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        let before = cart.clone();

        assert!(!cart.update_quantity(key(9, Size::XL), 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn remove_deletes_only_the_matching_line() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        cart.add(key(2, Size::S), 1, snapshot("Bandana", 900));

        assert!(cart.remove(key(1, Size::M)));
        assert!(!cart.remove(key(1, Size::M)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(2));
    }

    #[test]
    fn total_is_recomputed_from_lines() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        cart.add(key(2, Size::S), 3, snapshot("Bandana", 900));

        assert_eq!(cart.total(), Price::from_cents(2 * 5400 + 3 * 900));

        cart.update_quantity(key(1, Size::M), 1);
        assert_eq!(cart.total(), Price::from_cents(5400 + 3 * 900));
    }

    #[test]
    fn units_sums_quantities() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        cart.add(key(2, Size::S), 3, snapshot("Bandana", 900));

        assert_eq!(cart.units(), 5);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::empty();
        cart.add(key(1, Size::M), 2, snapshot("Harness Jacket", 5400));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
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

            /// Property: adding q1 then q2 of the same key merges into one
            /// line holding q1 + q2.
            #[test]
            fn merge_law(q1 in 1u32..1_000, q2 in 1u32..1_000) {
                let mut cart = Cart::empty();
                cart.add(key(1, Size::M), q1, snapshot("Harness Jacket", 5400));
                cart.add(key(1, Size::M), q2, snapshot("Harness Jacket", 5400));

                prop_assert_eq!(cart.len(), 1);
                prop_assert_eq!(cart.lines()[0].quantity, q1 + q2);
            }

            /// Property: the total always equals the sum over lines of
            /// unit price times quantity.
            #[test]
            fn total_matches_line_arithmetic(
                entries in proptest::collection::vec((1i64..50, 0usize..5, 1u32..50, 1u64..10_000), 0..12),
            ) {
                let mut cart = Cart::empty();
                for (id, size_idx, quantity, cents) in &entries {
                    cart.add(
                        key(*id, houndwear_core::Size::ALL[*size_idx]),
                        *quantity,
                        snapshot("x", *cents),
                    );
                }

                let expected: u64 = cart
                    .lines()
                    .iter()
                    .map(|line| line.unit_price.cents() * u64::from(line.quantity))
                    .sum();
                prop_assert_eq!(cart.total(), Price::from_cents(expected));
            }

            /// Property: update_quantity never leaves a quantity below 1.
            #[test]
            fn update_respects_the_floor(q in 0u32..10_000) {
                let mut cart = Cart::empty();
                cart.add(key(1, Size::S), 5, snapshot("Bandana", 900));
                cart.update_quantity(key(1, Size::S), q);

                prop_assert!(cart.lines()[0].quantity >= 1);
                prop_assert_eq!(cart.lines()[0].quantity, q.max(1));
            }
        }
    }
}
