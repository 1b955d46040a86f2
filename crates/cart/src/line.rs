use serde::{Deserialize, Serialize};

use houndwear_core::{Price, ProductId, Size};

/// Identity of a cart line. Two picks of the same product in different
/// sizes are different lines; the same (product, size) pair always merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Size,
}

impl LineKey {
    pub fn new(product_id: ProductId, size: Size) -> Self {
        Self { product_id, size }
    }
}

/// Display payload captured when a line is first added, so the cart renders
/// without refetching the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub name: String,
    pub unit_price: Price,
    pub image: Option<String>,
}

/// One cart line as held in memory and persisted in the cart blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub size: Size,
    /// Never below 1; a zero-quantity line is removed, not kept.
    pub quantity: u32,
    pub name: String,
    #[serde(rename = "unit_price_cents")]
    pub unit_price: Price,
    pub image: Option<String>,
}

impl CartLine {
    pub fn new(key: LineKey, quantity: u32, snapshot: LineSnapshot) -> Self {
        Self {
            product_id: key.product_id,
            size: key.size,
            quantity,
            name: snapshot.name,
            unit_price: snapshot.unit_price,
            image: snapshot.image,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size)
    }

    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_shape_uses_wire_field_names() {
        let line = CartLine::new(
            LineKey::new(ProductId::new(12), Size::M),
            2,
            LineSnapshot {
                name: "Quilted Rain Shell".to_string(),
                unit_price: Price::from_cents(4500),
                image: Some("https://img.example/shell.jpg".to_string()),
            },
        );

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["product_id"], 12);
        assert_eq!(json["size"], "M");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["unit_price_cents"], 4500);
        assert_eq!(json["image"], "https://img.example/shell.jpg");
    }

    #[test]
    fn line_total_is_price_times_quantity() {
        let line = CartLine::new(
            LineKey::new(ProductId::new(1), Size::S),
            3,
            LineSnapshot {
                name: "Bandana".to_string(),
                unit_price: Price::from_cents(900),
                image: None,
            },
        );

        assert_eq!(line.line_total(), Price::from_cents(2700));
    }
}
