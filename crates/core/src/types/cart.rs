//! Cart shapes mirrored from the backend.
//!
//! A cart either does not exist (the customer has nothing in progress) or
//! holds at least one line. The backend expresses "does not exist" three
//! different ways - a 404 on read, a 204 on mutation, and a 200 with zero
//! lines - and [`CartSnapshot::into_non_empty`] folds all of them into
//! `Option::None` so the rest of the client never sees an empty-but-present
//! cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, CartLineId, CustomerId, MenuItemId, RestaurantId};

/// One line of a cart: a menu item at a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Server-assigned line ID; [`CartLineId::UNASSIGNED`] before the first
    /// persist.
    #[serde(rename = "cartItemId", default = "CartLineId::unassigned")]
    pub id: CartLineId,
    /// The menu item this line references.
    #[serde(rename = "menuItemId")]
    pub menu_item_id: MenuItemId,
    /// Display name of the menu item.
    pub name: String,
    /// Unit price after any discount.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Pre-discount unit price, if the item is discounted.
    #[serde(rename = "originalPrice", default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Quantity, always greater than zero in a persisted line.
    pub quantity: u32,
    /// Image reference for display.
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// A fresh, unpersisted line for a menu item at quantity 1.
    #[must_use]
    pub const fn new(menu_item_id: MenuItemId, name: String, unit_price: Decimal) -> Self {
        Self {
            id: CartLineId::UNASSIGNED,
            menu_item_id,
            name,
            unit_price,
            original_price: None,
            quantity: 1,
            image_url: None,
        }
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The authoritative cart mirror for one customer.
///
/// All lines belong to the same restaurant; the store rejects
/// cross-restaurant adds before they reach the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(rename = "cartId")]
    pub id: CartId,
    #[serde(default)]
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub restaurant_name: String,
    #[serde(rename = "items", default)]
    pub lines: Vec<CartLine>,
    /// Total item count across lines, as computed by the backend.
    #[serde(default)]
    pub item_count: u32,
    /// Cart subtotal, as computed by the backend. The backend owns pricing
    /// and discounts; clients never derive this locally.
    #[serde(default)]
    pub total_amount: Decimal,
}

impl CartSnapshot {
    /// Whether the snapshot has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Normalize a server response: a zero-line cart becomes `None`.
    #[must_use]
    pub fn into_non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Look up a line by its server-assigned ID.
    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn snapshot(lines: Vec<CartLine>) -> CartSnapshot {
        CartSnapshot {
            id: CartId::new(1),
            customer_id: CustomerId::new(9),
            restaurant_id: RestaurantId::new(3),
            restaurant_name: "Spice Route".to_string(),
            item_count: lines.iter().map(|l| l.quantity).sum(),
            total_amount: lines.iter().map(CartLine::line_total).sum(),
            lines,
        }
    }

    #[test]
    fn test_zero_line_snapshot_normalizes_to_none() {
        assert!(snapshot(vec![]).into_non_empty().is_none());
    }

    #[test]
    fn test_non_empty_snapshot_survives_normalization() {
        let line = CartLine::new(MenuItemId::new(5), "Masala Dosa".to_string(), dec!(120));
        let cart = snapshot(vec![line]).into_non_empty().expect("non-empty");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_amount, dec!(120));
    }

    #[test]
    fn test_cart_deserializes_backend_field_names() {
        let json = r#"{
            "cartId": 11,
            "customerId": 9,
            "restaurantId": 3,
            "restaurantName": "Spice Route",
            "items": [
                {"cartItemId": 21, "menuItemId": 5, "name": "Masala Dosa",
                 "price": 120, "quantity": 2, "originalPrice": 150}
            ],
            "itemCount": 2,
            "totalAmount": 240
        }"#;
        let cart: CartSnapshot = serde_json::from_str(json).expect("deserialize");
        assert_eq!(cart.id, CartId::new(11));
        let line = cart.line(CartLineId::new(21)).expect("line present");
        assert_eq!(line.unit_price, dec!(120));
        assert_eq!(line.original_price, Some(dec!(150)));
        assert_eq!(line.line_total(), dec!(240));
    }

    #[test]
    fn test_line_without_id_defaults_to_unassigned() {
        let json = r#"{"menuItemId": 5, "name": "Idli", "price": 60, "quantity": 1}"#;
        let line: CartLine = serde_json::from_str(json).expect("deserialize");
        assert!(line.id.is_unassigned());
    }
}
