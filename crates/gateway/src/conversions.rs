//! Boundary mapping for the order-detail endpoint.
//!
//! The detail endpoint predates the list endpoint and names its fields
//! differently (`orderStatus` vs `status`, `restaurantAddress` vs
//! `pickupAddress`, `customerAddress` vs `dropAddress`, `unitPrice` vs
//! `price`). The mismatch is contained here: the raw DTO is crate-private
//! and [`map_order_detail`] produces the canonical [`Order`] shape with a
//! defaulting rule per field, so nothing downstream ever branches on which
//! endpoint a payload came from.

use chrono::{DateTime, Utc};
use food_express_core::{CartLine, CartLineId, MenuItemId, Order, OrderId, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Raw order-detail payload. Every field optional; defaults applied in the
/// mapper.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDetailDto {
    order_id: Option<i64>,
    id: Option<i64>,
    order_status: Option<String>,
    status: Option<String>,
    restaurant_name: Option<String>,
    restaurant_address: Option<String>,
    customer_name: Option<String>,
    customer_address: Option<String>,
    drop_address: Option<String>,
    items: Option<Vec<OrderDetailLineDto>>,
    total_amount: Option<Decimal>,
    order_date: Option<DateTime<Utc>>,
    agent_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderDetailLineDto {
    id: Option<i64>,
    name: Option<String>,
    unit_price: Option<Decimal>,
    quantity: Option<u32>,
}

/// Map a raw order-detail payload into the canonical [`Order`] shape.
pub(crate) fn map_order_detail(dto: OrderDetailDto) -> Order {
    let lines: Vec<CartLine> = dto
        .items
        .unwrap_or_default()
        .into_iter()
        .map(map_detail_line)
        .collect();

    Order {
        id: OrderId::new(dto.order_id.or(dto.id).unwrap_or_default()),
        status: OrderStatus::parse(
            dto.order_status
                .or(dto.status)
                .as_deref()
                .unwrap_or("Unknown"),
        ),
        restaurant_name: dto.restaurant_name.unwrap_or_default(),
        pickup_address: dto.restaurant_address.unwrap_or_default(),
        customer_name: dto.customer_name.unwrap_or_default(),
        drop_address: dto
            .customer_address
            .or(dto.drop_address)
            .unwrap_or_default(),
        total_items: u32::try_from(lines.len()).unwrap_or(u32::MAX),
        lines,
        total_amount: dto.total_amount.unwrap_or_default(),
        placed_at: dto.order_date.unwrap_or(DateTime::UNIX_EPOCH),
        agent_name: dto.agent_name.filter(|name| !name.is_empty()),
    }
}

fn map_detail_line(line: OrderDetailLineDto) -> CartLine {
    CartLine {
        // Detail items carry the menu item's own ID, not a cart line ID.
        id: CartLineId::UNASSIGNED,
        menu_item_id: MenuItemId::new(line.id.unwrap_or_default()),
        name: line.name.unwrap_or_default(),
        unit_price: line.unit_price.unwrap_or_default(),
        original_price: None,
        quantity: line.quantity.unwrap_or(1),
        image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_maps_detail_field_names() {
        let json = r#"{
            "orderId": 42,
            "orderStatus": "OUT_FOR_DELIVERY",
            "restaurantName": "Spice Route",
            "restaurantAddress": "12 Market St",
            "customerName": "Asha Rao",
            "customerAddress": "7 Lake View",
            "items": [
                {"id": 5, "name": "Masala Dosa", "unitPrice": 120, "quantity": 2}
            ],
            "totalAmount": 240,
            "orderDate": "2025-11-02T10:15:00Z",
            "agentName": "Ravi"
        }"#;
        let dto: OrderDetailDto = serde_json::from_str(json).expect("deserialize");
        let order = map_order_detail(dto);

        assert_eq!(order.id, OrderId::new(42));
        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.pickup_address, "12 Market St");
        assert_eq!(order.drop_address, "7 Lake View");
        assert_eq!(order.total_items, 1);
        let line = order.lines.first().expect("one line");
        assert_eq!(line.unit_price, dec!(120));
        assert_eq!(line.quantity, 2);
        assert_eq!(order.agent_name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_falls_back_to_list_field_names() {
        let json = r#"{
            "id": 7,
            "status": "placed",
            "dropAddress": "7 Lake View"
        }"#;
        let dto: OrderDetailDto = serde_json::from_str(json).expect("deserialize");
        let order = map_order_detail(dto);

        assert_eq!(order.id, OrderId::new(7));
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.drop_address, "7 Lake View");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let dto: OrderDetailDto = serde_json::from_str("{}").expect("deserialize");
        let order = map_order_detail(dto);

        assert_eq!(order.id, OrderId::new(0));
        assert_eq!(order.status, OrderStatus::Unknown("Unknown".to_string()));
        assert!(order.lines.is_empty());
        assert_eq!(order.total_amount, Decimal::ZERO);
        assert!(order.agent_name.is_none());
    }

    #[test]
    fn test_line_quantity_defaults_to_one() {
        let json = r#"{"items": [{"name": "Idli", "unitPrice": 60}]}"#;
        let dto: OrderDetailDto = serde_json::from_str(json).expect("deserialize");
        let order = map_order_detail(dto);
        assert_eq!(order.lines.first().expect("line").quantity, 1);
    }
}
