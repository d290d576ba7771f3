//! Courier fulfillment against the mock backend: assignment loading through
//! the detail-endpoint mapper, delivery confirmation, and the two-step
//! re-fetch that discovers the next assignment.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use food_express_core::{
    AgentId, AgentStatus, CartLine, DeliveryAgent, MenuItemId, Order, OrderId, OrderStatus,
};
use food_express_courier::{CourierDashboard, CourierError};
use food_express_integration_tests::MockBackend;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn order(id: i64, status: &str) -> Order {
    Order {
        id: OrderId::new(id),
        status: OrderStatus::parse(status),
        restaurant_name: "Spice Route".to_string(),
        pickup_address: "12 Market St".to_string(),
        customer_name: "Asha Rao".to_string(),
        drop_address: "7 Lake View".to_string(),
        lines: vec![CartLine::new(
            MenuItemId::new(5),
            "Masala Dosa".to_string(),
            dec!(120),
        )],
        total_items: 1,
        total_amount: dec!(120),
        placed_at: Utc
            .with_ymd_and_hms(2025, 11, 2, 12, 0, 0)
            .single()
            .expect("valid date"),
        agent_name: Some("Ravi".to_string()),
    }
}

fn busy_agent(id: i64, current_order: Option<i64>) -> DeliveryAgent {
    DeliveryAgent {
        id: AgentId::new(id),
        name: "Ravi".to_string(),
        phone: "9876543210".to_string(),
        email: "ravi@example.com".to_string(),
        status: if current_order.is_some() {
            AgentStatus::Busy
        } else {
            AgentStatus::Available
        },
        current_order_id: current_order.map(OrderId::new),
        today_earning: Decimal::ZERO,
        total_earning: Decimal::ZERO,
        total_deliveries: 87,
        rating: 4.6,
    }
}

#[tokio::test]
async fn test_load_assignment_maps_detail_endpoint_fields() {
    let backend = MockBackend::spawn().await;
    {
        let mut state = backend.state().await;
        state.orders = vec![order(42, "out_for_delivery")];
        state.agents.insert(4, busy_agent(4, Some(42)));
    }

    let dashboard = CourierDashboard::new(backend.gateway());
    let view = dashboard
        .load_assignment(AgentId::new(4))
        .await
        .expect("assignment loads");

    let current = view.current_order.expect("order displayed");
    assert_eq!(current.id, OrderId::new(42));
    assert_eq!(current.status, OrderStatus::OutForDelivery);
    // restaurantAddress/customerAddress arrive under the canonical names.
    assert_eq!(current.pickup_address, "12 Market St");
    assert_eq!(current.drop_address, "7 Lake View");
    assert_eq!(current.lines.len(), 1);
    assert!(view.message.is_none());
}

#[tokio::test]
async fn test_agent_without_assignment_is_not_an_error() {
    let backend = MockBackend::spawn().await;
    backend.state().await.agents.insert(4, busy_agent(4, None));

    let dashboard = CourierDashboard::new(backend.gateway());
    let view = dashboard
        .load_assignment(AgentId::new(4))
        .await
        .expect("no assignment is a normal state");

    assert!(view.agent.is_some());
    assert!(view.current_order.is_none());
    assert_eq!(view.message.as_deref(), Some("No current order assigned."));
}

#[tokio::test]
async fn test_mark_delivered_discovers_queued_assignment() {
    let backend = MockBackend::spawn().await;
    {
        let mut state = backend.state().await;
        state.orders = vec![order(42, "out_for_delivery"), order(43, "placed")];
        state.agents.insert(4, busy_agent(4, Some(42)));
        // The admin board already queued the next order for this agent.
        state.queued_assignment.insert(4, 43);
    }

    let dashboard = CourierDashboard::new(backend.gateway());
    dashboard
        .load_assignment(AgentId::new(4))
        .await
        .expect("assignment loads");

    let view = dashboard.mark_delivered().await.expect("delivery confirms");

    // The confirmation animation is still playing when control returns.
    assert!(view.delivery_confirmed);
    // Agent re-fetch surfaced the queued order; order re-fetch displayed it.
    let current = view.current_order.expect("next order displayed");
    assert_eq!(current.id, OrderId::new(43));

    // The animation flag drops after its display window.
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(!dashboard.view().await.delivery_confirmed);
}

#[tokio::test(start_paused = true)]
async fn test_mark_delivered_with_no_queued_order_shows_message() {
    let backend = MockBackend::spawn().await;
    {
        let mut state = backend.state().await;
        state.orders = vec![order(42, "out_for_delivery")];
        state.agents.insert(4, busy_agent(4, Some(42)));
    }

    let dashboard = CourierDashboard::new(backend.gateway());
    dashboard
        .load_assignment(AgentId::new(4))
        .await
        .expect("assignment loads");

    let view = dashboard.mark_delivered().await.expect("delivery confirms");

    assert!(view.current_order.is_none());
    assert_eq!(view.message.as_deref(), Some("No current order assigned."));
    assert_eq!(backend.counters().delivers(), 1);
}

#[tokio::test]
async fn test_failed_delivery_leaves_displayed_order() {
    let backend = MockBackend::spawn().await;
    {
        let mut state = backend.state().await;
        state.orders = vec![order(42, "out_for_delivery")];
        state.agents.insert(4, busy_agent(4, Some(42)));
        state.fail_deliver = true;
    }

    let dashboard = CourierDashboard::new(backend.gateway());
    dashboard
        .load_assignment(AgentId::new(4))
        .await
        .expect("assignment loads");

    let err = dashboard.mark_delivered().await.expect_err("backend rejects");
    assert!(matches!(err, CourierError::Gateway(_)));

    // The delivery may not have been recorded; the order stays displayed.
    let view = dashboard.view().await;
    assert_eq!(
        view.current_order.expect("order still displayed").id,
        OrderId::new(42)
    );
    assert!(!view.delivery_confirmed);
}
