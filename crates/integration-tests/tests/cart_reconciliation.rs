//! Cart reconciliation against the mock backend: the full
//! confirmed-before-applied loop, empty-cart normalization, and the
//! cross-restaurant guard.

use food_express_core::{CartLine, CartLineId, CustomerId, MenuItemId, RestaurantId};
use food_express_integration_tests::MockBackend;
use food_express_storefront::{CartError, CartStore};
use rust_decimal_macros::dec;

async fn store_with_menu(backend: &MockBackend) -> CartStore {
    {
        let mut state = backend.state().await;
        state.menu.insert(5, ("Masala Dosa".to_string(), dec!(120)));
        state.menu.insert(6, ("Filter Coffee".to_string(), dec!(40)));
    }
    CartStore::new(backend.gateway(), CustomerId::new(9))
}

fn line_for(menu_item: i64) -> CartLine {
    CartLine::new(MenuItemId::new(menu_item), String::new(), dec!(0))
}

#[tokio::test]
async fn test_missing_cart_loads_as_none() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    let cart = store.load().await.expect("404 is not an error");
    assert!(cart.is_none());
    assert!(store.current().is_none());
}

#[tokio::test]
async fn test_add_and_adjust_replace_snapshot_from_response() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    let cart = store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds")
        .expect("cart exists");
    assert_eq!(cart.item_count, 1);
    assert_eq!(cart.total_amount, dec!(120));

    let line_id = cart.lines.first().expect("one line").id;
    let cart = store
        .increase(line_id)
        .await
        .expect("increase succeeds")
        .expect("cart exists");
    assert_eq!(cart.item_count, 2);
    // Pricing comes from the backend's menu, not the placeholder line.
    assert_eq!(cart.total_amount, dec!(240));
}

#[tokio::test]
async fn test_decrease_to_zero_is_observed_as_none() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    let line_id = store.current().expect("cart").lines[0].id;
    store.increase(line_id).await.expect("increase succeeds");

    // Two units on one line: first decrease keeps the cart, second empties
    // it. At no point is an empty-but-present cart observable.
    let cart = store.decrease(line_id).await.expect("decrease succeeds");
    let cart = cart.expect("one unit left");
    assert_eq!(cart.item_count, 1);

    let cart = store.decrease(line_id).await.expect("decrease succeeds");
    assert!(cart.is_none());
    assert!(store.current().is_none());
}

#[tokio::test]
async fn test_remove_last_line_yields_none_via_no_content() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    let line = store.current().expect("cart").lines[0].clone();

    let cart = store.remove_item(&line).await.expect("remove succeeds");
    assert!(cart.is_none());
    assert!(store.current().is_none());
}

#[tokio::test]
async fn test_remove_one_of_two_lines_keeps_cart() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    store
        .add_item(&line_for(6), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");

    let line = store.current().expect("cart").lines[0].clone();
    let cart = store
        .remove_item(&line)
        .await
        .expect("remove succeeds")
        .expect("cart still has a line");
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.total_amount, dec!(40));
}

#[tokio::test]
async fn test_cross_restaurant_add_sends_no_request() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    let mutations_before = backend.counters().cart_mutations();

    let err = store
        .add_item(&line_for(6), RestaurantId::new(4), "Crust & Co")
        .await
        .expect_err("cross-restaurant add must be rejected");

    assert!(matches!(err, CartError::RestaurantMismatch { .. }));
    assert_eq!(backend.counters().cart_mutations(), mutations_before);
    // Prior snapshot untouched.
    assert_eq!(
        store.current().expect("cart").restaurant_id,
        RestaurantId::new(3)
    );
}

#[tokio::test]
async fn test_clear_empties_unconditionally() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    store.clear().await.expect("clear succeeds");

    assert!(store.current().is_none());
    assert!(backend.state().await.cart.is_none());
}

#[tokio::test]
async fn test_unknown_line_failure_preserves_snapshot() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    let before = store.current();

    let err = store
        .increase(CartLineId::new(999))
        .await
        .expect_err("unknown line is a backend error");
    assert!(matches!(err, CartError::Gateway(_)));
    assert_eq!(store.current(), before);
}

#[tokio::test]
async fn test_observers_see_every_transition() {
    let backend = MockBackend::spawn().await;
    let store = store_with_menu(&backend).await;
    let mut rx = store.subscribe();

    store
        .add_item(&line_for(5), RestaurantId::new(3), "Spice Route")
        .await
        .expect("add succeeds");
    assert!(rx.has_changed().expect("sender alive"));
    assert!(rx.borrow_and_update().is_some());

    store.clear().await.expect("clear succeeds");
    assert!(rx.has_changed().expect("sender alive"));
    assert!(rx.borrow_and_update().is_none());
}
