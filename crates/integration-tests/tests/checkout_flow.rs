//! Checkout flow against the mock backend: the happy path, cancellation,
//! and the post-capture finalize failure.

use food_express_core::{
    CartId, CartLine, CartSnapshot, CurrencyCode, Customer, CustomerId, MenuItemId,
    PaymentConfirmation, RestaurantId,
};
use food_express_integration_tests::MockBackend;
use food_express_storefront::{
    BillingForm, CartStore, CheckoutError, CheckoutOrchestrator, CheckoutPolicy, CheckoutState,
    FailureReason, PaymentCollaborator, PaymentOutcome, PaymentProviderConfig, PaymentRequest,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Authorize;

impl PaymentCollaborator for Authorize {
    async fn collect(&self, request: PaymentRequest) -> PaymentOutcome {
        PaymentOutcome::Authorized(PaymentConfirmation {
            provider_order_id: request.provider_order_id,
            payment_id: "txn_test".to_string(),
            signature: "sig_test".to_string(),
        })
    }
}

struct Cancel;

impl PaymentCollaborator for Cancel {
    async fn collect(&self, _request: PaymentRequest) -> PaymentOutcome {
        PaymentOutcome::Cancelled
    }
}

fn policy() -> CheckoutPolicy {
    CheckoutPolicy {
        gst_rate: dec!(0.18),
        delivery_fee: Decimal::ZERO,
        free_delivery_above: None,
        currency: CurrencyCode::INR,
    }
}

fn valid_form() -> BillingForm {
    BillingForm {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "7 Lake View".to_string(),
        state: "MH".to_string(),
        city: "Pune".to_string(),
        zip: "411001".to_string(),
    }
}

async fn seed_cart(backend: &MockBackend, subtotal: Decimal) {
    backend.state().await.cart = Some(CartSnapshot {
        id: CartId::new(1),
        customer_id: CustomerId::new(9),
        restaurant_id: RestaurantId::new(3),
        restaurant_name: "Spice Route".to_string(),
        lines: vec![CartLine::new(
            MenuItemId::new(5),
            "Masala Dosa".to_string(),
            subtotal,
        )],
        item_count: 1,
        total_amount: subtotal,
    });
}

async fn orchestrator<P: PaymentCollaborator>(
    backend: &MockBackend,
    collaborator: P,
) -> (CheckoutOrchestrator<P>, CartStore) {
    let gateway = backend.gateway();
    let cart = CartStore::new(gateway.clone(), CustomerId::new(9));
    cart.load().await.expect("cart loads");
    let orchestrator = CheckoutOrchestrator::new(
        gateway,
        cart.clone(),
        collaborator,
        policy(),
        PaymentProviderConfig::new("pk_test_abc".to_string()),
        CustomerId::new(9),
    );
    (orchestrator, cart)
}

#[tokio::test]
async fn test_happy_path_places_order_and_clears_cart() {
    let backend = MockBackend::spawn().await;
    seed_cart(&backend, dec!(100)).await;

    let (mut orchestrator, cart) = orchestrator(&backend, Authorize).await;
    orchestrator.begin();
    *orchestrator.form_mut() = valid_form();

    orchestrator.place_order().await.expect("checkout succeeds");
    assert_eq!(orchestrator.state(), CheckoutState::Completed);

    // subtotal 100 at 18% GST, no delivery fee: 118, server-validated.
    let state = backend.state().await;
    let placed = state.placed.first().expect("order placed");
    assert_eq!(placed.total_amount, dec!(118));
    assert_eq!(placed.delivery_address, "7 Lake View, Pune, MH - 411001");
    assert_eq!(placed.confirmation.provider_order_id, "pay_test_1");
    assert_eq!(placed.confirmation.payment_id, "txn_test");

    // Cart cleared on both sides.
    assert!(state.cart.is_none());
    assert!(cart.current().is_none());
}

#[tokio::test]
async fn test_cancelled_payment_never_calls_finalize() {
    let backend = MockBackend::spawn().await;
    seed_cart(&backend, dec!(100)).await;

    let (mut orchestrator, cart) = orchestrator(&backend, Cancel).await;
    orchestrator.begin();
    *orchestrator.form_mut() = valid_form();

    let err = orchestrator.place_order().await.expect_err("cancelled");
    assert!(matches!(err, CheckoutError::PaymentCancelled));
    assert_eq!(
        orchestrator.state(),
        CheckoutState::Failed(FailureReason::PaymentCancelled)
    );

    // No finalize request went out; cart untouched.
    assert_eq!(backend.counters().finalizes(), 0);
    assert!(backend.state().await.cart.is_some());
    assert!(cart.current().is_some());
}

#[tokio::test]
async fn test_fresh_intent_per_attempt() {
    let backend = MockBackend::spawn().await;
    seed_cart(&backend, dec!(100)).await;

    let (mut orchestrator, _cart) = orchestrator(&backend, Cancel).await;
    orchestrator.begin();
    *orchestrator.form_mut() = valid_form();

    orchestrator.place_order().await.expect_err("cancelled");
    // Retry from the still-populated form gets a new intent, not the
    // cancelled one.
    orchestrator.begin();
    orchestrator.place_order().await.expect_err("cancelled again");

    assert_eq!(backend.state().await.payment_intents_issued(), 2);
}

#[tokio::test]
async fn test_finalize_failure_is_urgent_and_preserves_cart() {
    let backend = MockBackend::spawn().await;
    seed_cart(&backend, dec!(100)).await;
    backend.state().await.fail_finalize = true;

    let (mut orchestrator, cart) = orchestrator(&backend, Authorize).await;
    orchestrator.begin();
    *orchestrator.form_mut() = valid_form();

    let err = orchestrator.place_order().await.expect_err("finalize fails");
    assert!(matches!(err, CheckoutError::FinalizeFailed(_)));
    assert_eq!(
        orchestrator.state(),
        CheckoutState::Failed(FailureReason::FinalizeError)
    );

    // Payment was captured but the order is not recorded: exactly one
    // finalize attempt, no local retry, cart NOT cleared.
    assert_eq!(backend.counters().finalizes(), 1);
    assert!(backend.state().await.cart.is_some());
    assert!(cart.current().is_some());
}

#[tokio::test]
async fn test_prefill_from_customer_profile() {
    let backend = MockBackend::spawn().await;
    backend.state().await.customers.insert(
        9,
        Customer {
            id: CustomerId::new(9),
            name: "Asha Devi Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "7 Lake View".to_string(),
        },
    );

    let (mut orchestrator, _cart) = orchestrator(&backend, Authorize).await;
    orchestrator.begin();
    orchestrator.prefill().await.expect("profile exists");

    assert_eq!(orchestrator.form().first_name, "Asha");
    assert_eq!(orchestrator.form().last_name, "Devi Rao");
    assert_eq!(orchestrator.form().phone, "9876543210");
}
