//! Checkout Orchestrator.
//!
//! Drives the multi-step flow from billing-form submission through external
//! payment authorization to order finalization and cart clearing:
//!
//! ```text
//! Idle -> FormEditing -> AwaitingPaymentIntent -> AwaitingPaymentAuthorization
//!      -> Finalizing -> Completed
//! ```
//!
//! `Failed(reason)` is reachable from every awaiting/finalizing state. The
//! form stays populated across failures so a retry restarts from
//! `FormEditing` without re-entering data - but always with a fresh payment
//! intent; intents are never reused.

mod form;
mod payment;
mod policy;

pub use form::{BillingForm, BillingFormErrors, FieldError};
pub use payment::{
    PaymentCollaborator, PaymentOutcome, PaymentPrefill, PaymentProviderConfig, PaymentRequest,
};
pub use policy::CheckoutPolicy;

use food_express_core::{CustomerId, FinalizedOrder, Money};
use food_express_gateway::{GatewayError, OrderGateway};
use thiserror::Error;
use tracing::instrument;

use crate::cart_store::CartStore;

/// Where the checkout flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    FormEditing,
    AwaitingPaymentIntent,
    AwaitingPaymentAuthorization,
    Finalizing,
    Completed,
    Failed(FailureReason),
}

/// Why a checkout attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The customer dismissed the payment widget. No charge occurred.
    PaymentCancelled,
    /// The payment intent could not be created. No charge occurred.
    IntentError,
    /// Finalize failed AFTER the provider captured the payment. Funds and
    /// cart state may be inconsistent; this is surfaced as urgent and never
    /// retried locally.
    FinalizeError,
}

/// Errors surfaced by [`CheckoutOrchestrator::place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The billing form is invalid; nothing reached the network.
    #[error("billing details are invalid: {0}")]
    Validation(BillingFormErrors),

    /// No cart subtotal has arrived yet; there is nothing to charge.
    #[error("cart has no subtotal to charge yet")]
    NothingToCharge,

    /// Payment intent request failed. Safe to retry by re-submitting.
    #[error("payment intent request failed: {0}")]
    Intent(#[source] GatewayError),

    /// The customer cancelled the payment step. Finalize was not called.
    #[error("payment was cancelled before authorization")]
    PaymentCancelled,

    /// Payment captured but finalize failed. Retrying from the client could
    /// double-charge; escalate to support instead.
    #[error("payment captured but order finalization failed: {0}")]
    FinalizeFailed(#[source] GatewayError),
}

/// The checkout state machine for one customer session.
pub struct CheckoutOrchestrator<P> {
    gateway: OrderGateway,
    cart: CartStore,
    collaborator: P,
    policy: CheckoutPolicy,
    provider: PaymentProviderConfig,
    customer_id: CustomerId,
    state: CheckoutState,
    form: BillingForm,
    charge: Option<Money>,
}

impl<P: PaymentCollaborator> CheckoutOrchestrator<P> {
    /// Create an orchestrator in the `Idle` state.
    pub fn new(
        gateway: OrderGateway,
        cart: CartStore,
        collaborator: P,
        policy: CheckoutPolicy,
        provider: PaymentProviderConfig,
        customer_id: CustomerId,
    ) -> Self {
        Self {
            gateway,
            cart,
            collaborator,
            policy,
            provider,
            customer_id,
            state: CheckoutState::Idle,
            form: BillingForm::default(),
            charge: None,
        }
    }

    /// Enter (or re-enter, after a failure) the form-editing state.
    ///
    /// The form keeps whatever the customer already typed.
    pub fn begin(&mut self) {
        self.state = CheckoutState::FormEditing;
    }

    /// Current state of the machine.
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Read the billing form.
    #[must_use]
    pub const fn form(&self) -> &BillingForm {
        &self.form
    }

    /// Edit the billing form.
    pub fn form_mut(&mut self) -> &mut BillingForm {
        &mut self.form
    }

    /// The last computed charge, if any.
    #[must_use]
    pub const fn charge(&self) -> Option<Money> {
        self.charge
    }

    /// Prefill contact fields from the customer profile.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the form is left as it was, which is a
    /// usable (if emptier) starting point.
    #[instrument(skip(self))]
    pub async fn prefill(&mut self) -> Result<(), GatewayError> {
        let customer = self.gateway.get_customer(self.customer_id).await?;
        self.form.prefill_from(&customer);
        Ok(())
    }

    /// Recompute the charge from the current cart subtotal.
    ///
    /// A missing or zero subtotal is a no-op: the previous charge (if any)
    /// stands, and no error is raised. This guards against computing a
    /// charge before cart data has arrived.
    pub fn refresh_charge(&mut self) -> Option<Money> {
        let subtotal = self.cart.current().map(|c| c.total_amount)?;
        if let Some(total) = self.policy.total_for(subtotal) {
            self.charge = Some(total);
        }
        self.charge
    }

    /// Run the whole flow: validate, create an intent, cede control to the
    /// payment widget, finalize, clear the cart.
    ///
    /// On success the machine lands in `Completed`; navigation afterwards is
    /// the caller's concern.
    ///
    /// # Errors
    ///
    /// Every failure mode maps to one [`CheckoutError`] variant and a
    /// matching machine state; see the variant docs for retry guidance.
    #[instrument(skip(self), fields(customer_id = %self.customer_id))]
    pub async fn place_order(&mut self) -> Result<(), CheckoutError> {
        // Validation failures never reach the network.
        if let Err(errors) = self.form.validate() {
            self.state = CheckoutState::FormEditing;
            return Err(CheckoutError::Validation(errors));
        }

        self.refresh_charge();
        let Some(charge) = self.charge else {
            self.state = CheckoutState::FormEditing;
            return Err(CheckoutError::NothingToCharge);
        };

        // A fresh intent per attempt; a cancelled or failed attempt must not
        // reuse this one.
        self.state = CheckoutState::AwaitingPaymentIntent;
        let intent = match self.gateway.create_payment_intent(charge).await {
            Ok(intent) => intent,
            Err(e) => {
                self.state = CheckoutState::Failed(FailureReason::IntentError);
                return Err(CheckoutError::Intent(e));
            }
        };

        // Control passes to the opaque widget until it resolves.
        self.state = CheckoutState::AwaitingPaymentAuthorization;
        let request = PaymentRequest::for_intent(
            &intent,
            &self.provider,
            PaymentPrefill {
                name: self.form.full_name(),
                email: self.form.email.clone(),
                contact: self.form.phone.clone(),
            },
            self.form.delivery_address(),
        );

        let confirmation = match self.collaborator.collect(request).await {
            PaymentOutcome::Authorized(confirmation) => confirmation,
            PaymentOutcome::Cancelled => {
                self.state = CheckoutState::Failed(FailureReason::PaymentCancelled);
                return Err(CheckoutError::PaymentCancelled);
            }
        };

        // Past this point the provider holds the funds: finalize exactly
        // once and never retry from the client.
        self.state = CheckoutState::Finalizing;
        let order = FinalizedOrder {
            customer_id: self.customer_id,
            total_amount: charge.amount,
            delivery_address: self.form.delivery_address(),
            confirmation,
        };

        if let Err(e) = self.gateway.place_order(&order).await {
            self.state = CheckoutState::Failed(FailureReason::FinalizeError);
            tracing::error!(
                error = %e,
                customer_id = %self.customer_id,
                "Order finalization failed after payment capture; escalate to support"
            );
            return Err(CheckoutError::FinalizeFailed(e));
        }

        // The order exists server-side now; a failed local cart clear is an
        // annoyance, not a checkout failure.
        if let Err(e) = self.cart.clear().await {
            tracing::warn!(error = %e, "Cart clear after successful order failed");
        }

        self.state = CheckoutState::Completed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use food_express_core::{
        CartId, CartLine, CartSnapshot, MenuItemId, PaymentConfirmation, RestaurantId,
    };
    use food_express_gateway::GatewayConfig;
    use rust_decimal_macros::dec;

    use super::*;

    struct CancelEverything;

    impl PaymentCollaborator for CancelEverything {
        async fn collect(&self, _request: PaymentRequest) -> PaymentOutcome {
            PaymentOutcome::Cancelled
        }
    }

    struct AuthorizeEverything;

    impl PaymentCollaborator for AuthorizeEverything {
        async fn collect(&self, request: PaymentRequest) -> PaymentOutcome {
            PaymentOutcome::Authorized(PaymentConfirmation {
                provider_order_id: request.provider_order_id,
                payment_id: "txn_test".to_string(),
                signature: "sig_test".to_string(),
            })
        }
    }

    fn offline_gateway() -> OrderGateway {
        let config = GatewayConfig::new("http://127.0.0.1:9/").expect("valid url");
        OrderGateway::new(&config)
    }

    fn orchestrator<P: PaymentCollaborator>(
        collaborator: P,
    ) -> (CheckoutOrchestrator<P>, CartStore) {
        let gateway = offline_gateway();
        let cart = CartStore::new(gateway.clone(), CustomerId::new(9));
        let orchestrator = CheckoutOrchestrator::new(
            gateway,
            cart.clone(),
            collaborator,
            CheckoutPolicy::default(),
            PaymentProviderConfig::new("pk_test_abc".to_string()),
            CustomerId::new(9),
        );
        (orchestrator, cart)
    }

    fn seeded_cart(cart: &CartStore, subtotal: rust_decimal::Decimal) {
        cart.seed(CartSnapshot {
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

    fn fill_valid_form<P: PaymentCollaborator>(orchestrator: &mut CheckoutOrchestrator<P>) {
        *orchestrator.form_mut() = BillingForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "7 Lake View".to_string(),
            state: "MH".to_string(),
            city: "Pune".to_string(),
            zip: "411001".to_string(),
        };
    }

    #[tokio::test]
    async fn test_invalid_form_stays_editing_without_network() {
        let (mut orchestrator, _cart) = orchestrator(CancelEverything);
        orchestrator.begin();

        let err = orchestrator.place_order().await.expect_err("invalid form");
        // Validation, not a connect error: the offline gateway was never hit.
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(orchestrator.state(), CheckoutState::FormEditing);
    }

    #[tokio::test]
    async fn test_empty_cart_is_not_chargeable() {
        let (mut orchestrator, _cart) = orchestrator(CancelEverything);
        orchestrator.begin();
        fill_valid_form(&mut orchestrator);

        let err = orchestrator.place_order().await.expect_err("no cart");
        assert!(matches!(err, CheckoutError::NothingToCharge));
        assert_eq!(orchestrator.state(), CheckoutState::FormEditing);
    }

    #[tokio::test]
    async fn test_refresh_charge_is_noop_without_subtotal() {
        let (mut orchestrator, cart) = orchestrator(CancelEverything);

        assert!(orchestrator.refresh_charge().is_none());

        seeded_cart(&cart, dec!(100));
        let charge = orchestrator.refresh_charge().expect("chargeable");
        assert_eq!(charge.amount, dec!(105)); // default 5% GST, no fee

        // Cart empties out; the previous charge stands untouched.
        cart.seed(CartSnapshot {
            total_amount: dec!(0),
            ..cart.current().expect("seeded")
        });
        let charge = orchestrator.refresh_charge().expect("previous charge kept");
        assert_eq!(charge.amount, dec!(105));
    }

    #[tokio::test]
    async fn test_intent_failure_fails_machine() {
        let (mut orchestrator, cart) = orchestrator(AuthorizeEverything);
        orchestrator.begin();
        fill_valid_form(&mut orchestrator);
        seeded_cart(&cart, dec!(100));

        let err = orchestrator.place_order().await.expect_err("offline backend");
        assert!(matches!(err, CheckoutError::Intent(_)));
        assert_eq!(
            orchestrator.state(),
            CheckoutState::Failed(FailureReason::IntentError)
        );
        // Form survives the failure for a retry from FormEditing.
        assert_eq!(orchestrator.form().first_name, "Asha");
        orchestrator.begin();
        assert_eq!(orchestrator.state(), CheckoutState::FormEditing);
    }
}
