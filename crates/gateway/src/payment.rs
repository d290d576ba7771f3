//! Payment intent creation and order finalization.

use food_express_core::{FinalizedOrder, Money, PaymentIntent};
use reqwest::Method;
use tracing::instrument;

use crate::{GatewayError, OrderGateway};

impl OrderGateway {
    /// Create a payment intent for the given charge.
    ///
    /// One intent per checkout attempt; the provider consumes it exactly
    /// once. A cancelled or failed attempt must request a fresh intent.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        charge: Money,
    ) -> Result<PaymentIntent, GatewayError> {
        let url = self.endpoint(&format!(
            "payment/createOrder?amount={}&currency={}",
            charge.minor_units(),
            charge.currency
        ))?;
        let response = self.request(Method::POST, url).send().await?;
        let body = Self::read_body(response).await?;
        Self::parse_json(&body)
    }

    /// Finalize an order after payment capture.
    ///
    /// Non-retriable from the client: the provider has already captured the
    /// funds, and idempotency on the correlation fields is the backend's
    /// contract. A failure here is surfaced, never silently retried.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, order), fields(customer_id = %order.customer_id))]
    pub async fn place_order(&self, order: &FinalizedOrder) -> Result<(), GatewayError> {
        let url = self.endpoint("orders/place")?;
        let response = self.request(Method::POST, url).json(order).send().await?;
        Self::read_body(response).await?;
        Ok(())
    }
}
