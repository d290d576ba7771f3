//! Customer profile and order-history endpoints.

use food_express_core::{Customer, CustomerId, Order};
use tracing::instrument;

use crate::{GatewayError, OrderGateway};

impl OrderGateway {
    /// Fetch a customer profile (used to prefill the billing form).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown ID, or an error on
    /// transport failure.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer, GatewayError> {
        self.get_json(&format!("customer/{customer_id}")).await
    }

    /// Fetch a customer's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn list_customer_orders(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, GatewayError> {
        self.get_json(&format!("orders/user/{customer_id}")).await
    }
}
