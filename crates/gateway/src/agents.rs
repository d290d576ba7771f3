//! Delivery agent and admin dashboard endpoints.

use food_express_core::{AgentId, DashboardMetrics, DeliveryAgent};
use tracing::instrument;

use crate::{GatewayError, OrderGateway};

impl OrderGateway {
    /// Fetch a delivery agent by ID.
    ///
    /// The agent's `current_order_id` is the only signal that the admin
    /// board has queued a new assignment, so the courier flow re-fetches
    /// this record after every delivery confirmation.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown ID, or an error on
    /// transport failure.
    #[instrument(skip(self))]
    pub async fn get_agent(&self, agent_id: AgentId) -> Result<DeliveryAgent, GatewayError> {
        self.get_json(&format!("admin/delivery-agents/{agent_id}"))
            .await
    }

    /// Fetch aggregate dashboard metrics.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, GatewayError> {
        self.get_json("admin/dashboard").await
    }
}
