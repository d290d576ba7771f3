//! Admin order endpoints: listing, agent assignment, delivery confirmation.

use food_express_core::{AgentId, DeliveryAgent, Order, OrderId};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::conversions::{OrderDetailDto, map_order_detail};
use crate::{GatewayError, OrderGateway};

/// Payload for assignment and delivery-confirmation requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentOrderPayload {
    order_id: OrderId,
    agent_id: AgentId,
}

/// Backend acknowledgement of an agent assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentReceipt {
    /// Name of the agent the backend actually assigned.
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrderGateway {
    /// Fetch the full admin-visible order set, any status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, GatewayError> {
        self.get_json("orders/admin").await
    }

    /// Fetch the delivery agents currently marked available.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn list_available_agents(&self) -> Result<Vec<DeliveryAgent>, GatewayError> {
        self.get_json("orders/admin/agents/available").await
    }

    /// Assign a delivery agent to an order.
    ///
    /// The backend flips the order to out-for-delivery and marks the agent
    /// busy; callers must re-fetch the full order and agent sets afterwards
    /// since one assignment changes availability for every other order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn assign_agent(
        &self,
        order_id: OrderId,
        agent_id: AgentId,
    ) -> Result<AssignmentReceipt, GatewayError> {
        let url = self.endpoint("orders/admin/assign")?;
        let response = self
            .request(Method::PUT, url)
            .json(&AgentOrderPayload { order_id, agent_id })
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(AssignmentReceipt {
                agent_name: None,
                message: None,
            });
        }
        Self::parse_json(&body)
    }

    /// Fetch one order by ID.
    ///
    /// The detail endpoint names its fields differently than the list
    /// endpoint; the response goes through the boundary mapper so callers
    /// see the canonical [`Order`] shape.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown ID, or an error on
    /// transport failure.
    #[instrument(skip(self))]
    pub async fn get_order_detail(&self, order_id: OrderId) -> Result<Order, GatewayError> {
        let url = self.endpoint(&format!("orders/admin/{order_id}"))?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(format!("order {order_id}")));
        }

        let body = Self::read_body(response).await?;
        let dto: OrderDetailDto = Self::parse_json(&body)?;
        Ok(map_order_detail(dto))
    }

    /// Confirm delivery of an order by the given agent.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status; the
    /// delivery may not have been recorded in that case.
    #[instrument(skip(self))]
    pub async fn mark_delivered(
        &self,
        order_id: OrderId,
        agent_id: AgentId,
    ) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("orders/admin/{order_id}/deliver"))?;
        let response = self
            .request(Method::PUT, url)
            .json(&AgentOrderPayload { order_id, agent_id })
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }
}
