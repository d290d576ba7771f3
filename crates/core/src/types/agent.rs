//! Delivery agent shape mirrored from the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{AgentId, OrderId};
use super::status::AgentStatus;

/// A delivery agent record.
///
/// Earnings, delivery counts, and rating are read-only display data; the
/// client never mutates them. `current_order_id` is the only field the
/// fulfillment flow acts on - it is the sole signal that the admin board has
/// queued a new assignment for this agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub status: AgentStatus,
    #[serde(rename = "currentOrderID", default)]
    pub current_order_id: Option<OrderId>,
    #[serde(default)]
    pub today_earning: Decimal,
    #[serde(default)]
    pub total_earning: Decimal,
    #[serde(default)]
    pub total_deliveries: u32,
    #[serde(default)]
    pub rating: f64,
}

impl DeliveryAgent {
    /// Whether the agent can take a new assignment.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AgentStatus::Available
    }
}
