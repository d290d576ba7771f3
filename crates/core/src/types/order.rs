//! The shared order lifecycle entity.
//!
//! Orders are owned by the backend and mirrored read-only on all three UIs.
//! The only mutations go through the gateway's assignment and
//! delivery-confirmation operations; anything a client changes locally is
//! optimistic display state and is overwritten by the next fetch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::OrderId;
use super::status::OrderStatus;

/// An order as seen by the admin board and the courier dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub restaurant_name: String,
    /// Where the courier picks the order up (the restaurant's address).
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub customer_name: String,
    /// Where the courier drops the order off (the customer's address).
    #[serde(default)]
    pub drop_address: String,
    #[serde(rename = "items", default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(rename = "orderDate")]
    pub placed_at: DateTime<Utc>,
    /// Name of the assigned delivery agent; absent until assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}
