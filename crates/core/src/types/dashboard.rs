//! Admin dashboard metrics shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate counts shown on the admin dashboard. Read-only display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub total_restaurants: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub placed_orders: u64,
    #[serde(default)]
    pub delivered_orders: u64,
    #[serde(default)]
    pub total_delivery_agents: u64,
    /// Note the singular spelling: this matches the backend's field name.
    #[serde(rename = "totalAvailableAgent", default)]
    pub available_agents: u64,
    #[serde(default)]
    pub busy_agents: u64,
}
