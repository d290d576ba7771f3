//! Admin dashboard metrics.

use food_express_core::DashboardMetrics;
use food_express_gateway::{GatewayError, OrderGateway};
use tracing::instrument;

/// Loader for the aggregate metrics panel.
#[derive(Clone)]
pub struct Dashboard {
    gateway: OrderGateway,
}

impl Dashboard {
    /// Create a dashboard loader.
    #[must_use]
    pub const fn new(gateway: OrderGateway) -> Self {
        Self { gateway }
    }

    /// Fetch current metrics.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; callers keep showing the previous metrics.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<DashboardMetrics, GatewayError> {
        self.gateway.dashboard_metrics().await
    }
}
