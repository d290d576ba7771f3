//! Delivery Fulfillment Controller.
//!
//! Loads the agent's current assignment, drives the delivered-confirmation
//! step, and triggers re-fetch of the next assignment. A failed
//! confirmation leaves the displayed order unchanged - the delivery may not
//! have actually been recorded, and clearing it would hide work the agent
//! still owes.

use std::sync::Arc;
use std::time::Duration;

use food_express_core::{AgentId, DeliveryAgent, Order, OrderId};
use food_express_gateway::{GatewayError, OrderGateway};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

/// How long the delivered-confirmation animation plays before the next
/// assignment is fetched.
const CONFIRMATION_HOLD: Duration = Duration::from_millis(2500);

/// How long the confirmation flag stays visible.
const CONFIRMATION_DISPLAY: Duration = Duration::from_millis(3000);

/// Message shown when the agent has no active assignment.
const NO_CURRENT_ORDER: &str = "No current order assigned.";

/// Errors surfaced by courier operations.
#[derive(Debug, Error)]
pub enum CourierError {
    /// There is no displayed order to confirm.
    #[error("no order is currently assigned")]
    NoCurrentOrder,

    /// The agent record has not been loaded yet.
    #[error("agent record is not loaded")]
    AgentNotLoaded,

    /// The backend call failed; displayed state is unchanged.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A renderable snapshot of the courier dashboard.
#[derive(Debug, Clone, Default)]
pub struct CourierView {
    pub agent: Option<DeliveryAgent>,
    pub current_order: Option<Order>,
    /// Informational message ("No current order assigned.").
    pub message: Option<String>,
    /// True while the delivered-confirmation animation plays.
    pub delivery_confirmed: bool,
}

#[derive(Default)]
struct CourierState {
    agent: Option<DeliveryAgent>,
    current_order: Option<Order>,
    message: Option<String>,
    delivery_confirmed: bool,
    confirmation_epoch: u64,
}

impl CourierState {
    fn view(&self) -> CourierView {
        CourierView {
            agent: self.agent.clone(),
            current_order: self.current_order.clone(),
            message: self.message.clone(),
            delivery_confirmed: self.delivery_confirmed,
        }
    }
}

/// The delivery agent's dashboard.
#[derive(Clone)]
pub struct CourierDashboard {
    inner: Arc<CourierInner>,
}

struct CourierInner {
    gateway: OrderGateway,
    state: Mutex<CourierState>,
}

impl CourierDashboard {
    /// Create a dashboard with nothing loaded yet.
    #[must_use]
    pub fn new(gateway: OrderGateway) -> Self {
        Self {
            inner: Arc::new(CourierInner {
                gateway,
                state: Mutex::new(CourierState::default()),
            }),
        }
    }

    /// A snapshot of the current dashboard state.
    pub async fn view(&self) -> CourierView {
        self.inner.state.lock().await.view()
    }

    /// Fetch the agent record and, if an order is assigned, that order.
    ///
    /// An absent `current_order_id` means no active assignment - a normal
    /// state, reported through the view's message, not an error.
    ///
    /// # Errors
    ///
    /// Returns `CourierError::Gateway` if the agent fetch fails (nothing is
    /// displayed then) or if the assigned order's detail fetch fails (the
    /// agent stays displayed with no order).
    #[instrument(skip(self))]
    pub async fn load_assignment(&self, agent_id: AgentId) -> Result<CourierView, CourierError> {
        let agent = match self.inner.gateway.get_agent(agent_id).await {
            Ok(agent) => agent,
            Err(e) => {
                let mut state = self.inner.state.lock().await;
                state.agent = None;
                state.current_order = None;
                return Err(e.into());
            }
        };

        let current_order_id = agent.current_order_id;
        {
            let mut state = self.inner.state.lock().await;
            state.agent = Some(agent);
        }

        match current_order_id {
            Some(order_id) => self.fetch_current_order(order_id).await,
            None => {
                let mut state = self.inner.state.lock().await;
                state.current_order = None;
                state.message = Some(NO_CURRENT_ORDER.to_string());
                Ok(state.view())
            }
        }
    }

    /// Confirm delivery of the displayed order.
    ///
    /// On success the confirmation animation plays, then the agent is
    /// re-fetched to discover whether a new order has already been queued -
    /// and if so, that order is fetched too. Assignment happens on the
    /// admin side, so this two-step re-fetch is the only way to learn about
    /// new work.
    ///
    /// # Errors
    ///
    /// Returns a precondition error if no order or agent is loaded, or
    /// `CourierError::Gateway` if the confirmation fails - the displayed
    /// order is left unchanged in that case, since the delivery may not
    /// have been recorded.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self) -> Result<CourierView, CourierError> {
        let (order_id, agent_id) = {
            let state = self.inner.state.lock().await;
            let Some(order) = &state.current_order else {
                return Err(CourierError::NoCurrentOrder);
            };
            let Some(agent) = &state.agent else {
                return Err(CourierError::AgentNotLoaded);
            };
            (order.id, agent.id)
        };

        if let Err(e) = self.inner.gateway.mark_delivered(order_id, agent_id).await {
            tracing::error!(error = %e, order_id = %order_id, "Failed to mark delivered");
            return Err(e.into());
        }

        self.start_confirmation_animation().await;

        // Hold for the animation, then discover the next assignment.
        tokio::time::sleep(CONFIRMATION_HOLD).await;

        let updated = self.inner.gateway.get_agent(agent_id).await?;
        let next_order_id = updated.current_order_id;
        {
            let mut state = self.inner.state.lock().await;
            state.agent = Some(updated);
        }

        match next_order_id {
            Some(next) => self.fetch_current_order(next).await,
            None => {
                let mut state = self.inner.state.lock().await;
                state.current_order = None;
                state.message = Some(NO_CURRENT_ORDER.to_string());
                Ok(state.view())
            }
        }
    }

    /// Fetch the detail of the assigned order into the view.
    async fn fetch_current_order(&self, order_id: OrderId) -> Result<CourierView, CourierError> {
        match self.inner.gateway.get_order_detail(order_id).await {
            Ok(order) => {
                let mut state = self.inner.state.lock().await;
                state.current_order = Some(order);
                state.message = None;
                Ok(state.view())
            }
            Err(e) => {
                tracing::warn!(error = %e, order_id = %order_id, "Failed to fetch assigned order");
                let mut state = self.inner.state.lock().await;
                state.current_order = None;
                Err(e.into())
            }
        }
    }

    /// Raise the confirmation flag and schedule its drop.
    async fn start_confirmation_animation(&self) {
        let epoch = {
            let mut state = self.inner.state.lock().await;
            state.delivery_confirmed = true;
            state.confirmation_epoch += 1;
            state.confirmation_epoch
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(CONFIRMATION_DISPLAY).await;
            let mut state = inner.state.lock().await;
            if state.confirmation_epoch == epoch {
                state.delivery_confirmed = false;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use food_express_gateway::GatewayConfig;

    use super::*;

    fn offline_dashboard() -> CourierDashboard {
        let config = GatewayConfig::new("http://127.0.0.1:9/").expect("valid url");
        CourierDashboard::new(OrderGateway::new(&config))
    }

    #[tokio::test]
    async fn test_mark_delivered_requires_loaded_order() {
        let dashboard = offline_dashboard();
        let err = dashboard.mark_delivered().await.expect_err("nothing loaded");
        assert!(matches!(err, CourierError::NoCurrentOrder));
    }

    #[tokio::test]
    async fn test_failed_agent_fetch_clears_display() {
        let dashboard = offline_dashboard();
        let err = dashboard
            .load_assignment(AgentId::new(4))
            .await
            .expect_err("offline backend");
        assert!(matches!(err, CourierError::Gateway(_)));

        let view = dashboard.view().await;
        assert!(view.agent.is_none());
        assert!(view.current_order.is_none());
    }

    #[tokio::test]
    async fn test_view_starts_empty() {
        let view = offline_dashboard().view().await;
        assert!(view.agent.is_none());
        assert!(view.current_order.is_none());
        assert!(view.message.is_none());
        assert!(!view.delivery_confirmed);
    }
}
