//! Order Board Controller.
//!
//! Partitions all admin-visible orders into three disjoint, independently
//! sorted views and drives agent assignment with per-order mutual exclusion.
//!
//! Refresh fetches orders and available agents concurrently; each fetch has
//! its own error slot, so one failing never blocks display of the other.
//! After a successful assignment the whole board re-fetches: assigning an
//! agent to one order removes that agent from the available pool for every
//! other order, so the backend's response is the new source of truth for
//! everything, not just the assigned order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use food_express_core::{DeliveryAgent, Order, OrderId, OrderStatus};
use food_express_gateway::{GatewayError, OrderGateway};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

/// How long the assignment success banner stays up.
const BANNER_DISMISS_AFTER: Duration = Duration::from_millis(4000);

/// Errors surfaced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// No delivery agent has been selected for this order.
    #[error("no delivery agent selected for order #{0}")]
    NoAgentSelected(OrderId),

    /// The order is not in the currently loaded set; refresh first.
    #[error("order #{0} is not in the loaded order set")]
    UnknownOrder(OrderId),

    /// An assignment for this order is already in flight; the second
    /// submission is rejected locally before any request is sent.
    #[error("an assignment for order #{0} is already in flight")]
    AssignmentInFlight(OrderId),

    /// The backend rejected or failed the assignment.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Transient success banner shown after an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBanner {
    pub order_id: OrderId,
    pub agent_name: String,
}

/// A renderable snapshot of the board.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    /// Orders awaiting assignment, most recent first.
    pub placed: Vec<Order>,
    /// Orders out for delivery, most recent first.
    pub assigned: Vec<Order>,
    /// Delivered orders, most recent first.
    pub delivered: Vec<Order>,
    /// Agents currently available for assignment.
    pub available_agents: Vec<DeliveryAgent>,
    /// Error from the last orders fetch, if it failed.
    pub orders_error: Option<String>,
    /// Error from the last agents fetch, if it failed.
    pub agents_error: Option<String>,
    /// Error from the last assignment attempt, if it failed.
    pub assignment_error: Option<String>,
    /// Success banner, present until auto-dismissed.
    pub banner: Option<AssignmentBanner>,
}

#[derive(Default)]
struct BoardState {
    orders: Vec<Order>,
    placed: Vec<Order>,
    assigned: Vec<Order>,
    delivered: Vec<Order>,
    available_agents: Vec<DeliveryAgent>,
    selected_agent: HashMap<OrderId, DeliveryAgent>,
    assigning: HashSet<OrderId>,
    orders_error: Option<String>,
    agents_error: Option<String>,
    assignment_error: Option<String>,
    banner: Option<AssignmentBanner>,
    /// Bumped on every new banner so a stale dismissal timer never clears a
    /// newer banner.
    banner_epoch: u64,
}

impl BoardState {
    fn view(&self) -> BoardView {
        BoardView {
            placed: self.placed.clone(),
            assigned: self.assigned.clone(),
            delivered: self.delivered.clone(),
            available_agents: self.available_agents.clone(),
            orders_error: self.orders_error.clone(),
            agents_error: self.agents_error.clone(),
            assignment_error: self.assignment_error.clone(),
            banner: self.banner.clone(),
        }
    }
}

/// The admin order board.
///
/// Cheaply cloneable; all clones share the same state, so the in-flight
/// flags hold across every handle in the session.
#[derive(Clone)]
pub struct OrderBoard {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    gateway: OrderGateway,
    state: Mutex<BoardState>,
}

impl OrderBoard {
    /// Create a board with nothing loaded yet.
    #[must_use]
    pub fn new(gateway: OrderGateway) -> Self {
        Self {
            inner: Arc::new(BoardInner {
                gateway,
                state: Mutex::new(BoardState::default()),
            }),
        }
    }

    /// A snapshot of the current board state.
    pub async fn view(&self) -> BoardView {
        self.inner.state.lock().await.view()
    }

    /// Re-fetch orders and available agents.
    ///
    /// The two requests run concurrently and fail independently: a failure
    /// in one populates its error slot and leaves that side's previous data
    /// in place, while the other side still updates.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> BoardView {
        let (orders, agents) = tokio::join!(
            self.inner.gateway.list_orders(),
            self.inner.gateway.list_available_agents(),
        );

        let mut state = self.inner.state.lock().await;

        match orders {
            Ok(orders) => {
                let (placed, assigned, delivered) = partition_orders(&orders);
                state.orders = orders;
                state.placed = placed;
                state.assigned = assigned;
                state.delivered = delivered;
                state.orders_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load orders");
                state.orders_error = Some("Failed to load orders.".to_string());
            }
        }

        match agents {
            Ok(agents) => {
                // Do not trust the endpoint's filtering; re-check status
                // with the normalization rule.
                state.available_agents =
                    agents.into_iter().filter(DeliveryAgent::is_available).collect();
                state.agents_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load available agents");
                state.agents_error = Some("Failed to load available agents.".to_string());
            }
        }

        state.view()
    }

    /// Record the agent picked for an order in the board's selection state.
    pub async fn select_agent(&self, order_id: OrderId, agent: DeliveryAgent) {
        let mut state = self.inner.state.lock().await;
        state.selected_agent.insert(order_id, agent);
    }

    /// Assign the selected agent to an order.
    ///
    /// Exactly one assignment request per order may be in flight: the
    /// in-flight flag is checked and set under the lock before the request
    /// goes out, so a concurrent double-submission is rejected locally.
    ///
    /// On success the whole board refreshes and a success banner carrying
    /// the agent's name goes up, auto-dismissed after a fixed delay.
    ///
    /// # Errors
    ///
    /// Returns a precondition error (no agent selected, unknown order,
    /// assignment already in flight) without any network traffic, or
    /// `BoardError::Gateway` if the backend call fails - in which case the
    /// in-flight flag is cleared and the board's assignment error names the
    /// order.
    #[instrument(skip(self))]
    pub async fn assign(&self, order_id: OrderId) -> Result<AssignmentBanner, BoardError> {
        // Preconditions and flag set-up happen atomically under the lock.
        let agent = {
            let mut state = self.inner.state.lock().await;

            let Some(agent) = state.selected_agent.get(&order_id).cloned() else {
                return Err(BoardError::NoAgentSelected(order_id));
            };
            if !state.orders.iter().any(|o| o.id == order_id) {
                return Err(BoardError::UnknownOrder(order_id));
            }
            if !state.assigning.insert(order_id) {
                return Err(BoardError::AssignmentInFlight(order_id));
            }
            state.assignment_error = None;
            agent
        };

        match self.inner.gateway.assign_agent(order_id, agent.id).await {
            Ok(receipt) => {
                // The backend's answer is the new truth for every order and
                // agent, not just this one.
                self.refresh().await;

                let banner = AssignmentBanner {
                    order_id,
                    agent_name: receipt.agent_name.unwrap_or_else(|| agent.name.clone()),
                };

                let epoch = {
                    let mut state = self.inner.state.lock().await;
                    state.assigning.remove(&order_id);
                    state.selected_agent.remove(&order_id);
                    state.banner = Some(banner.clone());
                    state.banner_epoch += 1;
                    state.banner_epoch
                };
                self.spawn_banner_dismissal(epoch);

                Ok(banner)
            }
            Err(e) => {
                tracing::error!(error = %e, order_id = %order_id, "Assignment failed");
                let mut state = self.inner.state.lock().await;
                state.assigning.remove(&order_id);
                state.assignment_error =
                    Some(format!("Failed to assign agent to Order #{order_id}."));
                Err(BoardError::Gateway(e))
            }
        }
    }

    /// Clear the banner after the fixed delay, unless a newer banner
    /// replaced it in the meantime.
    fn spawn_banner_dismissal(&self, epoch: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(BANNER_DISMISS_AFTER).await;
            let mut state = inner.state.lock().await;
            if state.banner_epoch == epoch {
                state.banner = None;
            }
        });
    }
}

/// Partition orders by normalized status, each partition sorted by order
/// timestamp descending. Orders with a status outside the known set land in
/// no partition.
fn partition_orders(orders: &[Order]) -> (Vec<Order>, Vec<Order>, Vec<Order>) {
    let select = |status: &OrderStatus| {
        let mut selected: Vec<Order> = orders
            .iter()
            .filter(|o| o.status == *status)
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        selected
    };

    (
        select(&OrderStatus::Placed),
        select(&OrderStatus::OutForDelivery),
        select(&OrderStatus::Delivered),
    )
}
