//! In-process mock of the FoodExpress order backend.
//!
//! Tests spawn a [`MockBackend`] on an ephemeral port and point the real
//! gateway at it. The mock mimics the backend's observable semantics - the
//! 404-empty-cart convention, the 204-on-emptied-cart convention, the
//! detail endpoint's divergent field names - and counts requests per
//! endpoint so concurrency properties (exactly one assignment request under
//! a double click, zero requests on a locally rejected add) are assertable.
//!
//! This is test tooling, not a server implementation: state is a single
//! mutex-held struct the tests seed directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use food_express_core::{
    CartSnapshot, Customer, DeliveryAgent, FinalizedOrder, Order, OrderStatus,
};
use food_express_gateway::{GatewayConfig, OrderGateway};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// Request counters, readable without taking the state lock.
#[derive(Default)]
pub struct Counters {
    pub cart_mutations: AtomicUsize,
    pub assigns: AtomicUsize,
    pub finalizes: AtomicUsize,
    pub delivers: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn assigns(&self) -> usize {
        self.assigns.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cart_mutations(&self) -> usize {
        self.cart_mutations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn finalizes(&self) -> usize {
        self.finalizes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn delivers(&self) -> usize {
        self.delivers.load(Ordering::SeqCst)
    }
}

/// Seedable backend state.
#[derive(Default)]
pub struct MockState {
    /// The one cart the mock serves (keyed by nothing; tests use one
    /// customer).
    pub cart: Option<CartSnapshot>,
    /// Menu lookup for add-to-cart: item ID to (name, unit price).
    pub menu: HashMap<i64, (String, Decimal)>,
    /// Admin-visible orders, list shape.
    pub orders: Vec<Order>,
    /// Agents returned by the available-agents endpoint.
    pub available_agents: Vec<DeliveryAgent>,
    /// Agents by ID for the agent-detail endpoint.
    pub agents: HashMap<i64, DeliveryAgent>,
    /// Customers by ID.
    pub customers: HashMap<i64, Customer>,
    /// Assignment queued per agent, surfaced on the next agent fetch after
    /// a delivery confirmation.
    pub queued_assignment: HashMap<i64, i64>,
    /// Finalized orders received by the place endpoint.
    pub placed: Vec<FinalizedOrder>,
    /// Failure toggles.
    pub fail_orders_list: bool,
    pub fail_agents_list: bool,
    pub fail_finalize: bool,
    pub fail_deliver: bool,
    /// Artificial latency on assignment, to hold a request in flight.
    pub assign_delay: Duration,
    payment_seq: u64,
}

impl MockState {
    /// How many payment intents the mock has issued.
    #[must_use]
    pub const fn payment_intents_issued(&self) -> u64 {
        self.payment_seq
    }
}

struct MockCtx {
    state: Mutex<MockState>,
    counters: Counters,
}

type Ctx = Arc<MockCtx>;

/// A running mock backend.
pub struct MockBackend {
    addr: SocketAddr,
    ctx: Ctx,
}

impl MockBackend {
    /// Bind an ephemeral port and serve the mock in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind; tests cannot proceed without it.
    pub async fn spawn() -> Self {
        let ctx: Ctx = Arc::new(MockCtx {
            state: Mutex::new(MockState::default()),
            counters: Counters::default(),
        });

        let app = Router::new()
            .route("/carts/customer/{id}", get(get_cart).delete(clear_cart))
            .route(
                "/carts/customer/{id}/items/{line}",
                put(adjust_line).delete(remove_line),
            )
            .route(
                "/carts/customer/{id}/restaurant/{rid}/items/{mid}",
                post(add_line),
            )
            .route("/customer/{id}", get(get_customer))
            .route("/payment/createOrder", post(create_payment_intent))
            .route("/orders/place", post(place_order))
            .route("/orders/admin", get(list_orders))
            .route("/orders/admin/agents/available", get(list_available_agents))
            .route("/orders/admin/assign", put(assign_agent))
            .route("/orders/admin/{id}", get(order_detail))
            .route("/orders/admin/{id}/deliver", put(mark_delivered))
            .route("/admin/delivery-agents/{id}", get(get_agent))
            .with_state(Arc::clone(&ctx));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend serve");
        });

        Self { addr, ctx }
    }

    /// A gateway pointed at this mock.
    #[must_use]
    pub fn gateway(&self) -> OrderGateway {
        let config =
            GatewayConfig::new(&format!("http://{}/", self.addr)).expect("mock base url");
        OrderGateway::new(&config)
    }

    /// Seed or inspect backend state.
    pub async fn state(&self) -> tokio::sync::MutexGuard<'_, MockState> {
        self.ctx.state.lock().await
    }

    /// Request counters.
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.ctx.counters
    }
}

// =============================================================================
// Cart handlers
// =============================================================================

fn recompute(cart: &mut CartSnapshot) {
    cart.item_count = cart.lines.iter().map(|l| l.quantity).sum();
    cart.total_amount = cart
        .lines
        .iter()
        .map(food_express_core::CartLine::line_total)
        .sum();
}

async fn get_cart(State(ctx): State<Ctx>, Path(_id): Path<i64>) -> Response {
    let state = ctx.state.lock().await;
    match &state.cart {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(cart) => Json(cart).into_response(),
    }
}

async fn adjust_line(
    State(ctx): State<Ctx>,
    Path((_id, line_id)): Path<(i64, i64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    Counters::bump(&ctx.counters.cart_mutations);
    let delta: i64 = params
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(0);

    let mut state = ctx.state.lock().await;
    let emptied = {
        let Some(cart) = state.cart.as_mut() else {
            return StatusCode::NOT_FOUND.into_response();
        };
        let Some(line) = cart.lines.iter_mut().find(|l| l.id.as_i64() == line_id) else {
            return StatusCode::NOT_FOUND.into_response();
        };

        let quantity = i64::from(line.quantity) + delta;
        if quantity <= 0 {
            cart.lines.retain(|l| l.id.as_i64() != line_id);
        } else {
            line.quantity = u32::try_from(quantity).unwrap_or(0);
        }

        if cart.lines.is_empty() {
            true
        } else {
            recompute(cart);
            false
        }
    };

    if emptied {
        state.cart = None;
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(&state.cart).into_response()
}

async fn add_line(
    State(ctx): State<Ctx>,
    Path((id, rid, mid)): Path<(i64, i64, i64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    Counters::bump(&ctx.counters.cart_mutations);
    let quantity: u32 = params
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1);

    let mut state = ctx.state.lock().await;
    let Some((name, price)) = state.menu.get(&mid).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let next_line_id = 1 + state
        .cart
        .as_ref()
        .and_then(|c| c.lines.iter().map(|l| l.id.as_i64()).max())
        .unwrap_or(0);

    let cart = state.cart.get_or_insert_with(|| CartSnapshot {
        id: food_express_core::CartId::new(1),
        customer_id: food_express_core::CustomerId::new(id),
        restaurant_id: food_express_core::RestaurantId::new(rid),
        restaurant_name: format!("Restaurant #{rid}"),
        lines: vec![],
        item_count: 0,
        total_amount: Decimal::ZERO,
    });

    match cart.lines.iter_mut().find(|l| l.menu_item_id.as_i64() == mid) {
        Some(line) => line.quantity += quantity,
        None => {
            let mut line = food_express_core::CartLine::new(
                food_express_core::MenuItemId::new(mid),
                name,
                price,
            );
            line.id = food_express_core::CartLineId::new(next_line_id);
            line.quantity = quantity;
            cart.lines.push(line);
        }
    }
    recompute(cart);
    Json(&*cart).into_response()
}

async fn remove_line(State(ctx): State<Ctx>, Path((_id, line_id)): Path<(i64, i64)>) -> Response {
    Counters::bump(&ctx.counters.cart_mutations);
    let mut state = ctx.state.lock().await;
    let emptied = {
        let Some(cart) = state.cart.as_mut() else {
            return StatusCode::NOT_FOUND.into_response();
        };
        cart.lines.retain(|l| l.id.as_i64() != line_id);
        if cart.lines.is_empty() {
            true
        } else {
            recompute(cart);
            false
        }
    };

    if emptied {
        state.cart = None;
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(&state.cart).into_response()
}

async fn clear_cart(State(ctx): State<Ctx>, Path(_id): Path<i64>) -> Response {
    Counters::bump(&ctx.counters.cart_mutations);
    ctx.state.lock().await.cart = None;
    StatusCode::OK.into_response()
}

// =============================================================================
// Customer, payment, and finalize handlers
// =============================================================================

async fn get_customer(State(ctx): State<Ctx>, Path(id): Path<i64>) -> Response {
    let state = ctx.state.lock().await;
    match state.customers.get(&id) {
        Some(customer) => Json(customer).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_payment_intent(
    State(ctx): State<Ctx>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = ctx.state.lock().await;
    state.payment_seq += 1;
    let amount: i64 = params
        .get("amount")
        .and_then(|a| a.parse().ok())
        .unwrap_or(0);
    let currency = params.get("currency").cloned().unwrap_or_default();

    Json(json!({
        "orderId": format!("pay_test_{}", state.payment_seq),
        "amountInPaise": amount,
        "currency": currency,
    }))
    .into_response()
}

async fn place_order(State(ctx): State<Ctx>, Json(order): Json<FinalizedOrder>) -> Response {
    Counters::bump(&ctx.counters.finalizes);
    let mut state = ctx.state.lock().await;
    if state.fail_finalize {
        return (StatusCode::INTERNAL_SERVER_ERROR, "finalize rejected").into_response();
    }
    state.placed.push(order);
    Json(json!({"status": "placed"})).into_response()
}

// =============================================================================
// Admin order handlers
// =============================================================================

async fn list_orders(State(ctx): State<Ctx>) -> Response {
    let state = ctx.state.lock().await;
    if state.fail_orders_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "orders unavailable").into_response();
    }
    Json(&state.orders).into_response()
}

async fn list_available_agents(State(ctx): State<Ctx>) -> Response {
    let state = ctx.state.lock().await;
    if state.fail_agents_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "agents unavailable").into_response();
    }
    Json(&state.available_agents).into_response()
}

async fn assign_agent(State(ctx): State<Ctx>, Json(payload): Json<Value>) -> Response {
    Counters::bump(&ctx.counters.assigns);

    let delay = ctx.state.lock().await.assign_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let order_id = payload["orderId"].as_i64().unwrap_or(0);
    let agent_id = payload["agentId"].as_i64().unwrap_or(0);

    let mut state = ctx.state.lock().await;
    let Some(agent) = state.agents.get(&agent_id).cloned() else {
        return (StatusCode::BAD_REQUEST, "unknown agent").into_response();
    };

    let Some(order) = state.orders.iter_mut().find(|o| o.id.as_i64() == order_id) else {
        return (StatusCode::BAD_REQUEST, "unknown order").into_response();
    };
    order.status = OrderStatus::OutForDelivery;
    order.agent_name = Some(agent.name.clone());

    state.available_agents.retain(|a| a.id.as_i64() != agent_id);
    if let Some(record) = state.agents.get_mut(&agent_id) {
        record.status = food_express_core::AgentStatus::Busy;
        record.current_order_id = Some(food_express_core::OrderId::new(order_id));
    }

    Json(json!({
        "success": "true",
        "message": "agent assigned",
        "agentName": agent.name,
        "orderId": order_id,
    }))
    .into_response()
}

async fn order_detail(State(ctx): State<Ctx>, Path(id): Path<i64>) -> Response {
    let state = ctx.state.lock().await;
    let Some(order) = state.orders.iter().find(|o| o.id.as_i64() == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // The detail endpoint speaks its own dialect; tests exercise the
    // client-side mapper through this shape.
    let items: Vec<Value> = order
        .lines
        .iter()
        .map(|l| {
            json!({
                "id": l.menu_item_id.as_i64(),
                "name": l.name,
                "unitPrice": l.unit_price,
                "quantity": l.quantity,
            })
        })
        .collect();

    Json(json!({
        "orderId": order.id.as_i64(),
        "orderStatus": order.status.as_str(),
        "restaurantName": order.restaurant_name,
        "restaurantAddress": order.pickup_address,
        "customerName": order.customer_name,
        "customerAddress": order.drop_address,
        "items": items,
        "totalAmount": order.total_amount,
        "orderDate": order.placed_at,
        "agentName": order.agent_name,
    }))
    .into_response()
}

async fn mark_delivered(State(ctx): State<Ctx>, Path(id): Path<i64>) -> Response {
    Counters::bump(&ctx.counters.delivers);
    let mut state = ctx.state.lock().await;
    if state.fail_deliver {
        return (StatusCode::INTERNAL_SERVER_ERROR, "delivery rejected").into_response();
    }

    let agent_id = {
        let Some(order) = state.orders.iter_mut().find(|o| o.id.as_i64() == id) else {
            return (StatusCode::BAD_REQUEST, "unknown order").into_response();
        };
        order.status = OrderStatus::Delivered;

        state
            .agents
            .iter()
            .find(|(_, a)| a.current_order_id.map(|o| o.as_i64()) == Some(id))
            .map(|(agent_id, _)| *agent_id)
    };

    if let Some(agent_id) = agent_id {
        let next = state.queued_assignment.remove(&agent_id);
        if let Some(agent) = state.agents.get_mut(&agent_id) {
            agent.current_order_id = next.map(food_express_core::OrderId::new);
            agent.status = if next.is_some() {
                food_express_core::AgentStatus::Busy
            } else {
                food_express_core::AgentStatus::Available
            };
        }
    }

    Json(json!({"status": "delivered"})).into_response()
}

async fn get_agent(State(ctx): State<Ctx>, Path(id): Path<i64>) -> Response {
    let state = ctx.state.lock().await;
    match state.agents.get(&id) {
        Some(agent) => Json(agent).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
