//! Admin order board commands.

use clap::Subcommand;
use food_express_admin::{Dashboard, OrderBoard};
use food_express_core::{AgentId, Order, OrderId};
use food_express_gateway::OrderGateway;

/// Board subcommands.
#[derive(Subcommand)]
pub enum BoardAction {
    /// List orders partitioned by status, plus available agents
    List,
    /// Assign an available agent to a placed order
    Assign {
        /// Order to assign
        #[arg(short, long)]
        order: i64,

        /// Agent to assign it to
        #[arg(short, long)]
        agent: i64,
    },
}

/// Run a board subcommand.
pub async fn run(
    gateway: OrderGateway,
    action: BoardAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = OrderBoard::new(gateway);

    match action {
        BoardAction::List => {
            let view = board.refresh().await;
            print_partition("Placed", &view.placed, view.orders_error.as_deref());
            print_partition("Out for delivery", &view.assigned, None);
            print_partition("Delivered", &view.delivered, None);

            println!("Available agents:");
            match view.agents_error {
                Some(error) => println!("  ({error})"),
                None => {
                    for agent in &view.available_agents {
                        println!("  [{}] {}", agent.id, agent.name);
                    }
                }
            }
        }
        BoardAction::Assign { order, agent } => {
            let view = board.refresh().await;
            let order_id = OrderId::new(order);
            let agent_id = AgentId::new(agent);

            let Some(agent) = view
                .available_agents
                .iter()
                .find(|a| a.id == agent_id)
                .cloned()
            else {
                return Err(format!("agent #{agent_id} is not available").into());
            };

            board.select_agent(order_id, agent).await;
            let banner = board.assign(order_id).await?;
            println!(
                "Assigned {} to order #{}.",
                banner.agent_name, banner.order_id
            );
        }
    }
    Ok(())
}

/// Show dashboard metrics.
pub async fn metrics(gateway: OrderGateway) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Dashboard::new(gateway).refresh().await?;
    println!("Customers:        {}", metrics.total_customers);
    println!("Restaurants:      {}", metrics.total_restaurants);
    println!("Orders:           {}", metrics.total_orders);
    println!("  placed:         {}", metrics.placed_orders);
    println!("  delivered:      {}", metrics.delivered_orders);
    println!("Revenue:          {}", metrics.total_revenue);
    println!("Delivery agents:  {}", metrics.total_delivery_agents);
    println!("  available:      {}", metrics.available_agents);
    println!("  busy:           {}", metrics.busy_agents);
    Ok(())
}

fn print_partition(title: &str, orders: &[Order], error: Option<&str>) {
    println!("{title}:");
    if let Some(error) = error {
        println!("  ({error})");
        return;
    }
    for order in orders {
        println!(
            "  #{} {} - {} -> {} ({}){}",
            order.id,
            order.placed_at.format("%Y-%m-%d %H:%M"),
            order.restaurant_name,
            order.customer_name,
            order.total_amount,
            order
                .agent_name
                .as_deref()
                .map(|name| format!(" [agent: {name}]"))
                .unwrap_or_default(),
        );
    }
}
