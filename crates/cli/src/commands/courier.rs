//! Courier fulfillment commands.

use clap::Subcommand;
use food_express_core::AgentId;
use food_express_courier::{CourierDashboard, CourierView};
use food_express_gateway::OrderGateway;

/// Courier subcommands.
#[derive(Subcommand)]
pub enum CourierAction {
    /// Show the agent's current assignment
    Status,
    /// Mark the current assignment delivered and fetch the next one
    Deliver,
}

/// Run a courier subcommand.
pub async fn run(
    gateway: OrderGateway,
    agent: i64,
    action: CourierAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = CourierDashboard::new(gateway);
    let agent_id = AgentId::new(agent);

    let view = dashboard.load_assignment(agent_id).await?;
    match action {
        CourierAction::Status => print_view(&view),
        CourierAction::Deliver => {
            let view = dashboard.mark_delivered().await?;
            println!("Delivery confirmed.");
            print_view(&view);
        }
    }
    Ok(())
}

fn print_view(view: &CourierView) {
    if let Some(agent) = &view.agent {
        println!(
            "Agent {} ({}) - {} deliveries, rating {:.1}",
            agent.name, agent.status, agent.total_deliveries, agent.rating
        );
    }
    match &view.current_order {
        Some(order) => {
            println!(
                "Current order #{}: {} -> {} ({})",
                order.id, order.pickup_address, order.drop_address, order.total_amount
            );
            for line in &order.lines {
                println!("  {} x{}", line.name, line.quantity);
            }
        }
        None => {
            let message = view.message.as_deref().unwrap_or("No current order assigned.");
            println!("{message}");
        }
    }
}
