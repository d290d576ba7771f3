//! Customer cart commands.

use clap::Subcommand;
use food_express_core::{CartLine, CartLineId, CartSnapshot, CustomerId, MenuItemId, RestaurantId};
use food_express_gateway::OrderGateway;
use food_express_storefront::CartStore;
use rust_decimal::Decimal;

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartAction {
    /// Show the current cart
    Show,
    /// Add a menu item to the cart
    Add {
        /// Restaurant the item belongs to
        #[arg(short, long)]
        restaurant: i64,

        /// Menu item ID
        #[arg(short, long)]
        item: i64,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Increase a line's quantity by one
    Increase {
        /// Cart line ID
        #[arg(short, long)]
        line: i64,
    },
    /// Decrease a line's quantity by one
    Decrease {
        /// Cart line ID
        #[arg(short, long)]
        line: i64,
    },
    /// Remove a line from the cart
    Remove {
        /// Cart line ID
        #[arg(short, long)]
        line: i64,
    },
    /// Delete the entire cart
    Clear,
}

/// Run a cart subcommand.
pub async fn run(
    gateway: OrderGateway,
    customer: i64,
    action: CartAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CartStore::new(gateway, CustomerId::new(customer));
    store.load().await?;

    let cart = match action {
        CartAction::Show => store.current(),
        CartAction::Add {
            restaurant,
            item,
            quantity,
        } => {
            // The backend resolves name and pricing from the menu item ID;
            // the placeholder line only carries what goes over the wire.
            let mut line = CartLine::new(MenuItemId::new(item), String::new(), Decimal::ZERO);
            line.quantity = quantity;
            store
                .add_item(&line, RestaurantId::new(restaurant), "")
                .await?
        }
        CartAction::Increase { line } => store.increase(CartLineId::new(line)).await?,
        CartAction::Decrease { line } => store.decrease(CartLineId::new(line)).await?,
        CartAction::Remove { line } => {
            let current = store.current();
            let Some(line) = current.as_ref().and_then(|c| c.line(CartLineId::new(line))) else {
                println!("No such line in the cart.");
                return Ok(());
            };
            store.remove_item(&line.clone()).await?
        }
        CartAction::Clear => {
            store.clear().await?;
            None
        }
    };

    print_cart(cart.as_ref());
    Ok(())
}

/// List a customer's past orders.
pub async fn order_history(
    gateway: OrderGateway,
    customer: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let orders = gateway
        .list_customer_orders(CustomerId::new(customer))
        .await?;
    if orders.is_empty() {
        println!("No past orders.");
        return Ok(());
    }
    for order in orders {
        println!(
            "#{} {} - {} ({}) [{}]",
            order.id,
            order.placed_at.format("%Y-%m-%d %H:%M"),
            order.restaurant_name,
            order.total_amount,
            order.status,
        );
    }
    Ok(())
}

/// Render a cart (or its absence) to stdout.
fn print_cart(cart: Option<&CartSnapshot>) {
    match cart {
        None => println!("Cart is empty."),
        Some(cart) => {
            println!(
                "Cart #{} - {} ({} items)",
                cart.id, cart.restaurant_name, cart.item_count
            );
            for line in &cart.lines {
                println!(
                    "  [{}] {} x{} @ {}",
                    line.id, line.name, line.quantity, line.unit_price
                );
            }
            println!("Total: {}", cart.total_amount);
        }
    }
}
