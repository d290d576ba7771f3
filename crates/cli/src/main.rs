//! FoodExpress CLI - drive the client flows against a running backend.
//!
//! # Usage
//!
//! ```bash
//! # Show the customer's cart
//! food-express cart --customer 9 show
//!
//! # Add a menu item, bump a line, clear everything
//! food-express cart --customer 9 add --restaurant 3 --item 5
//! food-express cart --customer 9 increase --line 21
//! food-express cart --customer 9 clear
//!
//! # Run a checkout (the payment step prompts on stdin)
//! food-express checkout --customer 9 --address "7 Lake View" \
//!     --city Pune --state MH --zip 411001
//!
//! # Past orders
//! food-express orders --customer 9
//!
//! # Admin order board
//! food-express board list
//! food-express board assign --order 42 --agent 4
//!
//! # Courier flow
//! food-express courier --agent 4 status
//! food-express courier --agent 4 deliver
//!
//! # Dashboard metrics
//! food-express dashboard
//! ```
//!
//! # Environment Variables
//!
//! - `FOODEXPRESS_API_URL` - backend base URL (required)
//! - `FOODEXPRESS_API_TOKEN` - bearer token (optional)
//! - `FOODEXPRESS_PAYMENT_KEY_ID` - publishable payment key (checkout only)
//! - `FOODEXPRESS_GST_RATE`, `FOODEXPRESS_DELIVERY_FEE`,
//!   `FOODEXPRESS_FREE_DELIVERY_ABOVE` - checkout policy overrides

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use food_express_gateway::{GatewayConfig, OrderGateway};

mod commands;

#[derive(Parser)]
#[command(name = "food-express")]
#[command(author, version, about = "FoodExpress client flows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Customer cart operations
    Cart {
        /// Customer ID the cart belongs to
        #[arg(short, long)]
        customer: i64,

        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Run the checkout flow for the customer's current cart
    Checkout(commands::checkout::CheckoutArgs),
    /// List a customer's past orders
    Orders {
        /// Customer ID
        #[arg(short, long)]
        customer: i64,
    },
    /// Admin order board
    Board {
        #[command(subcommand)]
        action: commands::board::BoardAction,
    },
    /// Courier fulfillment flow
    Courier {
        /// Delivery agent ID
        #[arg(short, long)]
        agent: i64,

        #[command(subcommand)]
        action: commands::courier::CourierAction,
    },
    /// Show admin dashboard metrics
    Dashboard,
}

#[tokio::main]
async fn main() {
    // Load .env if present, then initialize tracing
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "food_express=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = OrderGateway::new(&GatewayConfig::from_env()?);

    match cli.command {
        Commands::Cart { customer, action } => {
            commands::cart::run(gateway, customer, action).await?;
        }
        Commands::Checkout(args) => {
            commands::checkout::run(gateway, args).await?;
        }
        Commands::Orders { customer } => {
            commands::cart::order_history(gateway, customer).await?;
        }
        Commands::Board { action } => {
            commands::board::run(gateway, action).await?;
        }
        Commands::Courier { agent, action } => {
            commands::courier::run(gateway, agent, action).await?;
        }
        Commands::Dashboard => {
            commands::board::metrics(gateway).await?;
        }
    }
    Ok(())
}
