//! Checkout command with a stdin-driven payment step.

use clap::Args;
use food_express_core::{CustomerId, PaymentConfirmation};
use food_express_gateway::OrderGateway;
use food_express_storefront::{
    CartStore, CheckoutOrchestrator, CheckoutPolicy, PaymentCollaborator, PaymentOutcome,
    PaymentProviderConfig, PaymentRequest,
};

/// Checkout arguments; contact fields fall back to the customer profile.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer placing the order
    #[arg(short, long)]
    pub customer: i64,

    /// Override the prefilled first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Override the prefilled last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Override the prefilled email
    #[arg(long)]
    pub email: Option<String>,

    /// Override the prefilled phone (10 digits)
    #[arg(long)]
    pub phone: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// State
    #[arg(long)]
    pub state: String,

    /// Postal code (6 digits)
    #[arg(long)]
    pub zip: String,
}

/// The payment widget stand-in: prompts on stdin and resolves with exactly
/// one of the two outcomes, like the real provider UI would.
struct StdinPayment;

impl PaymentCollaborator for StdinPayment {
    async fn collect(&self, request: PaymentRequest) -> PaymentOutcome {
        println!(
            "Payment of {} {} due to {} (intent {}).",
            request.currency,
            format_minor(request.amount_minor),
            request.business_name,
            request.provider_order_id
        );
        println!("Enter '<payment-id> <signature>' to authorize, or press Enter to cancel:");

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        let Ok(Ok(line)) = line else {
            return PaymentOutcome::Cancelled;
        };

        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(payment_id), Some(signature)) => {
                PaymentOutcome::Authorized(PaymentConfirmation {
                    provider_order_id: request.provider_order_id,
                    payment_id: payment_id.to_string(),
                    signature: signature.to_string(),
                })
            }
            _ => PaymentOutcome::Cancelled,
        }
    }
}

/// Run the checkout flow end to end.
pub async fn run(
    gateway: OrderGateway,
    args: CheckoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let customer_id = CustomerId::new(args.customer);
    let cart = CartStore::new(gateway.clone(), customer_id);
    cart.load().await?;

    let mut orchestrator = CheckoutOrchestrator::new(
        gateway,
        cart,
        StdinPayment,
        CheckoutPolicy::from_env()?,
        PaymentProviderConfig::from_env()?,
        customer_id,
    );

    orchestrator.begin();
    if let Err(e) = orchestrator.prefill().await {
        tracing::warn!(error = %e, "Could not prefill billing details from profile");
    }

    let form = orchestrator.form_mut();
    if let Some(v) = args.first_name {
        form.first_name = v;
    }
    if let Some(v) = args.last_name {
        form.last_name = v;
    }
    if let Some(v) = args.email {
        form.email = v;
    }
    if let Some(v) = args.phone {
        form.phone = v;
    }
    form.address = args.address;
    form.city = args.city;
    form.state = args.state;
    form.zip = args.zip;

    if let Some(charge) = orchestrator.refresh_charge() {
        println!("Charge: {} {} (incl. GST and delivery fee)", charge.currency, charge.amount);
    }

    orchestrator.place_order().await?;
    println!("Order placed. Cart cleared.");
    Ok(())
}

/// Render a minor-unit amount as major units for display.
fn format_minor(amount_minor: i64) -> String {
    format!("{}.{:02}", amount_minor / 100, (amount_minor % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minor() {
        assert_eq!(format_minor(11800), "118.00");
        assert_eq!(format_minor(5), "0.05");
    }
}
