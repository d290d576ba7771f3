//! Checkout charge policy.
//!
//! GST rate and delivery fee are configuration, not hardcoded business law.
//! The final amount is rounded once, at minor-unit conversion; GST is never
//! rounded on its own.

use food_express_core::{CurrencyCode, Money};
use rust_decimal::Decimal;

use food_express_gateway::ConfigError;

/// Charge policy applied to the cart subtotal at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// GST as a fraction of the subtotal (0.05 = 5%).
    pub gst_rate: Decimal,
    /// Flat delivery fee.
    pub delivery_fee: Decimal,
    /// Subtotal at or above which delivery is free.
    pub free_delivery_above: Option<Decimal>,
    /// Currency every charge is denominated in.
    pub currency: CurrencyCode,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            gst_rate: Decimal::new(5, 2), // 5%
            delivery_fee: Decimal::ZERO,
            free_delivery_above: None,
            currency: CurrencyCode::INR,
        }
    }
}

impl CheckoutPolicy {
    /// Load the policy from environment variables, falling back to defaults.
    ///
    /// - `FOODEXPRESS_GST_RATE` - fraction, e.g. `0.05`
    /// - `FOODEXPRESS_DELIVERY_FEE` - flat amount in major units
    /// - `FOODEXPRESS_FREE_DELIVERY_ABOVE` - subtotal threshold, optional
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but not a decimal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut policy = Self::default();

        if let Some(rate) = parse_decimal_var("FOODEXPRESS_GST_RATE")? {
            policy.gst_rate = rate;
        }
        if let Some(fee) = parse_decimal_var("FOODEXPRESS_DELIVERY_FEE")? {
            policy.delivery_fee = fee;
        }
        policy.free_delivery_above = parse_decimal_var("FOODEXPRESS_FREE_DELIVERY_ABOVE")?;

        Ok(policy)
    }

    /// Delivery fee for a given subtotal, honoring the free-delivery
    /// threshold.
    #[must_use]
    pub fn delivery_fee_for(&self, subtotal: Decimal) -> Decimal {
        match self.free_delivery_above {
            Some(threshold) if subtotal >= threshold => Decimal::ZERO,
            _ => self.delivery_fee,
        }
    }

    /// Total charge for a subtotal: `subtotal × (1 + gst) + delivery fee`.
    ///
    /// Returns `None` for an absent or zero subtotal - there is nothing to
    /// charge before cart data has arrived, and computing anyway would
    /// produce a bogus amount.
    #[must_use]
    pub fn total_for(&self, subtotal: Decimal) -> Option<Money> {
        if subtotal <= Decimal::ZERO {
            return None;
        }

        let total = subtotal * (Decimal::ONE + self.gst_rate) + self.delivery_fee_for(subtotal);
        Some(Money::new(total, self.currency))
    }
}

fn parse_decimal_var(key: &str) -> Result<Option<Decimal>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(None),
    }
}
