//! External payment collaborator contract.
//!
//! The payment provider's widget is an opaque UI surface: control is ceded
//! to it with a one-shot intent, and it comes back with exactly one of two
//! outcomes. Modeling that as a two-outcome value (rather than nested
//! callbacks) keeps the orchestrator's transition table exhaustive and lets
//! tests stand in for the widget with a canned outcome.

use food_express_core::{CurrencyCode, PaymentConfirmation, PaymentIntent};

use food_express_gateway::ConfigError;

/// Contact details handed to the widget for prefill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the payment widget needs to present a charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Publishable provider key identifying the merchant account.
    pub key_id: String,
    /// Charge amount in minor currency units.
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    /// The intent's provider order ID; consumed exactly once.
    pub provider_order_id: String,
    /// Merchant display name shown in the widget header.
    pub business_name: String,
    pub description: String,
    pub prefill: PaymentPrefill,
    /// Delivery address attached as a provider note.
    pub address_note: String,
    /// Brand color for the widget theme.
    pub theme_color: String,
}

impl PaymentRequest {
    /// Build a request from an intent plus display configuration.
    #[must_use]
    pub fn for_intent(
        intent: &PaymentIntent,
        provider: &PaymentProviderConfig,
        prefill: PaymentPrefill,
        address_note: String,
    ) -> Self {
        Self {
            key_id: provider.key_id.clone(),
            amount_minor: intent.amount_minor,
            currency: intent.currency,
            provider_order_id: intent.provider_order_id.clone(),
            business_name: provider.business_name.clone(),
            description: "Payment for your food order".to_string(),
            prefill,
            address_note,
            theme_color: provider.theme_color.clone(),
        }
    }
}

/// The widget's single resolution: authorized or cancelled, never both,
/// never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The provider captured the charge and returned its correlation
    /// triplet.
    Authorized(PaymentConfirmation),
    /// The customer dismissed the widget before authorizing.
    Cancelled,
}

/// The external payment collaborator.
///
/// Implementations wrap the real provider widget; tests use stubs that
/// resolve immediately with either outcome.
pub trait PaymentCollaborator {
    /// Present the provider UI for the given request and resolve with its
    /// outcome. Suspends until the customer acts.
    fn collect(
        &self,
        request: PaymentRequest,
    ) -> impl Future<Output = PaymentOutcome> + Send;
}

/// Payment provider display configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProviderConfig {
    /// Publishable key; safe to expose to the widget.
    pub key_id: String,
    pub business_name: String,
    pub theme_color: String,
}

impl PaymentProviderConfig {
    /// Create a configuration with the default branding.
    #[must_use]
    pub fn new(key_id: String) -> Self {
        Self {
            key_id,
            business_name: "FoodExpress".to_string(),
            theme_color: "#f97316".to_string(),
        }
    }

    /// Load from environment variables.
    ///
    /// - `FOODEXPRESS_PAYMENT_KEY_ID` - required publishable key
    /// - `FOODEXPRESS_PAYMENT_THEME` - optional theme color override
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_id = std::env::var("FOODEXPRESS_PAYMENT_KEY_ID")
            .map_err(|_| ConfigError::MissingEnvVar("FOODEXPRESS_PAYMENT_KEY_ID".to_string()))?;

        let mut config = Self::new(key_id);
        if let Ok(theme) = std::env::var("FOODEXPRESS_PAYMENT_THEME") {
            config.theme_color = theme;
        }
        Ok(config)
    }
}
