//! Payment provider handshake types.
//!
//! The payment provider is an opaque collaborator: the backend creates an
//! intent, the provider's widget collects payment and hands back a
//! correlation triplet, and the backend verifies that triplet server-side
//! when the order is finalized. Nothing in this client validates or
//! interprets the correlation fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CustomerId;
use super::money::CurrencyCode;

/// A server-issued payment intent.
///
/// Created per checkout attempt and consumed exactly once by the payment
/// widget. A failed or cancelled attempt requires a fresh intent; intents
/// are never reused across retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Opaque order identifier at the payment provider.
    #[serde(rename = "orderId")]
    pub provider_order_id: String,
    /// Charge amount in minor currency units (paise for INR).
    #[serde(rename = "amountInPaise")]
    pub amount_minor: i64,
    pub currency: CurrencyCode,
}

/// The correlation triplet proving a charge occurred.
///
/// Forwarded verbatim to the backend, which verifies the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub provider_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// The finalize-order payload.
///
/// The total is re-validated server-side; the backend does not trust the
/// client's arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedOrder {
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub delivery_address: String,
    #[serde(flatten)]
    pub confirmation: PaymentConfirmation,
}
