//! Money representation using decimal arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of money with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Convert to the smallest currency unit (paise, cents) with standard
    /// half-up rounding of the final amount.
    ///
    /// Payment providers take amounts in minor units; rounding happens here,
    /// once, and nowhere upstream.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        (self.amount * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The three-letter code as sent over the wire.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_minor_units_exact() {
        let m = Money::new(dec!(118), CurrencyCode::INR);
        assert_eq!(m.minor_units(), 11800);
    }

    #[test]
    fn test_minor_units_rounds_half_up() {
        assert_eq!(Money::new(dec!(10.005), CurrencyCode::INR).minor_units(), 1001);
        assert_eq!(Money::new(dec!(10.004), CurrencyCode::INR).minor_units(), 1000);
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::INR.to_string(), "INR");
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
    }
}
