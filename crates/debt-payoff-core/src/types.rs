use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Number of monthly periods in a year.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly rate for an annual rate.
pub fn periodic_rate(annual_rate: Rate) -> Rate {
    annual_rate / MONTHS_PER_YEAR
}

/// Round a money amount to whole cents, halves away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(dec!(8.495)), dec!(8.50));
        assert_eq!(round_cents(dec!(8.4949)), dec!(8.49));
        assert_eq!(round_cents(dec!(57)), dec!(57));
    }

    #[test]
    fn test_periodic_rate() {
        assert_eq!(periodic_rate(dec!(0.12)), dec!(0.01));
        assert_eq!(MONTHS_PER_YEAR, dec!(12));
    }
}
