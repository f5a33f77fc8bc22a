pub mod payment;
pub mod single;

use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

pub use payment::{Amortization, AmortizationSummary, Payment};
pub use single::{
    build_amortization, build_debt_amortization, calculate_debt_terms, debt_life_months,
    minimum_payment, total_interest, AmortizationTable, AmortizationTotals, DebtTerms,
    DebtTermsInput,
};

/// Upper bound on schedule length. Validated debts finish long before this;
/// it only stops a bad input from looping forever.
pub const MAX_SCHEDULE_MONTHS: u32 = 12_000;

/// Largest balance, payment or extra amount accepted. Portfolio totals stay
/// well inside the `Decimal` range below it.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest annual rate accepted (10000%).
pub const MAX_INTEREST_RATE: Rate = dec!(100);
