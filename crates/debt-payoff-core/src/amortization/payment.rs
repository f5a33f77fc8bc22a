use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::types::Money;

/// One row of a schedule, either for a single debt or for the whole
/// portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<YearMonth>,
    pub beginning_balance: Money,
    pub interest: Money,
    pub principal: Money,
    /// Scheduled, rolled and externally supplied principal beyond the
    /// minimum payment.
    pub extra_payment: Money,
    pub ending_balance: Money,
    /// Interest plus principal.
    pub regular_payment: Money,
    /// Regular payment plus extra payment.
    pub total_payment: Money,
    /// Debts still being paid this month.
    pub debt_count: u32,
}

impl Payment {
    pub(crate) fn empty(payment_number: u32, payment_date: Option<YearMonth>) -> Self {
        Self {
            payment_number,
            payment_date,
            beginning_balance: Decimal::ZERO,
            interest: Decimal::ZERO,
            principal: Decimal::ZERO,
            extra_payment: Decimal::ZERO,
            ending_balance: Decimal::ZERO,
            regular_payment: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            debt_count: 0,
        }
    }

    /// Apply additional principal to an already recorded row.
    pub(crate) fn apply_extra(&mut self, amount: Money) {
        self.extra_payment += amount;
        self.ending_balance -= amount;
        self.total_payment += amount;
    }
}

/// Aggregates over a full schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub total_debt: Money,
    /// Monthly payment capacity: minimum payments plus any extra top-up.
    pub total_payment: Money,
    /// Interest when only minimum payments are made.
    pub expected_interest: Money,
    /// Interest under the simulated plan.
    pub actual_interest: Money,
    pub expected_debt_life: u32,
    pub actual_debt_life: u32,
    pub remaining_balance: Money,
    pub remaining_life: u32,
    pub remaining_debts: u32,
    /// Row matching "this month", when the schedule covers it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_payment_number: Option<u32>,
}

impl AmortizationSummary {
    pub fn interest_savings(&self) -> Money {
        self.expected_interest - self.actual_interest
    }

    pub fn months_saved(&self) -> i64 {
        i64::from(self.expected_debt_life) - i64::from(self.actual_debt_life)
    }

    /// Share of the original debt already repaid, between 0 and 1.
    pub fn paid_off_fraction(&self) -> Decimal {
        if self.total_debt.is_zero() {
            return Decimal::ONE;
        }
        (Decimal::ONE - self.remaining_balance / self.total_debt)
            .max(Decimal::ZERO)
            .min(Decimal::ONE)
    }
}

/// A schedule together with the parameters it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    pub enable_rolling_payments: bool,
    pub extra_principal_payment: Money,
    pub summary: AmortizationSummary,
    pub payments: Vec<Payment>,
}

impl Amortization {
    pub fn new(enable_rolling_payments: bool, extra_principal_payment: Money) -> Self {
        Self {
            enable_rolling_payments,
            extra_principal_payment,
            summary: AmortizationSummary::default(),
            payments: Vec::new(),
        }
    }

    /// Month of the final payment.
    pub fn payoff_month(&self) -> Option<YearMonth> {
        self.payments.last().and_then(|p| p.payment_date)
    }
}
