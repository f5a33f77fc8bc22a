//! Closed-form payment formulas and the month-by-month table for a single
//! debt.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::Payment;
use super::{MAX_AMOUNT, MAX_INTEREST_RATE, MAX_SCHEDULE_MONTHS};
use crate::error::DebtPayoffError;
use crate::types::*;
use crate::DebtPayoffResult;

/// Running totals for a single-debt table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationTotals {
    pub principal: Money,
    pub interest: Money,
    /// Number of payments actually made.
    pub debt_life: u32,
}

/// Rows plus totals for a single debt paid at its minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationTable {
    pub payments: Vec<Payment>,
    pub totals: AmortizationTotals,
}

/// Input for completing a partially specified debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtTermsInput {
    pub balance: Money,
    pub interest_rate: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<Money>,
    /// Months, may be fractional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_life: Option<Decimal>,
}

/// Fully resolved terms of a debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtTerms {
    pub balance: Money,
    pub interest_rate: Rate,
    pub minimum_payment: Money,
    pub debt_life: Decimal,
    /// Whole number of payments the table actually needs.
    pub months: u32,
    pub expected_interest: Money,
    pub total_paid: Money,
}

/// Whole months needed to cover a possibly fractional life.
pub fn whole_months(life_months: Decimal) -> u32 {
    life_months.ceil().to_u32().unwrap_or(0)
}

/// Level monthly payment that retires `balance` in `life_months`.
pub fn minimum_payment(
    balance: Money,
    annual_rate: Rate,
    life_months: Decimal,
) -> DebtPayoffResult<Money> {
    require_within("balance", balance, MAX_AMOUNT)?;
    require_within("interest_rate", annual_rate, MAX_INTEREST_RATE)?;
    if life_months <= Decimal::ZERO {
        return Err(DebtPayoffError::InvalidInput {
            field: "debt_life".into(),
            reason: "Debt life must be greater than zero months".into(),
        });
    }
    validate_debt_life(life_months)?;

    if annual_rate.is_zero() {
        return divide(balance, life_months, "debt_life");
    }

    let rate = periodic_rate(annual_rate);
    let growth = (Decimal::ONE + rate)
        .checked_powd(life_months)
        .ok_or_else(|| DebtPayoffError::InvalidInput {
            field: "debt_life".into(),
            reason: format!("Compounding over {life_months} months overflows"),
        })?;

    let denominator = Decimal::ONE - Decimal::ONE / growth;
    if denominator <= Decimal::ZERO {
        return Err(DebtPayoffError::DivisionByZero {
            context: "minimum payment annuity factor".into(),
        });
    }

    divide(rate * balance, denominator, "debt_life")
}

/// Months needed to retire `balance` at `minimum_payment`, possibly
/// fractional.
pub fn debt_life_months(
    balance: Money,
    annual_rate: Rate,
    minimum_payment: Money,
) -> DebtPayoffResult<Decimal> {
    require_within("balance", balance, MAX_AMOUNT)?;
    require_within("interest_rate", annual_rate, MAX_INTEREST_RATE)?;

    if balance.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if minimum_payment <= Decimal::ZERO {
        return Err(DebtPayoffError::InvalidInput {
            field: "minimum_payment".into(),
            reason: "Minimum payment must be positive for an outstanding balance".into(),
        });
    }

    if annual_rate.is_zero() {
        return divide(balance, minimum_payment, "minimum_payment");
    }

    let rate = periodic_rate(annual_rate);
    let interest_share = divide(rate * balance, minimum_payment, "minimum_payment")?;
    if interest_share >= Decimal::ONE {
        return Err(DebtPayoffError::FinancialImpossibility(format!(
            "minimum payment {minimum_payment} does not cover monthly interest {}",
            round_cents(rate * balance)
        )));
    }

    let numerator = (Decimal::ONE - interest_share).checked_ln().ok_or_else(|| {
        DebtPayoffError::FinancialImpossibility("debt life logarithm is undefined".into())
    })?;
    let denominator = (Decimal::ONE + rate)
        .checked_ln()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| DebtPayoffError::DivisionByZero {
            context: "debt life growth logarithm".into(),
        })?;

    Ok(-numerator / denominator)
}

/// Reject a payment that never reduces the balance. Both the exact and the
/// cent-rounded first-month interest must be strictly below the payment,
/// otherwise the table would grow or stall forever.
pub fn validate_amortizing(
    balance: Money,
    annual_rate: Rate,
    minimum_payment: Money,
) -> DebtPayoffResult<()> {
    require_within("balance", balance, MAX_AMOUNT)?;
    require_within("interest_rate", annual_rate, MAX_INTEREST_RATE)?;
    require_within("minimum_payment", minimum_payment, MAX_AMOUNT)?;

    if balance.is_zero() {
        return Ok(());
    }

    let interest = balance * periodic_rate(annual_rate);
    if minimum_payment <= interest || minimum_payment <= round_cents(interest) {
        return Err(DebtPayoffError::FinancialImpossibility(format!(
            "minimum payment {minimum_payment} does not exceed first month interest {}",
            round_cents(interest)
        )));
    }
    Ok(())
}

/// Pay `minimum_payment` every month until the balance is gone.
///
/// Interest is rounded to cents when it is charged; principal and balances
/// keep full precision. `life_months` only sizes the table up front.
pub fn build_amortization(
    balance: Money,
    annual_rate: Rate,
    minimum_payment: Money,
    life_months: Decimal,
) -> DebtPayoffResult<AmortizationTable> {
    validate_amortizing(balance, annual_rate, minimum_payment)?;

    let rate = periodic_rate(annual_rate);
    let capacity = whole_months(life_months).min(MAX_SCHEDULE_MONTHS);
    let mut payments = Vec::with_capacity(capacity as usize);
    let mut totals = AmortizationTotals::default();
    let mut remaining = balance;

    while remaining > Decimal::ZERO {
        let payment_number = payments.len() as u32 + 1;
        if payment_number > MAX_SCHEDULE_MONTHS {
            return Err(DebtPayoffError::NonTerminatingSchedule {
                months: MAX_SCHEDULE_MONTHS,
            });
        }

        let beginning = remaining;
        let interest = round_cents(remaining * rate);
        let principal = (minimum_payment - interest).min(remaining);
        remaining -= principal;

        totals.principal += principal;
        totals.interest += interest;

        let mut row = Payment::empty(payment_number, None);
        row.beginning_balance = beginning;
        row.interest = interest;
        row.principal = principal;
        row.ending_balance = remaining;
        row.regular_payment = interest + principal;
        row.total_payment = row.regular_payment;
        row.debt_count = 1;
        payments.push(row);
    }

    totals.debt_life = payments.len() as u32;
    Ok(AmortizationTable { payments, totals })
}

/// Interest paid over the life of the debt at its minimum payment.
pub fn total_interest(
    balance: Money,
    annual_rate: Rate,
    minimum_payment: Money,
) -> DebtPayoffResult<Money> {
    let life = debt_life_months(balance, annual_rate, minimum_payment)?;
    Ok(build_amortization(balance, annual_rate, minimum_payment, life)?
        .totals
        .interest)
}

/// Fill in whichever of minimum payment and debt life is missing. When both
/// are supplied they are kept as given. Either way the result must amortize
/// within `MAX_SCHEDULE_MONTHS`.
pub fn resolve_terms(
    balance: Money,
    annual_rate: Rate,
    supplied_payment: Option<Money>,
    supplied_life: Option<Decimal>,
) -> DebtPayoffResult<(Money, Decimal)> {
    let (payment, life) = match (supplied_payment, supplied_life) {
        (Some(payment), Some(life)) => (payment, life),
        (Some(payment), None) => (payment, debt_life_months(balance, annual_rate, payment)?),
        (None, Some(life)) => (minimum_payment(balance, annual_rate, life)?, life),
        (None, None) => {
            return Err(DebtPayoffError::InvalidInput {
                field: "minimum_payment".into(),
                reason: "Either a minimum payment or a debt life is required".into(),
            })
        }
    };
    validate_amortizing(balance, annual_rate, payment)?;
    validate_debt_life(life)?;
    Ok((payment, life))
}

/// A life is a non-negative number of months no longer than the longest
/// schedule the engine will build.
pub fn validate_debt_life(life_months: Decimal) -> DebtPayoffResult<()> {
    require_within("debt_life", life_months, Decimal::from(MAX_SCHEDULE_MONTHS))
}

/// Complete a debt's terms and report its expected cost at the minimum
/// payment.
pub fn calculate_debt_terms(
    input: &DebtTermsInput,
) -> DebtPayoffResult<ComputationOutput<DebtTerms>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (minimum, life) = resolve_terms(
        input.balance,
        input.interest_rate,
        input.minimum_payment,
        input.debt_life,
    )?;
    let table = build_amortization(input.balance, input.interest_rate, minimum, life)?;

    if input.minimum_payment.is_some() && input.debt_life.is_some() {
        let implied = whole_months(debt_life_months(input.balance, input.interest_rate, minimum)?);
        if implied != whole_months(life) {
            warnings.push(format!(
                "Supplied debt life of {life} months differs from the {implied} months implied by the minimum payment"
            ));
        }
    }
    if input.interest_rate.is_zero() {
        warnings.push("Zero interest rate: payment is balance divided by life".into());
    }

    let terms = DebtTerms {
        balance: input.balance,
        interest_rate: input.interest_rate,
        minimum_payment: minimum,
        debt_life: life,
        months: table.totals.debt_life,
        expected_interest: table.totals.interest,
        total_paid: table.totals.interest + table.totals.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level Payment Amortization Terms",
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "interest_rate": input.interest_rate.to_string(),
            "compounding": "monthly",
            "interest_rounding": "cents, half away from zero",
        }),
        warnings,
        elapsed,
        terms,
    ))
}

/// Month-by-month table for a single debt paid at its minimum.
pub fn build_debt_amortization(
    input: &DebtTermsInput,
) -> DebtPayoffResult<ComputationOutput<AmortizationTable>> {
    let start = Instant::now();

    let (minimum, life) = resolve_terms(
        input.balance,
        input.interest_rate,
        input.minimum_payment,
        input.debt_life,
    )?;
    let table = build_amortization(input.balance, input.interest_rate, minimum, life)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Single Debt Amortization Schedule",
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "interest_rate": input.interest_rate.to_string(),
            "minimum_payment": minimum.to_string(),
        }),
        Vec::new(),
        elapsed,
        table,
    ))
}

pub(crate) fn require_within(field: &str, value: Decimal, max: Decimal) -> DebtPayoffResult<()> {
    if value < Decimal::ZERO {
        return Err(DebtPayoffError::InvalidInput {
            field: field.into(),
            reason: format!("must not be negative, got {value}"),
        });
    }
    if value > max {
        return Err(DebtPayoffError::InvalidInput {
            field: field.into(),
            reason: format!("must not exceed {max}, got {value}"),
        });
    }
    Ok(())
}

fn divide(numerator: Decimal, denominator: Decimal, field: &str) -> DebtPayoffResult<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| DebtPayoffError::InvalidInput {
            field: field.into(),
            reason: format!("{numerator} / {denominator} is out of range"),
        })
}
