//! Multi-debt scheduler.
//!
//! Walks calendar months from the earliest creation month. Each month runs
//! two passes over the unpaid debts:
//!
//! 1. Regular amortization: interest (rounded to cents) and principal at the
//!    minimum payment, plus any extra principal scheduled on the debt for
//!    that month.
//! 2. Reallocation: the external top-up and, when rolling is enabled, the
//!    minimum payments freed by retired debts are applied greedily to the
//!    remaining debts in their current order.
//!
//! The order of the debts handed in therefore decides who receives freed
//! capacity first; a payoff plan sorts the portfolio before scheduling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amortization::single::{require_within, whole_months};
use crate::amortization::{Amortization, AmortizationSummary, Payment, MAX_AMOUNT, MAX_SCHEDULE_MONTHS};
use crate::calendar::YearMonth;
use crate::debt::Debt;
use crate::error::DebtPayoffError;
use crate::types::{periodic_rate, round_cents, Money, Rate};
use crate::DebtPayoffResult;

/// Every input that shapes a schedule. Two builds with equal configs over
/// the same debts produce the same result, so this doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enable_rolling_payments: bool,
    /// Constant monthly top-up applied beyond the minimum payments.
    pub extra_principal_payment: Money,
    /// Month used for the point-in-time "remaining" figures.
    pub this_month: YearMonth,
}

impl ScheduleConfig {
    pub fn new(enable_rolling_payments: bool, extra_principal_payment: Money, this_month: YearMonth) -> Self {
        Self {
            enable_rolling_payments,
            extra_principal_payment,
            this_month,
        }
    }

    pub fn validate(&self) -> DebtPayoffResult<()> {
        if self.extra_principal_payment < Decimal::ZERO {
            return Err(DebtPayoffError::InvalidInput {
                field: "extra_principal_payment".into(),
                reason: "Extra principal payment must not be negative".into(),
            });
        }
        require_within("extra_principal_payment", self.extra_principal_payment, MAX_AMOUNT)
    }
}

/// Schedule for one included debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSchedule {
    pub name: String,
    /// Position of the debt in the slice that was scheduled.
    pub index: usize,
    pub amortization: Amortization,
}

/// Aggregate schedule plus the per-debt schedules behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSchedule {
    pub amortization: Amortization,
    pub debts: Vec<DebtSchedule>,
}

/// Balance-tracking state for a debt that still has payments to make.
struct OpenDebt<'a> {
    index: usize,
    debt: &'a Debt,
    rate: Rate,
    remaining: Money,
    amortization: Amortization,
}

impl<'a> OpenDebt<'a> {
    fn new(index: usize, debt: &'a Debt, config: &ScheduleConfig) -> Self {
        let mut amortization =
            Amortization::new(config.enable_rolling_payments, config.extra_principal_payment);
        let expected_life = whole_months(debt.debt_life);
        amortization.summary = AmortizationSummary {
            total_debt: debt.balance,
            total_payment: debt.minimum_payment,
            expected_interest: debt.interest,
            expected_debt_life: expected_life,
            actual_debt_life: expected_life,
            remaining_balance: debt.balance,
            remaining_debts: 1,
            ..Default::default()
        };
        amortization
            .payments
            .reserve(expected_life.min(MAX_SCHEDULE_MONTHS) as usize);

        Self {
            index,
            debt,
            rate: periodic_rate(debt.interest_rate),
            remaining: debt.balance,
            amortization,
        }
    }

    fn started_by(&self, month: YearMonth) -> bool {
        self.debt.created <= month
    }

    fn current_row(&mut self) -> Option<&mut Payment> {
        self.amortization.payments.last_mut()
    }

    fn close(mut self, this_month: YearMonth) -> DebtSchedule {
        let summary = &mut self.amortization.summary;
        summary.actual_debt_life = self.amortization.payments.len() as u32;
        let first_month = self.amortization.payments.first().and_then(|p| p.payment_date);
        settle_remaining(summary, first_month, this_month);

        debug!(
            debt = %self.debt.name,
            months = summary.actual_debt_life,
            interest = %summary.actual_interest,
            "debt paid off"
        );

        DebtSchedule {
            name: self.debt.name.clone(),
            index: self.index,
            amortization: self.amortization,
        }
    }
}

/// Fill the point-in-time figures once the full life is known. A snapshot
/// taken during the walk pins the current payment; otherwise "this month"
/// lies before the schedule (nothing paid yet) or after it (all paid).
fn settle_remaining(
    summary: &mut AmortizationSummary,
    first_month: Option<YearMonth>,
    this_month: YearMonth,
) {
    match summary.current_payment_number {
        Some(current) => {
            summary.remaining_life = summary.actual_debt_life.saturating_sub(current);
        }
        None if first_month.is_some_and(|first| this_month < first) => {
            summary.remaining_life = summary.actual_debt_life;
        }
        None => {
            summary.remaining_balance = Decimal::ZERO;
            summary.remaining_life = 0;
            summary.remaining_debts = 0;
        }
    }
}

/// Schedule every included debt in `debts`, in slice order.
pub fn build_schedule(debts: &[Debt], config: &ScheduleConfig) -> DebtPayoffResult<PortfolioSchedule> {
    config.validate()?;

    let rolling = config.enable_rolling_payments;
    let mut aggregate = Amortization::new(rolling, config.extra_principal_payment);
    let summary = &mut aggregate.summary;
    summary.total_payment = config.extra_principal_payment;

    let mut open: Vec<OpenDebt<'_>> = Vec::new();
    let mut earliest: Option<YearMonth> = None;

    for (index, debt) in debts.iter().enumerate().filter(|(_, d)| d.included) {
        // Bounded amounts keep the running totals below from overflowing.
        debt.validate()?;
        summary.total_debt += debt.balance;
        summary.total_payment += debt.minimum_payment;
        summary.expected_interest += debt.interest;

        earliest = Some(earliest.map_or(debt.created, |e| e.min(debt.created)));
        open.push(OpenDebt::new(index, debt, config));
    }

    let Some(earliest) = earliest else {
        return Ok(PortfolioSchedule {
            amortization: aggregate,
            debts: Vec::new(),
        });
    };

    let expected_life = open
        .iter()
        .map(|d| {
            YearMonth::difference_in_months(earliest, d.debt.created)
                + whole_months(d.debt.debt_life) as i32
        })
        .max()
        .unwrap_or(0)
        .max(0) as u32;
    summary.expected_debt_life = expected_life;
    summary.actual_debt_life = expected_life;
    summary.remaining_balance = summary.total_debt;
    summary.remaining_debts = open.len() as u32;
    aggregate
        .payments
        .reserve(expected_life.min(MAX_SCHEDULE_MONTHS) as usize);

    let mut closed: Vec<DebtSchedule> = Vec::with_capacity(open.len());
    // Minimum payments of retired debts, carried into later months when rolling.
    let mut carried_capacity = config.extra_principal_payment;
    let mut month = earliest;
    let mut payment_number: u32 = 0;

    while !open.is_empty() {
        payment_number += 1;
        if payment_number > MAX_SCHEDULE_MONTHS {
            return Err(DebtPayoffError::NonTerminatingSchedule {
                months: MAX_SCHEDULE_MONTHS,
            });
        }

        let mut row = Payment::empty(payment_number, Some(month));
        row.debt_count = open.iter().filter(|d| d.started_by(month)).count() as u32;

        if month == config.this_month {
            for debt in open.iter_mut().filter(|d| d.started_by(month)) {
                let summary = &mut debt.amortization.summary;
                summary.remaining_balance = debt.remaining;
                summary.remaining_debts = 1;
                summary.current_payment_number = Some(debt.amortization.payments.len() as u32 + 1);
            }
        }

        let mut capacity = carried_capacity;

        // Regular payments and scheduled extra principal.
        let mut i = 0;
        while i < open.len() {
            let debt = &mut open[i];
            if !debt.started_by(month) {
                i += 1;
                continue;
            }

            let beginning = debt.remaining;
            let interest = round_cents(beginning * debt.rate);
            let principal = (debt.debt.minimum_payment - interest).min(beginning);
            let scheduled_extra = debt
                .debt
                .extra_principal_for(month)
                .min(beginning - principal);
            debt.remaining -= principal + scheduled_extra;

            let mut debt_row = Payment::empty(debt.amortization.payments.len() as u32 + 1, Some(month));
            debt_row.beginning_balance = beginning;
            debt_row.interest = interest;
            debt_row.principal = principal;
            debt_row.extra_payment = scheduled_extra;
            debt_row.ending_balance = debt.remaining;
            debt_row.regular_payment = interest + principal;
            debt_row.total_payment = debt_row.regular_payment + scheduled_extra;
            debt_row.debt_count = 1;
            debt.amortization.payments.push(debt_row);
            debt.amortization.summary.actual_interest += interest;

            row.beginning_balance += beginning;
            row.interest += interest;
            row.principal += principal;
            row.extra_payment += scheduled_extra;
            aggregate.summary.actual_interest += interest;

            if debt.remaining <= Decimal::ZERO {
                if rolling {
                    carried_capacity += debt.debt.minimum_payment;
                    capacity += debt.debt.minimum_payment - (interest + principal);
                }
                closed.push(open.remove(i).close(config.this_month));
            } else {
                i += 1;
            }
        }

        row.regular_payment = row.interest + row.principal;

        // Reallocate the top-up and freed minimums in portfolio order.
        let mut i = 0;
        while i < open.len() && capacity > Decimal::ZERO {
            let debt = &mut open[i];
            if !debt.started_by(month) {
                i += 1;
                continue;
            }

            let applied = debt.remaining.min(capacity);
            debt.remaining -= applied;
            capacity -= applied;
            row.extra_payment += applied;
            if let Some(debt_row) = debt.current_row() {
                debt_row.apply_extra(applied);
            }

            if debt.remaining <= Decimal::ZERO {
                if rolling {
                    carried_capacity += debt.debt.minimum_payment;
                }
                closed.push(open.remove(i).close(config.this_month));
            } else {
                i += 1;
            }
        }

        row.total_payment = row.regular_payment + row.extra_payment;
        row.ending_balance = row.beginning_balance - (row.principal + row.extra_payment);

        if month == config.this_month {
            let summary = &mut aggregate.summary;
            summary.remaining_balance = row.beginning_balance;
            summary.remaining_debts = row.debt_count;
            summary.current_payment_number = Some(payment_number);
        }

        aggregate.payments.push(row);
        if !open.is_empty() {
            month = month.checked_add_months(1)?;
        }
    }

    aggregate.summary.actual_debt_life = payment_number;
    settle_remaining(&mut aggregate.summary, Some(earliest), config.this_month);

    debug!(
        months = payment_number,
        expected_months = expected_life,
        interest = %aggregate.summary.actual_interest,
        rolling,
        "portfolio schedule built"
    );

    closed.sort_by_key(|d| d.index);
    Ok(PortfolioSchedule {
        amortization: aggregate,
        debts: closed,
    })
}
