use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::debt_list::DebtPortfolio;
use crate::amortization::{AmortizationSummary, Payment};
use crate::calendar::{MonthClock, SystemClock, YearMonth};
use crate::debt::DebtInput;
use crate::error::DebtPayoffError;
use crate::payoff::{PayoffPlan, SortDirection, SortKey};
use crate::schedule::ScheduleConfig;
use crate::types::*;
use crate::DebtPayoffResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioScheduleInput {
    pub debts: Vec<DebtInput>,
    /// Sets the order and the default rolling flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PayoffPlan>,
    /// Explicit order, applied after any plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    /// Overrides the plan's rolling flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_rolling_payments: Option<bool>,
    #[serde(default)]
    pub extra_principal_payment: Money,
    /// Defaults to the current month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_month: Option<YearMonth>,
    /// Report one debt's schedule instead of the aggregate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_filter: Option<String>,
}

/// Per-debt line of a portfolio schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtScheduleSummary {
    pub name: String,
    pub included: bool,
    pub payoff_order: u32,
    pub balance: Money,
    pub interest_rate: Rate,
    pub minimum_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<YearMonth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AmortizationSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioScheduleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PayoffPlan>,
    pub enable_rolling_payments: bool,
    pub extra_principal_payment: Money,
    pub this_month: YearMonth,
    /// Debt names in scheduling order.
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<YearMonth>,
    pub summary: AmortizationSummary,
    pub payments: Vec<Payment>,
    pub debts: Vec<DebtScheduleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanComparisonInput {
    pub debts: Vec<DebtInput>,
    #[serde(default)]
    pub extra_principal_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_month: Option<YearMonth>,
}

/// When and at what cost one debt is retired under a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoff {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<YearMonth>,
    pub months: u32,
    pub interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub plan: PayoffPlan,
    pub display_text: String,
    pub enable_rolling_payments: bool,
    pub actual_interest: Money,
    pub actual_debt_life: u32,
    pub interest_savings: Money,
    pub months_saved: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<YearMonth>,
    /// Debts in the order they are paid off.
    pub payoff_sequence: Vec<DebtPayoff>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanComparisonOutput {
    pub total_debt: Money,
    pub total_payment: Money,
    pub expected_interest: Money,
    pub expected_debt_life: u32,
    pub plans: Vec<PlanOutcome>,
    /// Plan with the lowest interest; earlier plans win ties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_interest: Option<PayoffPlan>,
    /// Plan with the shortest life; earlier plans win ties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest_payoff: Option<PayoffPlan>,
}

// ---------------------------------------------------------------------------
// Portfolio schedule
// ---------------------------------------------------------------------------

/// Schedule a portfolio, taking "this month" from the system clock when the
/// input leaves it out.
pub fn build_portfolio_schedule(
    input: &PortfolioScheduleInput,
) -> DebtPayoffResult<ComputationOutput<PortfolioScheduleOutput>> {
    build_portfolio_schedule_with_clock(input, &SystemClock)
}

pub fn build_portfolio_schedule_with_clock(
    input: &PortfolioScheduleInput,
    clock: &dyn MonthClock,
) -> DebtPayoffResult<ComputationOutput<PortfolioScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut portfolio = DebtPortfolio::from_inputs(input.debts.clone())?;

    let mut rolling = false;
    if let Some(plan) = input.plan {
        rolling = portfolio.apply_plan(plan);
    }
    if let Some(key) = input.sort_key {
        portfolio.sort(key, input.sort_direction.unwrap_or(SortDirection::Ascending));
    } else if let Some(direction) = input.sort_direction {
        portfolio.sort(SortKey::PayoffOrder, direction);
    }
    if let Some(explicit) = input.enable_rolling_payments {
        rolling = explicit;
    }

    let this_month = match input.this_month {
        Some(month) => month,
        None => {
            let month = clock.this_month();
            warnings.push(format!(
                "this_month not supplied; using {month} from the clock"
            ));
            month
        }
    };

    if portfolio.included_count() == 0 {
        warnings.push("No debts are included; the schedule is empty".into());
    }

    let config = ScheduleConfig::new(rolling, input.extra_principal_payment, this_month);
    let filter = input.debt_filter.as_deref();
    let amortization = portfolio.get_amortization(&config, filter)?.clone();

    let debts: Vec<DebtScheduleSummary> = portfolio
        .debts()
        .iter()
        .map(|debt| DebtScheduleSummary {
            name: debt.name.clone(),
            included: debt.included,
            payoff_order: debt.payoff_order,
            balance: debt.balance,
            interest_rate: debt.interest_rate,
            minimum_payment: debt.minimum_payment,
            payoff_month: debt.amortization.as_ref().and_then(|a| a.payoff_month()),
            summary: debt.amortization.as_ref().map(|a| a.summary.clone()),
        })
        .collect();

    let output = PortfolioScheduleOutput {
        plan: input.plan,
        enable_rolling_payments: rolling,
        extra_principal_payment: input.extra_principal_payment,
        this_month,
        order: portfolio.debts().iter().map(|d| d.name.clone()).collect(),
        debt_filter: input.debt_filter.clone(),
        payoff_month: amortization.payoff_month(),
        summary: amortization.summary,
        payments: amortization.payments,
        debts,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-Debt Payoff Schedule",
        &serde_json::json!({
            "plan": input.plan.map(|p| p.name()),
            "enable_rolling_payments": rolling,
            "extra_principal_payment": input.extra_principal_payment.to_string(),
            "this_month": this_month.to_string(),
            "reallocation": "greedy in portfolio order, freed capacity usable the same month",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Plan comparison
// ---------------------------------------------------------------------------

/// Run every payoff plan over the same debts and compare the outcomes.
pub fn compare_payoff_plans(
    input: &PlanComparisonInput,
) -> DebtPayoffResult<ComputationOutput<PlanComparisonOutput>> {
    compare_payoff_plans_with_clock(input, &SystemClock)
}

pub fn compare_payoff_plans_with_clock(
    input: &PlanComparisonInput,
    clock: &dyn MonthClock,
) -> DebtPayoffResult<ComputationOutput<PlanComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base = DebtPortfolio::from_inputs(input.debts.clone())?;
    if base.included_count() == 0 {
        return Err(DebtPayoffError::InvalidInput {
            field: "debts".into(),
            reason: "At least one included debt is required to compare plans".into(),
        });
    }

    let this_month = match input.this_month {
        Some(month) => month,
        None => {
            let month = clock.this_month();
            warnings.push(format!(
                "this_month not supplied; using {month} from the clock"
            ));
            month
        }
    };

    let mut plans: Vec<PlanOutcome> = Vec::with_capacity(PayoffPlan::ALL.len());
    let mut baseline = AmortizationSummary::default();

    for plan in PayoffPlan::ALL {
        let mut portfolio = base.clone();
        let rolling = portfolio.apply_plan(plan);
        let config = ScheduleConfig::new(rolling, input.extra_principal_payment, this_month);
        let summary = portfolio.build_amortizations(&config)?.summary.clone();
        let payoff_month = portfolio.amortization().and_then(|a| a.payoff_month());

        let mut payoff_sequence: Vec<DebtPayoff> = portfolio
            .debts()
            .iter()
            .filter_map(|debt| {
                debt.amortization.as_ref().map(|a| DebtPayoff {
                    name: debt.name.clone(),
                    payoff_month: a.payoff_month(),
                    months: a.summary.actual_debt_life,
                    interest: a.summary.actual_interest,
                })
            })
            .collect();
        payoff_sequence.sort_by_key(|p| p.payoff_month);

        if plan == PayoffPlan::Minimum {
            baseline = summary.clone();
        }

        plans.push(PlanOutcome {
            plan,
            display_text: plan.display_text().to_string(),
            enable_rolling_payments: rolling,
            actual_interest: summary.actual_interest,
            actual_debt_life: summary.actual_debt_life,
            interest_savings: summary.interest_savings(),
            months_saved: summary.months_saved(),
            payoff_month,
            payoff_sequence,
        });
    }

    let lowest_interest = plans
        .iter()
        .min_by(|a, b| a.actual_interest.cmp(&b.actual_interest))
        .map(|p| p.plan);
    let fastest_payoff = plans
        .iter()
        .min_by_key(|p| p.actual_debt_life)
        .map(|p| p.plan);

    if input.extra_principal_payment.is_zero()
        && plans.iter().all(|p| p.actual_interest == baseline.actual_interest)
    {
        warnings.push("All plans cost the same; ordering has no effect on these debts".into());
    }

    let output = PlanComparisonOutput {
        total_debt: baseline.total_debt,
        total_payment: baseline.total_payment,
        expected_interest: baseline.expected_interest,
        expected_debt_life: baseline.expected_debt_life,
        plans,
        lowest_interest,
        fastest_payoff,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payoff Plan Comparison",
        &serde_json::json!({
            "plans": PayoffPlan::ALL.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "extra_principal_payment": input.extra_principal_payment.to_string(),
            "this_month": this_month.to_string(),
            "baseline": "minimum payments in payoff order",
        }),
        warnings,
        elapsed,
        output,
    ))
}
