use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use debt_payoff_core::calendar::YearMonth;
use debt_payoff_core::payoff::{PayoffPlan, SortDirection, SortKey};
use debt_payoff_core::portfolio::{self, PortfolioScheduleInput};

use crate::config::CliConfig;
use crate::input;

/// Arguments for a portfolio schedule. Debts come from JSON; flags
/// override the request's settings.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file with a `debts` array
    #[arg(long)]
    pub input: Option<String>,

    /// Payoff plan: minimum, quickest-wins (snowball), greatest-savings (avalanche)
    #[arg(long)]
    pub plan: Option<PayoffPlan>,

    /// Order debts by this field, after any plan
    #[arg(long)]
    pub sort_key: Option<SortKey>,

    /// none, asc or desc
    #[arg(long)]
    pub sort_direction: Option<SortDirection>,

    /// Roll freed minimum payments into the remaining debts
    #[arg(long)]
    pub rolling: Option<bool>,

    /// Monthly amount paid on top of the minimums
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Month for the remaining-balance snapshot (YYYY-MM)
    #[arg(long)]
    pub this_month: Option<YearMonth>,

    /// Report only this debt's schedule
    #[arg(long)]
    pub debt: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: PortfolioScheduleInput = input::read_request(args.input.as_deref())?
        .ok_or("debts are required: provide --input or pipe JSON on stdin")?;

    if args.plan.is_some() {
        request.plan = args.plan;
    }
    if args.sort_key.is_some() {
        request.sort_key = args.sort_key;
    }
    if args.sort_direction.is_some() {
        request.sort_direction = args.sort_direction;
    }
    if args.rolling.is_some() {
        request.enable_rolling_payments = args.rolling;
    }
    if let Some(extra) = args.extra {
        request.extra_principal_payment = extra;
    }
    if args.this_month.is_some() {
        request.this_month = args.this_month;
    }
    if args.debt.is_some() {
        request.debt_filter = args.debt;
    }

    debug!(debts = request.debts.len(), plan = ?request.plan, "scheduling portfolio");
    let clock = config.clock()?;
    let result = portfolio::build_portfolio_schedule_with_clock(&request, clock.as_ref())?;
    Ok(serde_json::to_value(result)?)
}
