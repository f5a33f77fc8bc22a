use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_payoff_core::calendar::YearMonth;
use debt_payoff_core::portfolio::{self, PlanComparisonInput};

use crate::config::CliConfig;
use crate::input;

/// Arguments for comparing every payoff plan
#[derive(Args)]
pub struct PlansArgs {
    /// Path to JSON input file with a `debts` array
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly amount paid on top of the minimums
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Month for the remaining-balance snapshot (YYYY-MM)
    #[arg(long)]
    pub this_month: Option<YearMonth>,
}

pub fn run_plans(args: PlansArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: PlanComparisonInput = input::read_request(args.input.as_deref())?
        .ok_or("debts are required: provide --input or pipe JSON on stdin")?;

    if let Some(extra) = args.extra {
        request.extra_principal_payment = extra;
    }
    if args.this_month.is_some() {
        request.this_month = args.this_month;
    }

    let clock = config.clock()?;
    let result = portfolio::compare_payoff_plans_with_clock(&request, clock.as_ref())?;
    Ok(serde_json::to_value(result)?)
}
