use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_payoff_core::amortization::{self, DebtTermsInput};

use crate::input;

/// Arguments shared by `terms` and `amortize`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DebtTermsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate as a decimal (0.12 = 12%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Monthly minimum payment
    #[arg(long, alias = "payment")]
    pub minimum_payment: Option<Decimal>,

    /// Months to pay off at the minimum payment
    #[arg(long, alias = "life")]
    pub debt_life: Option<Decimal>,
}

fn resolve_input(args: DebtTermsArgs) -> Result<DebtTermsInput, Box<dyn std::error::Error>> {
    if let Some(request) = input::read_request(args.input.as_deref())? {
        return Ok(request);
    }
    if args.minimum_payment.is_none() && args.debt_life.is_none() {
        return Err("--minimum-payment or --debt-life is required (or provide --input)".into());
    }
    Ok(DebtTermsInput {
        balance: args
            .balance
            .ok_or("--balance is required (or provide --input)")?,
        interest_rate: args
            .interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        minimum_payment: args.minimum_payment,
        debt_life: args.debt_life,
    })
}

pub fn run_terms(args: DebtTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms_input = resolve_input(args)?;
    let result = amortization::calculate_debt_terms(&terms_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortize(args: DebtTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms_input = resolve_input(args)?;
    let result = amortization::build_debt_amortization(&terms_input)?;
    Ok(serde_json::to_value(result)?)
}
