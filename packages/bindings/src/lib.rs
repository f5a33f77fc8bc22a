use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use debt_payoff_core::amortization::{self, DebtTermsInput};
use debt_payoff_core::portfolio::{self, PlanComparisonInput, PortfolioScheduleInput};
use debt_payoff_core::DebtPayoffResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the request, run `f` and serialise its envelope.
fn call_json<I, O>(input_json: &str, f: impl FnOnce(&I) -> DebtPayoffResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single debt
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_debt_terms(input_json: String) -> NapiResult<String> {
    call_json::<DebtTermsInput, _>(&input_json, amortization::calculate_debt_terms)
}

#[napi]
pub fn build_debt_amortization(input_json: String) -> NapiResult<String> {
    call_json::<DebtTermsInput, _>(&input_json, amortization::build_debt_amortization)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

/// `this_month` falls back to the host clock when the request omits it.
#[napi]
pub fn build_portfolio_schedule(input_json: String) -> NapiResult<String> {
    call_json::<PortfolioScheduleInput, _>(&input_json, portfolio::build_portfolio_schedule)
}

#[napi]
pub fn compare_payoff_plans(input_json: String) -> NapiResult<String> {
    call_json::<PlanComparisonInput, _>(&input_json, portfolio::compare_payoff_plans)
}
