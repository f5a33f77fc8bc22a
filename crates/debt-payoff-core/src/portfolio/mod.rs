pub mod analysis;
pub mod debt_list;

pub use analysis::{
    build_portfolio_schedule, build_portfolio_schedule_with_clock, compare_payoff_plans,
    compare_payoff_plans_with_clock, DebtPayoff, DebtScheduleSummary,
    PlanComparisonInput, PlanComparisonOutput, PlanOutcome, PortfolioScheduleInput,
    PortfolioScheduleOutput,
};
pub use debt_list::DebtPortfolio;
