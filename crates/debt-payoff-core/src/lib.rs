pub mod amortization;
pub mod calendar;
pub mod debt;
pub mod error;
pub mod payoff;
pub mod portfolio;
pub mod schedule;
pub mod types;

pub use calendar::YearMonth;
pub use debt::{Debt, DebtInput};
pub use error::DebtPayoffError;
pub use portfolio::DebtPortfolio;
pub use types::*;

/// Standard result type for all debt-payoff operations
pub type DebtPayoffResult<T> = Result<T, DebtPayoffError>;
