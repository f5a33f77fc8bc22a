use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::sort::{SortDirection, SortKey};
use crate::error::DebtPayoffError;

/// A named payoff strategy: how debts are ordered and whether freed minimum
/// payments roll over to the next debt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoffPlan {
    /// Pay every minimum, nothing rolls.
    #[default]
    Minimum,
    /// Smallest balance first (snowball).
    QuickestWins,
    /// Highest rate first (avalanche).
    GreatestSavings,
}

impl PayoffPlan {
    pub const ALL: [PayoffPlan; 3] = [
        PayoffPlan::Minimum,
        PayoffPlan::QuickestWins,
        PayoffPlan::GreatestSavings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PayoffPlan::Minimum => "Minimum",
            PayoffPlan::QuickestWins => "QuickestWins",
            PayoffPlan::GreatestSavings => "GreatestSavings",
        }
    }

    pub fn display_text(self) -> &'static str {
        match self {
            PayoffPlan::Minimum => "Bare Minimum",
            PayoffPlan::QuickestWins => "Quickest Wins",
            PayoffPlan::GreatestSavings => "Greatest Savings",
        }
    }

    pub fn sort_key(self) -> SortKey {
        match self {
            PayoffPlan::Minimum => SortKey::PayoffOrder,
            PayoffPlan::QuickestWins => SortKey::Balance,
            PayoffPlan::GreatestSavings => SortKey::InterestRate,
        }
    }

    pub fn sort_direction(self) -> SortDirection {
        match self {
            PayoffPlan::Minimum | PayoffPlan::QuickestWins => SortDirection::Ascending,
            PayoffPlan::GreatestSavings => SortDirection::Descending,
        }
    }

    pub fn enable_rolling_payments(self) -> bool {
        !matches!(self, PayoffPlan::Minimum)
    }

    /// Unknown names select `Minimum`.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for PayoffPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PayoffPlan {
    type Err = DebtPayoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "minimum" | "bareminimum" => Ok(PayoffPlan::Minimum),
            "quickestwins" | "snowball" => Ok(PayoffPlan::QuickestWins),
            "greatestsavings" | "avalanche" => Ok(PayoffPlan::GreatestSavings),
            _ => Err(DebtPayoffError::InvalidInput {
                field: "plan".into(),
                reason: format!("Unknown payoff plan '{s}'"),
            }),
        }
    }
}
