use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::debt::Debt;
use crate::error::DebtPayoffError;

/// Numeric debt field a portfolio can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PayoffOrder,
    Balance,
    InterestRate,
    MinimumPayment,
    DebtLife,
    /// Expected interest at the minimum payment.
    Interest,
}

impl SortKey {
    fn value(self, debt: &Debt) -> Decimal {
        match self {
            SortKey::PayoffOrder => Decimal::from(debt.payoff_order),
            SortKey::Balance => debt.balance,
            SortKey::InterestRate => debt.interest_rate,
            SortKey::MinimumPayment => debt.minimum_payment,
            SortKey::DebtLife => debt.debt_life,
            SortKey::Interest => debt.interest,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortKey::PayoffOrder => "payoff_order",
            SortKey::Balance => "balance",
            SortKey::InterestRate => "interest_rate",
            SortKey::MinimumPayment => "minimum_payment",
            SortKey::DebtLife => "debt_life",
            SortKey::Interest => "interest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = DebtPayoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payoff_order" | "payoffOrder" => Ok(SortKey::PayoffOrder),
            "balance" => Ok(SortKey::Balance),
            "interest_rate" | "interestRate" => Ok(SortKey::InterestRate),
            "minimum_payment" | "minimumPayment" => Ok(SortKey::MinimumPayment),
            "debt_life" | "debtLife" => Ok(SortKey::DebtLife),
            "interest" => Ok(SortKey::Interest),
            other => Err(DebtPayoffError::InvalidInput {
                field: "sort_key".into(),
                reason: format!("Unknown sort key '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Falls back to payoff order, whatever the key.
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Cycle none -> ascending -> descending -> none.
    pub fn next(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::None,
        }
    }
}

impl FromStr for SortDirection {
    type Err = DebtPayoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SortDirection::None),
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(DebtPayoffError::InvalidInput {
                field: "sort_direction".into(),
                reason: format!("Unknown sort direction '{other}'"),
            }),
        }
    }
}

/// Compare two debts the way `sort_debts` orders them.
pub fn compare_debts(a: &Debt, b: &Debt, key: SortKey, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => key.value(a).cmp(&key.value(b)),
        SortDirection::Descending => key.value(b).cmp(&key.value(a)),
        SortDirection::None => a.payoff_order.cmp(&b.payoff_order),
    }
}

/// Stable in-place sort; equal debts keep their current relative order.
pub fn sort_debts(debts: &mut [Debt], key: SortKey, direction: SortDirection) {
    debts.sort_by(|a, b| compare_debts(a, b, key, direction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::DebtInput;
    use rust_decimal_macros::dec;

    fn debt(name: &str, balance: Decimal, rate: Decimal, order: u32) -> Debt {
        let input = DebtInput::new(name, "2017-01".parse().unwrap(), balance, rate)
            .with_minimum_payment(dec!(500))
            .with_payoff_order(order);
        Debt::from_input(input, order).unwrap()
    }

    fn names(debts: &[Debt]) -> Vec<&str> {
        debts.iter().map(|d| d.name.as_str()).collect()
    }

    fn sample() -> Vec<Debt> {
        vec![
            debt("c", dec!(5700), dec!(0.12), 3),
            debt("a", dec!(1200), dec!(0.085), 1),
            debt("b", dec!(3000), dec!(0), 2),
        ]
    }

    #[test]
    fn test_ascending_balance() {
        let mut debts = sample();
        sort_debts(&mut debts, SortKey::Balance, SortDirection::Ascending);
        assert_eq!(names(&debts), ["a", "b", "c"]);
    }

    #[test]
    fn test_descending_rate() {
        let mut debts = sample();
        sort_debts(&mut debts, SortKey::InterestRate, SortDirection::Descending);
        assert_eq!(names(&debts), ["c", "a", "b"]);
    }

    #[test]
    fn test_none_direction_uses_payoff_order() {
        let mut debts = sample();
        sort_debts(&mut debts, SortKey::Balance, SortDirection::Ascending);
        sort_debts(&mut debts, SortKey::InterestRate, SortDirection::None);
        assert_eq!(names(&debts), ["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut debts = vec![
            debt("first", dec!(1000), dec!(0.1), 2),
            debt("second", dec!(1000), dec!(0.2), 1),
            debt("third", dec!(500), dec!(0.1), 3),
        ];
        sort_debts(&mut debts, SortKey::Balance, SortDirection::Descending);
        assert_eq!(names(&debts), ["first", "second", "third"]);
    }

    #[test]
    fn test_direction_cycle_and_parse() {
        assert_eq!(SortDirection::None.next(), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.next(), SortDirection::None);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("interestRate".parse::<SortKey>().unwrap(), SortKey::InterestRate);
        assert!("color".parse::<SortKey>().is_err());
    }
}
