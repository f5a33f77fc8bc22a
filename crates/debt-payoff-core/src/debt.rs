use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amortization::single::{
    require_within, resolve_terms, total_interest, validate_amortizing, validate_debt_life,
    whole_months,
};
use crate::amortization::{Amortization, MAX_AMOUNT};
use crate::calendar::YearMonth;
use crate::error::DebtPayoffError;
use crate::types::{Money, Rate};
use crate::DebtPayoffResult;

/// A single debt in a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// Unique within a portfolio.
    pub name: String,
    /// First month the debt takes payments.
    pub created: YearMonth,
    pub balance: Money,
    /// Annual rate (0.12 = 12%).
    pub interest_rate: Rate,
    pub minimum_payment: Money,
    /// Months to retire the balance at the minimum payment, may be fractional.
    pub debt_life: Decimal,
    /// Interest over the life of the debt at the minimum payment.
    pub interest: Money,
    pub included: bool,
    pub payoff_order: u32,
    /// One-off principal paid on top of the minimum in a given month.
    #[serde(default)]
    pub extra_principal_payments: BTreeMap<YearMonth, Money>,
    /// Schedule from the last portfolio build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization: Option<Amortization>,
}

/// Construction record for a debt. Whatever is left out is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtInput {
    pub name: String,
    pub created: YearMonth,
    pub balance: Money,
    pub interest_rate: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_life: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<Money>,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payoff_order: Option<u32>,
    #[serde(default)]
    pub extra_principal_payments: BTreeMap<YearMonth, Money>,
}

fn default_included() -> bool {
    true
}

impl DebtInput {
    pub fn new(name: impl Into<String>, created: YearMonth, balance: Money, interest_rate: Rate) -> Self {
        Self {
            name: name.into(),
            created,
            balance,
            interest_rate,
            minimum_payment: None,
            debt_life: None,
            interest: None,
            included: true,
            payoff_order: None,
            extra_principal_payments: BTreeMap::new(),
        }
    }

    pub fn with_minimum_payment(mut self, minimum_payment: Money) -> Self {
        self.minimum_payment = Some(minimum_payment);
        self
    }

    pub fn with_debt_life(mut self, debt_life: Decimal) -> Self {
        self.debt_life = Some(debt_life);
        self
    }

    pub fn with_payoff_order(mut self, payoff_order: u32) -> Self {
        self.payoff_order = Some(payoff_order);
        self
    }

    pub fn excluded(mut self) -> Self {
        self.included = false;
        self
    }
}

impl Debt {
    /// Resolve missing terms and validate. `default_payoff_order` is used
    /// when the input carries none.
    pub fn from_input(input: DebtInput, default_payoff_order: u32) -> DebtPayoffResult<Self> {
        let (minimum_payment, debt_life) = resolve_terms(
            input.balance,
            input.interest_rate,
            input.minimum_payment,
            input.debt_life,
        )?;
        let interest = match input.interest {
            Some(interest) => interest,
            None => total_interest(input.balance, input.interest_rate, minimum_payment)?,
        };

        let debt = Debt {
            name: input.name,
            created: input.created,
            balance: input.balance,
            interest_rate: input.interest_rate,
            minimum_payment,
            debt_life,
            interest,
            included: input.included,
            payoff_order: input.payoff_order.unwrap_or(default_payoff_order),
            extra_principal_payments: input.extra_principal_payments,
            amortization: None,
        };
        debt.validate()?;
        Ok(debt)
    }

    /// Check the invariants the scheduler relies on.
    pub fn validate(&self) -> DebtPayoffResult<()> {
        if self.name.trim().is_empty() {
            return Err(DebtPayoffError::InvalidInput {
                field: "name".into(),
                reason: "Debt name must not be empty".into(),
            });
        }
        validate_debt_life(self.debt_life)?;
        require_within("interest", self.interest, MAX_AMOUNT)?;
        validate_amortizing(self.balance, self.interest_rate, self.minimum_payment).map_err(
            |e| match e {
                DebtPayoffError::FinancialImpossibility(reason) => {
                    DebtPayoffError::FinancialImpossibility(format!("{}: {reason}", self.name))
                }
                other => other,
            },
        )?;
        for (month, amount) in &self.extra_principal_payments {
            if *amount < Decimal::ZERO {
                return Err(DebtPayoffError::InvalidInput {
                    field: "extra_principal_payments".into(),
                    reason: format!("Negative extra payment for '{}' in {month}", self.name),
                });
            }
            require_within("extra_principal_payments", *amount, MAX_AMOUNT)?;
        }

        // The last payment month must still have a "YYYY-MM" form.
        let last_offset = whole_months(self.debt_life).saturating_sub(1) as i32;
        self.created
            .checked_add_months(last_offset)
            .map_err(|e| match e {
                DebtPayoffError::DateError(reason) => {
                    DebtPayoffError::DateError(format!("{}: {reason}", self.name))
                }
                other => other,
            })?;
        Ok(())
    }

    /// Scheduled extra principal for `month`, zero when none.
    pub fn extra_principal_for(&self, month: YearMonth) -> Money {
        self.extra_principal_payments
            .get(&month)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::round_cents;
    use rust_decimal_macros::dec;

    fn jan_2017() -> YearMonth {
        "2017-01".parse().unwrap()
    }

    #[test]
    fn test_from_input_derives_life_and_interest() {
        let input = DebtInput::new("Home Depot", jan_2017(), dec!(1200), dec!(0.085))
            .with_minimum_payment(dec!(54));
        let debt = Debt::from_input(input, 1).unwrap();
        assert!((debt.debt_life - dec!(24.265)).abs() < dec!(0.001));
        assert_eq!(debt.interest, dec!(110.38));
        assert_eq!(debt.payoff_order, 1);
        assert!(debt.included);
    }

    #[test]
    fn test_from_input_derives_payment_from_life() {
        let input = DebtInput::new("Medical Bill", jan_2017(), dec!(3000), Decimal::ZERO)
            .with_debt_life(dec!(12))
            .with_payoff_order(2);
        let debt = Debt::from_input(input, 9).unwrap();
        assert_eq!(debt.minimum_payment, dec!(250));
        assert_eq!(debt.interest, Decimal::ZERO);
        assert_eq!(debt.payoff_order, 2);
    }

    #[test]
    fn test_from_input_rejects_non_amortizing_payment() {
        let input = DebtInput::new("Card", jan_2017(), dec!(10000), dec!(0.24))
            .with_minimum_payment(dec!(150));
        assert!(matches!(
            Debt::from_input(input, 1),
            Err(DebtPayoffError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let input = DebtInput::new("  ", jan_2017(), dec!(100), dec!(0.1)).with_minimum_payment(dec!(10));
        assert!(Debt::from_input(input, 1).is_err());
    }

    #[test]
    fn test_negative_extra_payment_rejected() {
        let mut input = DebtInput::new("Car", jan_2017(), dec!(1000), dec!(0.1))
            .with_minimum_payment(dec!(100));
        input.extra_principal_payments.insert(jan_2017(), dec!(-5));
        assert!(Debt::from_input(input, 1).is_err());
    }

    #[test]
    fn test_from_input_derives_payment_from_life_at_a_positive_rate() {
        let input = DebtInput::new("Student Loan", jan_2017(), dec!(12500), dec!(0.08))
            .with_debt_life(dec!(120));
        let debt = Debt::from_input(input, 1).unwrap();
        assert_eq!(round_cents(debt.minimum_payment), dec!(151.66));
        assert_eq!(debt.debt_life, dec!(120));
        // About 120 payments of 151.66 against 12500 borrowed.
        assert!((debt.interest - dec!(5699.6)).abs() < dec!(5), "got {}", debt.interest);
    }

    #[test]
    fn test_oversized_debt_life_rejected() {
        let input = DebtInput::new("Home Depot", jan_2017(), dec!(1200), dec!(0.085))
            .with_minimum_payment(dec!(54))
            .with_debt_life(dec!(4000000000));
        assert!(matches!(
            Debt::from_input(input, 1),
            Err(DebtPayoffError::InvalidInput { ref field, .. }) if field == "debt_life"
        ));

        let mut debt = Debt::from_input(
            DebtInput::new("Home Depot", jan_2017(), dec!(1200), dec!(0.085)).with_minimum_payment(dec!(54)),
            1,
        )
        .unwrap();
        debt.debt_life = dec!(12001);
        assert!(debt.validate().is_err());
        debt.debt_life = dec!(-1);
        assert!(debt.validate().is_err());
    }

    #[test]
    fn test_extreme_balance_rejected() {
        let huge = Decimal::MAX / dec!(2) + Decimal::ONE;
        let input = DebtInput::new("Huge", jan_2017(), huge, Decimal::ZERO).with_minimum_payment(huge);
        assert!(matches!(
            Debt::from_input(input, 1),
            Err(DebtPayoffError::InvalidInput { ref field, .. }) if field == "balance"
        ));

        let mut input = DebtInput::new("Car", jan_2017(), dec!(1000), dec!(0.1))
            .with_minimum_payment(dec!(100));
        input.extra_principal_payments.insert(jan_2017(), MAX_AMOUNT + Decimal::ONE);
        assert!(Debt::from_input(input, 1).is_err());

        let mut input = DebtInput::new("Car", jan_2017(), dec!(1000), dec!(0.1))
            .with_minimum_payment(dec!(100));
        input.interest = Some(huge);
        assert!(Debt::from_input(input, 1).is_err());
    }

    #[test]
    fn test_payments_past_year_9999_rejected() {
        let last_month: YearMonth = "9999-12".parse().unwrap();
        let input = DebtInput::new("Late", last_month, dec!(300), Decimal::ZERO)
            .with_minimum_payment(dec!(100));
        assert!(matches!(
            Debt::from_input(input, 1),
            Err(DebtPayoffError::DateError(_))
        ));

        let input = DebtInput::new("Last Month", last_month, dec!(100), Decimal::ZERO)
            .with_minimum_payment(dec!(100));
        assert!(Debt::from_input(input, 1).is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "name": "Toyota",
            "created": "2017-11",
            "balance": "17800.00",
            "interest_rate": "0.15",
            "minimum_payment": "617.05",
            "extra_principal_payments": { "2017-12": "100.00", "2018-02": "125.00" }
        }"#;
        let input: DebtInput = serde_json::from_str(json).unwrap();
        assert!(input.included);
        assert_eq!(input.extra_principal_payments.len(), 2);

        let debt = Debt::from_input(input, 5).unwrap();
        assert_eq!(debt.extra_principal_for("2017-12".parse().unwrap()), dec!(100));
        assert_eq!(debt.extra_principal_for("2018-01".parse().unwrap()), Decimal::ZERO);
    }
}
