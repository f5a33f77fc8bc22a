use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::amortization::single::require_within;
use crate::amortization::{Amortization, MAX_AMOUNT};
use crate::calendar::YearMonth;
use crate::debt::{Debt, DebtInput};
use crate::error::DebtPayoffError;
use crate::payoff::{sort_debts, PayoffPlan, SortDirection, SortKey};
use crate::schedule::{build_schedule, ScheduleConfig};
use crate::types::Money;
use crate::DebtPayoffResult;

/// Aggregate schedule together with the inputs it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CachedAmortization {
    key: ScheduleConfig,
    amortization: Amortization,
}

/// An ordered collection of debts and its last computed schedule.
///
/// Every mutation goes through `&mut self` and drops the cached schedule;
/// take a snapshot with `clone()` before mutating if the old state is
/// still needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtPortfolio {
    debts: Vec<Debt>,
    #[serde(skip)]
    cache: Option<CachedAmortization>,
}

impl DebtPortfolio {
    pub fn new(debts: Vec<Debt>) -> DebtPayoffResult<Self> {
        let mut seen = HashSet::new();
        for debt in &debts {
            debt.validate()?;
            if !seen.insert(debt.name.as_str()) {
                return Err(DebtPayoffError::DuplicateDebt(debt.name.clone()));
            }
        }
        Ok(Self { debts, cache: None })
    }

    /// Build from construction records; a missing payoff order defaults to
    /// the record's 1-based position.
    pub fn from_inputs(inputs: Vec<DebtInput>) -> DebtPayoffResult<Self> {
        let debts = inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| Debt::from_input(input, i as u32 + 1))
            .collect::<DebtPayoffResult<Vec<_>>>()?;
        Self::new(debts)
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn debt(&self, name: &str) -> Option<&Debt> {
        self.debts.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn included_count(&self) -> usize {
        self.debts.iter().filter(|d| d.included).count()
    }

    pub fn add(&mut self, debt: Debt) -> DebtPayoffResult<()> {
        debt.validate()?;
        if self.debt(&debt.name).is_some() {
            return Err(DebtPayoffError::DuplicateDebt(debt.name));
        }
        self.debts.push(debt);
        self.invalidate();
        Ok(())
    }

    /// Resolve and append a construction record, defaulting its payoff
    /// order to the end of the list.
    pub fn add_input(&mut self, input: DebtInput) -> DebtPayoffResult<()> {
        let debt = Debt::from_input(input, self.debts.len() as u32 + 1)?;
        self.add(debt)
    }

    /// Flip a debt's included flag and return the new value.
    pub fn toggle_include(&mut self, name: &str) -> DebtPayoffResult<bool> {
        let debt = self.debt_mut(name)?;
        debt.included = !debt.included;
        let included = debt.included;
        self.invalidate();
        Ok(included)
    }

    /// Set the extra principal paid on `name` in `month`. A zero amount
    /// clears the entry.
    pub fn add_extra_principal_payment(
        &mut self,
        name: &str,
        month: YearMonth,
        amount: Money,
    ) -> DebtPayoffResult<()> {
        if amount < Decimal::ZERO {
            return Err(DebtPayoffError::InvalidInput {
                field: "amount".into(),
                reason: "Extra principal payment must not be negative".into(),
            });
        }
        require_within("amount", amount, MAX_AMOUNT)?;
        let debt = self.debt_mut(name)?;
        if amount.is_zero() {
            debt.extra_principal_payments.remove(&month);
        } else {
            debt.extra_principal_payments.insert(month, amount);
        }
        self.invalidate();
        Ok(())
    }

    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        sort_debts(&mut self.debts, key, direction);
        self.invalidate();
    }

    /// Order the debts for `plan` and return the matching rolling flag.
    pub fn apply_plan(&mut self, plan: PayoffPlan) -> bool {
        self.sort(plan.sort_key(), plan.sort_direction());
        plan.enable_rolling_payments()
    }

    /// Schedule all included debts, store each debt's own schedule on it
    /// and cache the aggregate.
    pub fn build_amortizations(&mut self, config: &ScheduleConfig) -> DebtPayoffResult<&Amortization> {
        let schedule = build_schedule(&self.debts, config)?;

        for debt in &mut self.debts {
            debt.amortization = None;
        }
        for debt_schedule in schedule.debts {
            self.debts[debt_schedule.index].amortization = Some(debt_schedule.amortization);
        }

        info!(
            debts = self.included_count(),
            months = schedule.amortization.summary.actual_debt_life,
            rolling = config.enable_rolling_payments,
            extra = %config.extra_principal_payment,
            "rebuilt portfolio amortization"
        );

        let cache = self.cache.insert(CachedAmortization {
            key: config.clone(),
            amortization: schedule.amortization,
        });
        Ok(&cache.amortization)
    }

    /// Cached aggregate schedule, or one debt's schedule when `debt_filter`
    /// names it. Rebuilds when nothing is cached or the config differs.
    pub fn get_amortization(
        &mut self,
        config: &ScheduleConfig,
        debt_filter: Option<&str>,
    ) -> DebtPayoffResult<&Amortization> {
        let stale = self.cache.as_ref().map_or(true, |c| c.key != *config);
        if stale {
            self.build_amortizations(config)?;
        }

        match debt_filter {
            Some(name) => {
                let debt = self
                    .debt(name)
                    .ok_or_else(|| DebtPayoffError::DebtNotFound(name.to_string()))?;
                debt.amortization
                    .as_ref()
                    .ok_or_else(|| DebtPayoffError::InvalidInput {
                        field: "debt_filter".into(),
                        reason: format!("Debt '{name}' is excluded from the schedule"),
                    })
            }
            None => self
                .cache
                .as_ref()
                .map(|c| &c.amortization)
                .ok_or_else(|| DebtPayoffError::InvalidInput {
                    field: "amortization".into(),
                    reason: "No amortization has been built".into(),
                }),
        }
    }

    /// Last built aggregate schedule, if still valid.
    pub fn amortization(&self) -> Option<&Amortization> {
        self.cache.as_ref().map(|c| &c.amortization)
    }

    pub fn into_debts(self) -> Vec<Debt> {
        self.debts
    }

    fn debt_mut(&mut self, name: &str) -> DebtPayoffResult<&mut Debt> {
        self.debts
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| DebtPayoffError::DebtNotFound(name.to_string()))
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}
