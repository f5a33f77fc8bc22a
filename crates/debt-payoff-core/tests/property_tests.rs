use debt_payoff_core::amortization::build_amortization;
use debt_payoff_core::calendar::YearMonth;
use debt_payoff_core::schedule::{build_schedule, ScheduleConfig};
use debt_payoff_core::{periodic_rate, round_cents, Debt, DebtInput};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn start() -> YearMonth {
    YearMonth::new(2017, 1).unwrap()
}

/// (balance in cents, rate in basis points, payment margin over first
/// interest in cents, creation offset in months)
fn debt_strategy() -> impl Strategy<Value = (i64, i64, i64, i32)> {
    (10_000i64..2_000_000, 0i64..2_500, 500i64..60_000, 0i32..6)
}

fn make_debt(index: usize, (cents, bps, margin, offset): (i64, i64, i64, i32)) -> Debt {
    let balance = Decimal::new(cents, 2);
    let rate = Decimal::new(bps, 4);
    let minimum = round_cents(balance * periodic_rate(rate)) + Decimal::new(margin, 2);
    let input = DebtInput::new(format!("debt-{index}"), start().add_months(offset), balance, rate)
        .with_minimum_payment(minimum);
    Debt::from_input(input, index as u32 + 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn single_debt_principal_sums_to_balance(shape in debt_strategy()) {
        let debt = make_debt(0, shape);
        let table = build_amortization(
            debt.balance,
            debt.interest_rate,
            debt.minimum_payment,
            debt.debt_life,
        ).unwrap();

        prop_assert_eq!(table.totals.principal, debt.balance);
        prop_assert_eq!(table.payments.last().unwrap().ending_balance, Decimal::ZERO);
        prop_assert_eq!(table.totals.interest, debt.interest);
    }

    #[test]
    fn schedule_rows_stay_consistent(
        shapes in prop::collection::vec(debt_strategy(), 1..5),
        rolling in any::<bool>(),
        extra_cents in 0i64..20_000,
    ) {
        let debts: Vec<Debt> = shapes.into_iter().enumerate().map(|(i, s)| make_debt(i, s)).collect();
        let config = ScheduleConfig::new(rolling, Decimal::new(extra_cents, 2), start());
        let schedule = build_schedule(&debts, &config).unwrap();

        for row in &schedule.amortization.payments {
            prop_assert_eq!(row.ending_balance, row.beginning_balance - (row.principal + row.extra_payment));
            prop_assert!(row.ending_balance >= Decimal::ZERO);
        }

        for per_debt in &schedule.debts {
            let rows = &per_debt.amortization.payments;
            let debt = &debts[per_debt.index];
            let repaid: Decimal = rows.iter().map(|r| r.principal + r.extra_payment).sum();
            prop_assert_eq!(repaid, debt.balance);
            prop_assert_eq!(rows.last().unwrap().ending_balance, Decimal::ZERO);
            for pair in rows.windows(2) {
                prop_assert_eq!(pair[1].beginning_balance, pair[0].ending_balance);
            }
            for row in rows {
                prop_assert_eq!(row.ending_balance, row.beginning_balance - (row.principal + row.extra_payment));
                prop_assert!(row.ending_balance >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn rolling_never_costs_more(
        shapes in prop::collection::vec(debt_strategy(), 1..5),
        extra_cents in 0i64..20_000,
    ) {
        let debts: Vec<Debt> = shapes.into_iter().enumerate().map(|(i, s)| make_debt(i, s)).collect();
        let extra = Decimal::new(extra_cents, 2);
        let plain = build_schedule(&debts, &ScheduleConfig::new(false, extra, start())).unwrap();
        let rolled = build_schedule(&debts, &ScheduleConfig::new(true, extra, start())).unwrap();

        prop_assert!(rolled.amortization.payments.len() <= plain.amortization.payments.len());
        prop_assert!(
            rolled.amortization.summary.actual_interest <= plain.amortization.summary.actual_interest
        );
    }
}
