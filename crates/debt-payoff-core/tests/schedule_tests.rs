use debt_payoff_core::calendar::YearMonth;
use debt_payoff_core::payoff::PayoffPlan;
use debt_payoff_core::schedule::{build_schedule, ScheduleConfig};
use debt_payoff_core::{Debt, DebtInput, DebtPayoffError, DebtPortfolio};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ym(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn three_debts() -> DebtPortfolio {
    DebtPortfolio::from_inputs(vec![
        DebtInput::new("American Express", ym("2017-01"), dec!(5700), dec!(0.12))
            .with_minimum_payment(dec!(102)),
        DebtInput::new("Medical Bill", ym("2017-01"), dec!(3000), Decimal::ZERO)
            .with_minimum_payment(dec!(250)),
        DebtInput::new("Home Depot", ym("2017-01"), dec!(1200), dec!(0.085))
            .with_minimum_payment(dec!(54)),
    ])
    .unwrap()
}

fn toyota() -> Debt {
    let input: DebtInput = serde_json::from_str(
        r#"{
            "name": "Toyota",
            "created": "2017-11",
            "balance": "17800",
            "interest_rate": "0.15",
            "minimum_payment": "617.05",
            "extra_principal_payments": { "2017-12": "100", "2018-02": "125" }
        }"#,
    )
    .unwrap();
    Debt::from_input(input, 1).unwrap()
}

fn config(rolling: bool, extra: Decimal) -> ScheduleConfig {
    ScheduleConfig::new(rolling, extra, ym("2017-01"))
}

// ===========================================================================
// Plans over the three sample debts
// ===========================================================================

#[test]
fn test_quickest_wins_rolls_into_smallest_balance_first() {
    let mut minimum = three_debts();
    minimum.apply_plan(PayoffPlan::Minimum);
    let baseline = minimum
        .build_amortizations(&config(false, Decimal::ZERO))
        .unwrap()
        .clone();
    assert_eq!(baseline.payments.len(), 83);

    let mut quickest = three_debts();
    let rolling = quickest.apply_plan(PayoffPlan::QuickestWins);
    assert!(rolling);
    let order: Vec<&str> = quickest.debts().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(order, ["Home Depot", "Medical Bill", "American Express"]);

    let aggregate = quickest
        .build_amortizations(&config(rolling, Decimal::ZERO))
        .unwrap()
        .clone();
    assert!(aggregate.payments.len() <= baseline.payments.len());
    assert!(aggregate.summary.actual_interest <= baseline.summary.actual_interest);

    // Medical Bill is retired in month 12; its 250 goes to Home Depot in month 13.
    let home_depot = quickest.debt("Home Depot").unwrap().amortization.as_ref().unwrap();
    let amex = quickest.debt("American Express").unwrap().amortization.as_ref().unwrap();
    assert_eq!(home_depot.payments[11].extra_payment, Decimal::ZERO);
    assert_eq!(home_depot.payments[12].extra_payment, dec!(250));
    assert_eq!(amex.payments[12].extra_payment, Decimal::ZERO);
}

#[test]
fn test_greatest_savings_beats_minimum() {
    let mut portfolio = three_debts();
    let rolling = portfolio.apply_plan(PayoffPlan::GreatestSavings);
    let aggregate = portfolio
        .build_amortizations(&config(rolling, Decimal::ZERO))
        .unwrap();
    assert!(aggregate.summary.interest_savings() > Decimal::ZERO);
    assert!(aggregate.summary.months_saved() > 0);
    assert_eq!(aggregate.summary.expected_interest, dec!(2798.86));
}

#[test]
fn test_aggregate_interest_is_sum_of_debts() {
    let mut portfolio = three_debts();
    portfolio.apply_plan(PayoffPlan::QuickestWins);
    let total = portfolio
        .build_amortizations(&config(true, dec!(75)))
        .unwrap()
        .summary
        .actual_interest;
    let per_debt: Decimal = portfolio
        .debts()
        .iter()
        .filter_map(|d| d.amortization.as_ref())
        .map(|a| a.summary.actual_interest)
        .sum();
    assert_eq!(total, per_debt);
}

#[test]
fn test_payment_capacity_includes_top_up() {
    let mut portfolio = three_debts();
    let summary = &portfolio
        .build_amortizations(&config(false, dec!(100)))
        .unwrap()
        .summary;
    assert_eq!(summary.total_debt, dec!(9900));
    assert_eq!(summary.total_payment, dec!(506));
}

// ===========================================================================
// Scheduled extra principal
// ===========================================================================

#[test]
fn test_scheduled_extras_land_in_their_month() {
    let debts = vec![toyota()];
    let cfg = ScheduleConfig::new(false, Decimal::ZERO, ym("2017-11"));
    let schedule = build_schedule(&debts, &cfg).unwrap();
    let rows = &schedule.debts[0].amortization.payments;

    assert_eq!(rows[0].payment_date, Some(ym("2017-11")));
    assert_eq!(rows[0].extra_payment, Decimal::ZERO);
    assert_eq!(rows[1].extra_payment, dec!(100));
    assert_eq!(rows[2].extra_payment, Decimal::ZERO);
    assert_eq!(rows[3].extra_payment, dec!(125));

    let mut without = toyota();
    without.extra_principal_payments.clear();
    let plain = build_schedule(&[without], &cfg).unwrap();
    assert!(
        schedule.amortization.summary.actual_interest < plain.amortization.summary.actual_interest
    );
}

#[test]
fn test_schedule_starts_at_earliest_creation_month() {
    let mut portfolio = three_debts();
    portfolio.add(toyota()).unwrap();
    let aggregate = portfolio
        .build_amortizations(&config(false, Decimal::ZERO))
        .unwrap();
    assert_eq!(aggregate.payments[0].payment_date, Some(ym("2017-01")));
    assert_eq!(aggregate.payments[0].debt_count, 3);
    // 2017-11 is the eleventh month.
    assert_eq!(aggregate.payments[10].debt_count, 4);
}

// ===========================================================================
// This-month snapshot
// ===========================================================================

#[test]
fn test_this_month_before_schedule_reports_everything_remaining() {
    let mut portfolio = three_debts();
    let cfg = ScheduleConfig::new(false, Decimal::ZERO, ym("2016-06"));
    let summary = &portfolio.build_amortizations(&cfg).unwrap().summary;
    assert_eq!(summary.current_payment_number, None);
    assert_eq!(summary.remaining_balance, dec!(9900));
    assert_eq!(summary.remaining_life, summary.actual_debt_life);
    assert_eq!(summary.remaining_debts, 3);
}

#[test]
fn test_this_month_mid_schedule() {
    let mut portfolio = three_debts();
    let cfg = ScheduleConfig::new(false, Decimal::ZERO, ym("2018-01"));
    let aggregate = portfolio.build_amortizations(&cfg).unwrap().clone();
    let summary = &aggregate.summary;
    assert_eq!(summary.current_payment_number, Some(13));
    // Medical Bill finished in December.
    assert_eq!(summary.remaining_debts, 2);
    assert_eq!(summary.remaining_life, 83 - 13);
    assert_eq!(summary.remaining_balance, aggregate.payments[12].beginning_balance);

    let medical = portfolio.debt("Medical Bill").unwrap().amortization.as_ref().unwrap();
    assert_eq!(medical.summary.remaining_balance, Decimal::ZERO);
    assert_eq!(medical.summary.remaining_debts, 0);
}

#[test]
fn test_negative_top_up_is_rejected() {
    let mut portfolio = three_debts();
    assert!(matches!(
        portfolio.build_amortizations(&config(true, dec!(-10))),
        Err(DebtPayoffError::InvalidInput { .. })
    ));
}
