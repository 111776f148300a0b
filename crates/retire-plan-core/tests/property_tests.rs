use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use retire_plan_core::accounts::AccountType;
use retire_plan_core::assumptions::GoalPolicy;
use retire_plan_core::goals::{generational_principal, sustainable_principal};
use retire_plan_core::planner::{analyze_retirement_options, ScenarioInputs};
use retire_plan_core::tax::{post_tax_income, FilingStatus};
use retire_plan_core::time_value::{future_value_of_contributions, required_contribution};
use rust_decimal::Decimal;

fn bp(value: u32) -> Decimal {
    Decimal::from(value) / Decimal::from(10_000)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_contribution_and_future_value_are_inverses(
        target in 1u32..10_000_000,
        rate_bp in 1u32..2_000,
        years in 1u32..60
    ) {
        let target = Decimal::from(target);
        let rate = bp(rate_bp);
        let contribution = required_contribution(target, rate, years).unwrap();
        let rebuilt = future_value_of_contributions(rate, years, contribution).unwrap();
        prop_assert!((rebuilt - target).abs() < Decimal::new(1, 6), "{rebuilt} vs {target}");
    }

    #[test]
    fn prop_post_tax_income_bounded(
        gross in 0u32..5_000_000,
        status_index in 0usize..4
    ) {
        let status = FilingStatus::ALL[status_index];
        let gross = Decimal::from(gross);
        let (net, rate) = post_tax_income(gross, status).unwrap();
        prop_assert!(net <= gross);
        prop_assert!(rate >= Decimal::ZERO);
        prop_assert!(rate < Decimal::ONE);
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    #[test]
    fn prop_sustainable_never_exceeds_generational(
        income in 1_000u32..500_000,
        inflation_bp in 0u32..600,
        spread_bp in 50u32..1_000,
        duration in 1u32..120
    ) {
        let income = Decimal::from(income);
        let inflation = bp(inflation_bp);
        let growth = inflation + bp(spread_bp);
        let mut warnings = Vec::new();

        let sustainable = sustainable_principal(income, duration, growth, inflation).unwrap();
        let longer = sustainable_principal(income, duration + 1, growth, inflation).unwrap();
        let generational =
            generational_principal(income, growth, inflation, &GoalPolicy::default(), &mut warnings)
                .unwrap();

        prop_assert!(sustainable > Decimal::ZERO);
        prop_assert!(sustainable < longer);
        prop_assert!(longer < generational);
    }

    #[test]
    fn prop_401k_totals_are_additive(
        income in 10_000u32..400_000,
        growth_bp in 600u32..1_500,
        inflation_bp in 0u32..400,
        match_bp in 0u32..10_000,
        accumulation in 1u32..45,
        retirement in 1u32..45
    ) {
        let mut scenario = ScenarioInputs::new(
            Decimal::from(income),
            bp(growth_bp),
            accumulation,
            retirement,
        );
        scenario.inflation_rate = bp(inflation_bp);
        scenario.employer_match = bp(match_bp);

        let out = analyze_retirement_options(&scenario).unwrap();
        let traditional = out.result.account(AccountType::Traditional401k).unwrap();
        prop_assert_eq!(
            traditional.employee_contribution.unwrap() + traditional.employer_contribution.unwrap(),
            traditional.total_contribution.unwrap()
        );
        let roth = out.result.account(AccountType::Roth401k).unwrap();
        prop_assert_eq!(
            roth.employee_contribution_after_tax.unwrap()
                + roth.employer_contribution_traditional.unwrap(),
            roth.total_contribution.unwrap()
        );
        prop_assert!(roth.yearly_contribution <= scenario.contribution_limit_401k);
    }
}
