use rust_decimal::Decimal;

use crate::accounts::{AccountContext, AccountResult};
use crate::error::PlanError;
use crate::goals::principal_for_goal;
use crate::time_value::required_contribution;
use crate::types::Rate;
use crate::PlanResult;

/// Taxable brokerage account.
///
/// Withdrawals are funded from after-tax principal, but growth is dragged
/// down by taxes on gains: the goal formula sees `growth * (1 - drag)`.
/// Contributions are sized at the full growth rate.
pub fn analyze_brokerage(
    ctx: &AccountContext<'_>,
    capital_gains_drag: Rate,
    warnings: &mut Vec<String>,
) -> PlanResult<AccountResult> {
    if capital_gains_drag < Decimal::ZERO || capital_gains_drag >= Decimal::ONE {
        return Err(PlanError::InvalidInput {
            field: "capital_gains_drag".into(),
            reason: "must be in [0, 1)".into(),
        });
    }
    let effective_growth = ctx.growth_rate * (Decimal::ONE - capital_gains_drag);

    let principal = principal_for_goal(
        ctx.goal,
        ctx.future_income,
        ctx.retirement_years,
        effective_growth,
        ctx.inflation_rate,
        ctx.policy,
        warnings,
    )?;
    let contribution = required_contribution(principal, ctx.growth_rate, ctx.accumulation_years)?;

    let mut result = AccountResult::new(principal, contribution);
    result.effective_growth_rate = Some(effective_growth);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::GoalPolicy;
    use crate::goals::{sustainable_principal, FinancialGoal};
    use crate::tax::{FilingStatus, TaxTables};
    use rust_decimal_macros::dec;

    fn ctx<'a>(policy: &'a GoalPolicy, tables: &'a TaxTables) -> AccountContext<'a> {
        AccountContext {
            future_income: dec!(150000),
            growth_rate: dec!(0.08),
            inflation_rate: dec!(0.03),
            accumulation_years: 30,
            retirement_years: 30,
            goal: FinancialGoal::Sustainable,
            filing_status: FilingStatus::Single,
            policy,
            tax_tables: tables,
        }
    }

    #[test]
    fn test_principal_uses_dragged_growth() {
        let policy = GoalPolicy::default();
        let tables = TaxTables::default();
        let mut warnings = Vec::new();
        let result = analyze_brokerage(&ctx(&policy, &tables), dec!(0.15), &mut warnings).unwrap();

        assert_eq!(result.effective_growth_rate, Some(dec!(0.068)));
        let expected = sustainable_principal(dec!(150000), 30, dec!(0.068), dec!(0.03)).unwrap();
        assert_eq!(result.principal_required, expected);
    }

    #[test]
    fn test_contribution_sized_at_full_growth() {
        let policy = GoalPolicy::default();
        let tables = TaxTables::default();
        let mut warnings = Vec::new();
        let result = analyze_brokerage(&ctx(&policy, &tables), dec!(0.15), &mut warnings).unwrap();

        let expected = required_contribution(result.principal_required, dec!(0.08), 30).unwrap();
        assert_eq!(result.yearly_contribution, expected);
        assert!(result.contribution_limit_exceeded.is_none());
    }

    #[test]
    fn test_drag_needs_more_principal_than_untaxed() {
        let policy = GoalPolicy::default();
        let tables = TaxTables::default();
        let mut warnings = Vec::new();
        let dragged =
            analyze_brokerage(&ctx(&policy, &tables), dec!(0.15), &mut warnings).unwrap();
        let undragged =
            analyze_brokerage(&ctx(&policy, &tables), Decimal::ZERO, &mut warnings).unwrap();
        assert!(dragged.principal_required > undragged.principal_required);
    }

    #[test]
    fn test_drag_pushing_growth_below_inflation_is_rate_error() {
        let policy = GoalPolicy::default();
        let tables = TaxTables::default();
        let mut c = ctx(&policy, &tables);
        c.growth_rate = dec!(0.034);
        let mut warnings = Vec::new();
        assert!(matches!(
            analyze_brokerage(&c, dec!(0.15), &mut warnings),
            Err(PlanError::RateOrdering { .. })
        ));
    }

    #[test]
    fn test_full_drag_rejected() {
        let policy = GoalPolicy::default();
        let tables = TaxTables::default();
        let mut warnings = Vec::new();
        assert!(analyze_brokerage(&ctx(&policy, &tables), Decimal::ONE, &mut warnings).is_err());
    }
}
