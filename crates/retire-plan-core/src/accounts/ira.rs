use crate::accounts::{apply_ceiling, gross_up, AccountContext, AccountResult};
use crate::goals::principal_for_goal;
use crate::time_value::required_contribution;
use crate::types::{Money, Rate};
use crate::PlanResult;

/// Principal and uncapped contribution for an account whose withdrawals
/// must deliver `income_need` per year.
fn size_account(
    ctx: &AccountContext<'_>,
    income_need: Money,
    warnings: &mut Vec<String>,
) -> PlanResult<(Money, Money)> {
    let principal = principal_for_goal(
        ctx.goal,
        income_need,
        ctx.retirement_years,
        ctx.growth_rate,
        ctx.inflation_rate,
        ctx.policy,
        warnings,
    )?;
    let contribution = required_contribution(principal, ctx.growth_rate, ctx.accumulation_years)?;
    Ok((principal, contribution))
}

/// Effective ordinary-income rate on retirement withdrawals, assuming the
/// withdrawals are the retiree's only wages-like income.
pub(crate) fn withdrawal_tax_rate(ctx: &AccountContext<'_>) -> PlanResult<Rate> {
    let (_, rate) = ctx
        .tax_tables
        .post_tax_income(ctx.future_income, ctx.filing_status)?;
    Ok(rate)
}

/// Income need for a pre-tax account, grossed up so that after ordinary
/// income tax on withdrawal the retiree still nets `future_income`.
pub(crate) fn pre_tax_income_need(ctx: &AccountContext<'_>) -> PlanResult<(Money, Rate)> {
    let rate = withdrawal_tax_rate(ctx)?;
    let need = gross_up(ctx.future_income, rate, "traditional withdrawal")?;
    Ok((need, rate))
}

pub(crate) fn size_pre_tax_account(
    ctx: &AccountContext<'_>,
    warnings: &mut Vec<String>,
) -> PlanResult<(Money, Money, Rate)> {
    let (need, rate) = pre_tax_income_need(ctx)?;
    let (principal, contribution) = size_account(ctx, need, warnings)?;
    Ok((principal, contribution, rate))
}

pub(crate) fn size_roth_account(
    ctx: &AccountContext<'_>,
    warnings: &mut Vec<String>,
) -> PlanResult<(Money, Money)> {
    size_account(ctx, ctx.future_income, warnings)
}

/// Traditional IRA: deductible contributions, withdrawals taxed as ordinary
/// income. The contribution is capped at the IRA ceiling.
pub fn analyze_traditional_ira(
    ctx: &AccountContext<'_>,
    contribution_limit: Money,
    warnings: &mut Vec<String>,
) -> PlanResult<AccountResult> {
    let (principal, required, rate) = size_pre_tax_account(ctx, warnings)?;
    let (capped, exceeded) = apply_ceiling(required, contribution_limit);

    let mut result = AccountResult::new(principal, capped);
    result.required_contribution = Some(required);
    result.withdrawal_tax_rate = Some(rate);
    result.contribution_limit_exceeded = Some(exceeded);
    Ok(result)
}

/// Roth IRA: after-tax contributions, qualified withdrawals untaxed.
/// The contribution is capped at the IRA ceiling.
pub fn analyze_roth_ira(
    ctx: &AccountContext<'_>,
    contribution_limit: Money,
    warnings: &mut Vec<String>,
) -> PlanResult<AccountResult> {
    let (principal, required) = size_roth_account(ctx, warnings)?;
    let (capped, exceeded) = apply_ceiling(required, contribution_limit);

    let mut result = AccountResult::new(principal, capped);
    result.required_contribution = Some(required);
    result.contribution_limit_exceeded = Some(exceeded);
    Ok(result)
}
