use rust_decimal::Decimal;

use crate::accounts::ira::{size_pre_tax_account, size_roth_account};
use crate::accounts::{apply_ceiling, gross_up, AccountContext, AccountResult, LimitStatus};
use crate::error::PlanError;
use crate::types::{Money, Rate};
use crate::PlanResult;

/// Employee/employer split of a 401(k) contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MatchSplit {
    employee: Money,
    employer: Money,
    total: Money,
    exceeded: LimitStatus,
}

/// The employee defers `required * (1 - match)`, capped at the plan
/// ceiling; the employer adds `match` times whatever the employee defers.
/// The limit flag compares the full required contribution with the ceiling.
fn split_with_match(required: Money, employer_match: Rate, ceiling: Money) -> PlanResult<MatchSplit> {
    if employer_match < Decimal::ZERO || employer_match > Decimal::ONE {
        return Err(PlanError::InvalidInput {
            field: "employer_match".into(),
            reason: "must be between 0 and 1".into(),
        });
    }
    let employee_required = required * (Decimal::ONE - employer_match);
    let (employee, _) = apply_ceiling(employee_required, ceiling);
    let exceeded = LimitStatus::from(required > ceiling);
    let employer = employee * employer_match;
    Ok(MatchSplit {
        employee,
        employer,
        total: employee + employer,
        exceeded,
    })
}

/// Traditional 401(k): pre-tax deferrals, withdrawals taxed as ordinary income.
pub fn analyze_traditional_401k(
    ctx: &AccountContext<'_>,
    contribution_limit: Money,
    employer_match: Rate,
    warnings: &mut Vec<String>,
) -> PlanResult<AccountResult> {
    let (principal, required, rate) = size_pre_tax_account(ctx, warnings)?;
    let split = split_with_match(required, employer_match, contribution_limit)?;

    let mut result = AccountResult::new(principal, split.employee);
    result.required_contribution = Some(required);
    result.withdrawal_tax_rate = Some(rate);
    result.employee_contribution = Some(split.employee);
    result.employer_contribution = Some(split.employer);
    result.total_contribution = Some(split.total);
    result.contribution_limit_exceeded = Some(split.exceeded);
    Ok(result)
}

/// Roth 401(k): after-tax deferrals, qualified withdrawals untaxed.
///
/// Deferrals come out of taxed pay, so the employee's pre-tax cost is the
/// deferral grossed up at `current_effective_rate`. The employer match is
/// booked to a traditional sub-account.
pub fn analyze_roth_401k(
    ctx: &AccountContext<'_>,
    contribution_limit: Money,
    employer_match: Rate,
    current_effective_rate: Rate,
    warnings: &mut Vec<String>,
) -> PlanResult<AccountResult> {
    let (principal, required) = size_roth_account(ctx, warnings)?;
    let split = split_with_match(required, employer_match, contribution_limit)?;
    let pre_tax_cost = gross_up(split.employee, current_effective_rate, "Roth 401k deferral")?;

    let mut result = AccountResult::new(principal, split.employee);
    result.required_contribution = Some(required);
    result.employee_contribution_after_tax = Some(split.employee);
    result.employer_contribution_traditional = Some(split.employer);
    result.total_contribution = Some(split.total);
    result.effective_pre_tax_cost = Some(pre_tax_cost);
    result.contribution_limit_exceeded = Some(split.exceeded);
    Ok(result)
}
