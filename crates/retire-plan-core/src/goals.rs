use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::assumptions::GoalPolicy;
use crate::error::PlanError;
use crate::time_value::compound;
use crate::types::{advise, Money, Rate, Years};
use crate::PlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Wealth-preservation goal for the retirement phase.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String")]
pub enum FinancialGoal {
    /// Savings fund only part of retirement income; the rest comes from
    /// other sources.
    Supplemented,
    /// The account is drawn down to zero over the retirement horizon.
    #[default]
    Sustainable,
    /// Inflation-adjusted withdrawals forever, principal preserved in real terms.
    Generational,
    /// As `Generational`, and the principal keeps growing in real terms.
    Nobility,
}

impl FinancialGoal {
    pub const ALL: [FinancialGoal; 4] = [
        FinancialGoal::Supplemented,
        FinancialGoal::Sustainable,
        FinancialGoal::Generational,
        FinancialGoal::Nobility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialGoal::Supplemented => "Supplemented",
            FinancialGoal::Sustainable => "Sustainable",
            FinancialGoal::Generational => "Generational",
            FinancialGoal::Nobility => "Nobility",
        }
    }
}

impl fmt::Display for FinancialGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialGoal {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FinancialGoal::ALL
            .into_iter()
            .find(|goal| goal.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlanError::InvalidInput {
                field: "goal".into(),
                reason: format!(
                    "unknown goal '{s}': must be one of Supplemented, Sustainable, Generational, Nobility"
                ),
            })
    }
}

/// Scenario files accept the same spellings as the command line.
impl TryFrom<String> for FinancialGoal {
    type Error = PlanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Principal formulas
// ---------------------------------------------------------------------------

fn require_real_return(context: &str, return_rate: Rate, inflation_rate: Rate) -> PlanResult<()> {
    if return_rate <= inflation_rate {
        return Err(PlanError::RateOrdering {
            context: context.into(),
            return_rate,
            inflation_rate,
        });
    }
    Ok(())
}

/// Finite-horizon growing annuity: the account is exhausted after
/// `retirement_duration` inflation-indexed withdrawals.
///
/// principal = income * (1 - ((1+i)/(1+r))^n) / (r - i)
pub fn sustainable_principal(
    desired_income: Money,
    retirement_duration: Years,
    return_rate: Rate,
    inflation_rate: Rate,
) -> PlanResult<Money> {
    require_real_return("Sustainable", return_rate, inflation_rate)?;
    let ratio = (Decimal::ONE + inflation_rate) / (Decimal::ONE + return_rate);
    // ratio^n
    let remaining = compound(ratio - Decimal::ONE, retirement_duration)?;
    Ok(desired_income * (Decimal::ONE - remaining) / (return_rate - inflation_rate))
}

/// Growing perpetuity: principal = income / (r - i).
///
/// A spread below `policy.precision_tolerance` is numerically unstable and
/// is reported as an advisory; the result is still returned.
pub fn generational_principal(
    desired_income: Money,
    return_rate: Rate,
    inflation_rate: Rate,
    policy: &GoalPolicy,
    warnings: &mut Vec<String>,
) -> PlanResult<Money> {
    require_real_return("Generational", return_rate, inflation_rate)?;
    let spread = return_rate - inflation_rate;
    if spread < policy.precision_tolerance {
        advise(
            warnings,
            format!(
                "Return rate {return_rate} is within {} of inflation {inflation_rate}; \
                 perpetuity principal is numerically unstable",
                policy.precision_tolerance
            ),
        );
    }
    Ok(desired_income / spread)
}

/// Perpetuity that also grows the principal by `policy.real_growth_increment`
/// in real terms: principal = income / (r - i - g).
///
/// When `r <= i + g` the goal is unreachable; this degrades to the
/// `Generational` principal with an advisory instead of failing.
pub fn nobility_principal(
    desired_income: Money,
    return_rate: Rate,
    inflation_rate: Rate,
    policy: &GoalPolicy,
    warnings: &mut Vec<String>,
) -> PlanResult<Money> {
    let hurdle = inflation_rate + policy.real_growth_increment;
    if return_rate <= hurdle {
        advise(
            warnings,
            format!(
                "Return rate {return_rate} does not exceed inflation plus desired real growth \
                 ({hurdle}); falling back to Generational principal"
            ),
        );
        return generational_principal(
            desired_income,
            return_rate,
            inflation_rate,
            policy,
            warnings,
        );
    }
    Ok(desired_income / (return_rate - hurdle))
}

/// `Sustainable` principal on the self-funded share of income only.
pub fn supplemented_principal(
    desired_income: Money,
    retirement_duration: Years,
    return_rate: Rate,
    inflation_rate: Rate,
    policy: &GoalPolicy,
) -> PlanResult<Money> {
    sustainable_principal(
        desired_income * policy.self_funded_fraction,
        retirement_duration,
        return_rate,
        inflation_rate,
    )
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Principal required at the start of retirement for `goal`.
pub fn principal_for_goal(
    goal: FinancialGoal,
    desired_income: Money,
    retirement_duration: Years,
    return_rate: Rate,
    inflation_rate: Rate,
    policy: &GoalPolicy,
    warnings: &mut Vec<String>,
) -> PlanResult<Money> {
    match goal {
        FinancialGoal::Supplemented => supplemented_principal(
            desired_income,
            retirement_duration,
            return_rate,
            inflation_rate,
            policy,
        ),
        FinancialGoal::Sustainable => sustainable_principal(
            desired_income,
            retirement_duration,
            return_rate,
            inflation_rate,
        ),
        FinancialGoal::Generational => {
            generational_principal(desired_income, return_rate, inflation_rate, policy, warnings)
        }
        FinancialGoal::Nobility => {
            nobility_principal(desired_income, return_rate, inflation_rate, policy, warnings)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
