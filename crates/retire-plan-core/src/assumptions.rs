//! Tunable planning constants.
//!
//! Every value here is a policy default, not a law of the model: scenarios
//! override any of them through serde, so a scenario file only has to state
//! what differs from these defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::types::{Money, Rate, Years};
use crate::PlanResult;

/// Long-run inflation assumption.
pub const DEFAULT_INFLATION_RATE: Rate = dec!(0.03);

/// Flat haircut applied to brokerage growth for taxes on gains.
pub const DEFAULT_CAPITAL_GAINS_DRAG: Rate = dec!(0.15);

/// Employer 401(k) match as a fraction of the employee deferral.
pub const DEFAULT_EMPLOYER_MATCH: Rate = dec!(0.05);

/// Annual employee deferral ceiling for 401(k) plans.
pub const DEFAULT_CONTRIBUTION_LIMIT_401K: Money = dec!(23500);

/// Annual contribution ceiling for IRAs.
pub const DEFAULT_CONTRIBUTION_LIMIT_IRA: Money = dec!(7000);

/// Share of retirement income that savings must fund under `Supplemented`.
pub const DEFAULT_SELF_FUNDED_FRACTION: Rate = dec!(0.40);

/// Real growth the principal must keep under `Nobility`.
pub const DEFAULT_REAL_GROWTH_INCREMENT: Rate = dec!(0.02);

/// Real-rate spread below which perpetuity results are flagged as unstable.
pub const DEFAULT_PRECISION_TOLERANCE: Rate = dec!(0.01);

/// Longest accumulation or retirement phase a scenario may span.
pub const MAX_HORIZON_YEARS: Years = 150;

/// Constants consumed by the goal formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalPolicy {
    pub self_funded_fraction: Rate,
    pub real_growth_increment: Rate,
    pub precision_tolerance: Rate,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            self_funded_fraction: DEFAULT_SELF_FUNDED_FRACTION,
            real_growth_increment: DEFAULT_REAL_GROWTH_INCREMENT,
            precision_tolerance: DEFAULT_PRECISION_TOLERANCE,
        }
    }
}

impl GoalPolicy {
    pub fn validate(&self) -> PlanResult<()> {
        if self.self_funded_fraction < Decimal::ZERO || self.self_funded_fraction > Decimal::ONE {
            return Err(PlanError::InvalidInput {
                field: "goal_policy.self_funded_fraction".into(),
                reason: "must be between 0 and 1".into(),
            });
        }
        if self.real_growth_increment < Decimal::ZERO {
            return Err(PlanError::InvalidInput {
                field: "goal_policy.real_growth_increment".into(),
                reason: "must be >= 0".into(),
            });
        }
        if self.precision_tolerance < Decimal::ZERO {
            return Err(PlanError::InvalidInput {
                field: "goal_policy.precision_tolerance".into(),
                reason: "must be >= 0".into(),
            });
        }
        Ok(())
    }
}

pub(crate) fn default_inflation_rate() -> Rate {
    DEFAULT_INFLATION_RATE
}

pub(crate) fn default_capital_gains_drag() -> Rate {
    DEFAULT_CAPITAL_GAINS_DRAG
}

pub(crate) fn default_employer_match() -> Rate {
    DEFAULT_EMPLOYER_MATCH
}

pub(crate) fn default_contribution_limit_401k() -> Money {
    DEFAULT_CONTRIBUTION_LIMIT_401K
}

pub(crate) fn default_contribution_limit_ira() -> Money {
    DEFAULT_CONTRIBUTION_LIMIT_IRA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(GoalPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_partial_policy_fills_defaults() {
        let policy: GoalPolicy =
            serde_json::from_str(r#"{ "real_growth_increment": "0.03" }"#).unwrap();
        assert_eq!(policy.real_growth_increment, dec!(0.03));
        assert_eq!(policy.self_funded_fraction, DEFAULT_SELF_FUNDED_FRACTION);
        assert_eq!(policy.precision_tolerance, DEFAULT_PRECISION_TOLERANCE);
    }

    #[test]
    fn test_self_funded_fraction_above_one_rejected() {
        let policy = GoalPolicy {
            self_funded_fraction: dec!(1.2),
            ..GoalPolicy::default()
        };
        match policy.validate().unwrap_err() {
            PlanError::InvalidInput { field, .. } => {
                assert_eq!(field, "goal_policy.self_funded_fraction")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
