use rust_decimal::Decimal;

use crate::error::PlanError;
use crate::types::{Money, Rate, Years};
use crate::PlanResult;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Growth past the `Decimal` range is an `InvalidInput` on the horizon,
/// never a panic. Stops early once the product reaches a fixed point
/// (zero, or the smallest representable step).
pub fn compound(rate: Rate, n: Years) -> PlanResult<Decimal> {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        let next = result
            .checked_mul(factor)
            .ok_or_else(|| horizon_overflow(rate, n))?;
        if next == result {
            break;
        }
        result = next;
    }
    Ok(result)
}

fn horizon_overflow(rate: Rate, n: Years) -> PlanError {
    PlanError::InvalidInput {
        field: "horizon".into(),
        reason: format!("(1 + {rate})^{n} exceeds the representable range"),
    }
}

fn require_positive_rate(context: &str, rate: Rate) -> PlanResult<()> {
    if rate <= Decimal::ZERO {
        return Err(PlanError::InvalidRate {
            context: context.into(),
            rate,
        });
    }
    Ok(())
}

/// Balance after `years` end-of-year contributions of `contribution`:
/// FV = C * [((1+r)^n - 1) / r]
pub fn future_value_of_contributions(
    rate: Rate,
    years: Years,
    contribution: Money,
) -> PlanResult<Money> {
    require_positive_rate("future_value_of_contributions", rate)?;
    let growth = compound(rate, years)? - Decimal::ONE;
    contribution
        .checked_mul(growth)
        .and_then(|v| v.checked_div(rate))
        .ok_or_else(|| horizon_overflow(rate, years))
}

/// Level annual contribution that grows into `target` after `years`:
/// C = FV * r / ((1+r)^n - 1)
pub fn required_contribution(target: Money, rate: Rate, years: Years) -> PlanResult<Money> {
    require_positive_rate("required_contribution", rate)?;
    if years == 0 {
        return Err(PlanError::InvalidInput {
            field: "years".into(),
            reason: "Contribution horizon must be at least one year".into(),
        });
    }

    let denom = compound(rate, years)? - Decimal::ONE;
    if denom.is_zero() {
        return Err(PlanError::DivisionByZero {
            context: "required_contribution annuity factor".into(),
        });
    }
    target
        .checked_mul(rate)
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| PlanError::InvalidInput {
            field: "target".into(),
            reason: format!("{target} exceeds the representable range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_zero_periods_is_one() {
        assert_eq!(compound(dec!(0.07), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_known_value() {
        assert_eq!(compound(dec!(0.10), 3).unwrap(), dec!(1.331));
    }

    #[test]
    fn test_compound_overflow_is_error() {
        // 2^100 is past the 96-bit mantissa
        match compound(Decimal::ONE, 100).unwrap_err() {
            PlanError::InvalidInput { field, .. } => assert_eq!(field, "horizon"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(required_contribution(dec!(1000), dec!(0.09), 800).is_err());
        assert!(future_value_of_contributions(dec!(0.09), 800, dec!(100)).is_err());
    }

    #[test]
    fn test_compound_long_horizon_terminates() {
        assert_eq!(compound(Decimal::NEGATIVE_ONE, u32::MAX).unwrap(), Decimal::ZERO);
        assert_eq!(compound(Decimal::ZERO, u32::MAX).unwrap(), Decimal::ONE);
        assert!(compound(dec!(-0.05), u32::MAX).unwrap() < dec!(0.0000000001));
    }

    #[test]
    fn test_future_value_known_answer() {
        // 1,000 per year for 3 years at 10%: 1000 * 0.331 / 0.1 = 3,310
        let fv = future_value_of_contributions(dec!(0.10), 3, dec!(1000)).unwrap();
        assert_eq!(fv, dec!(3310));
    }

    #[test]
    fn test_required_contribution_known_answer() {
        let c = required_contribution(dec!(3310), dec!(0.10), 3).unwrap();
        assert_eq!(c, dec!(1000));
    }

    #[test]
    fn test_required_contribution_one_year_is_target() {
        let c = required_contribution(dec!(50000), dec!(0.05), 1).unwrap();
        assert_eq!(c, dec!(50000));
    }

    #[test]
    fn test_required_contribution_inverts_future_value() {
        let target = dec!(1_250_000);
        let c = required_contribution(target, dec!(0.07), 35).unwrap();
        let fv = future_value_of_contributions(dec!(0.07), 35, c).unwrap();
        assert!((fv - target).abs() < dec!(0.0001), "fv={fv}");
    }

    #[test]
    fn test_zero_rate_rejected() {
        match required_contribution(dec!(1000), Decimal::ZERO, 10).unwrap_err() {
            PlanError::InvalidRate { rate, .. } => assert_eq!(rate, Decimal::ZERO),
            other => panic!("Expected InvalidRate, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(matches!(
            required_contribution(dec!(1000), dec!(-0.02), 10),
            Err(PlanError::InvalidRate { .. })
        ));
        assert!(matches!(
            future_value_of_contributions(dec!(-0.02), 10, dec!(100)),
            Err(PlanError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_zero_years_rejected() {
        assert!(matches!(
            required_contribution(dec!(1000), dec!(0.05), 0),
            Err(PlanError::InvalidInput { .. })
        ));
    }
}
