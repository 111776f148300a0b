use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::tax::tables::{FicaParameters, FilingStatus, TaxBracket, TaxTables};
use crate::types::{Money, Rate};
use crate::PlanResult;

/// Full decomposition of federal income and payroll tax on wages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    pub gross_income: Money,
    pub filing_status: FilingStatus,
    pub standard_deduction: Money,
    pub taxable_income: Money,
    pub income_tax: Money,
    pub marginal_rate: Rate,
    pub social_security_tax: Money,
    pub medicare_tax: Money,
    pub additional_medicare_tax: Money,
    pub fica_tax: Money,
    pub total_tax: Money,
    pub net_income: Money,
    pub effective_rate: Rate,
}

/// Payroll tax split into its three components.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FicaComponents {
    social_security: Money,
    medicare: Money,
    additional_medicare: Money,
}

impl FicaComponents {
    fn total(&self) -> Money {
        self.social_security + self.medicare + self.additional_medicare
    }
}

fn fica_components(fica: &FicaParameters, gross: Money, addl_threshold: Money) -> FicaComponents {
    let social_security = gross.min(fica.social_security_wage_cap) * fica.social_security_rate;
    let medicare = gross * fica.medicare_rate;
    let additional_medicare = if gross > addl_threshold {
        (gross - addl_threshold) * fica.additional_medicare_rate
    } else {
        Decimal::ZERO
    };
    FicaComponents {
        social_security,
        medicare,
        additional_medicare,
    }
}

/// Marginal walk: each bracket taxes only the slice between the previous
/// edge and its own, and the final slice is prorated.
///
/// Returns `(tax, marginal_rate)`.
fn progressive_tax(taxable: Money, brackets: &[TaxBracket]) -> (Money, Rate) {
    let mut tax = Decimal::ZERO;
    let mut previous_upper = Decimal::ZERO;
    let mut marginal = brackets.first().map(|b| b.rate).unwrap_or_default();

    for bracket in brackets {
        if taxable <= previous_upper {
            break;
        }
        let slice = match bracket.upper {
            Some(upper) => (taxable - previous_upper).min(upper - previous_upper),
            None => taxable - previous_upper,
        };
        tax += slice * bracket.rate;
        marginal = bracket.rate;

        match bracket.upper {
            Some(upper) if taxable > upper => previous_upper = upper,
            _ => break,
        }
    }

    (tax, marginal)
}

fn require_non_negative(field: &str, value: Money) -> PlanResult<()> {
    if value < Decimal::ZERO {
        return Err(PlanError::InvalidInput {
            field: field.into(),
            reason: "must be >= 0".into(),
        });
    }
    Ok(())
}

impl TaxTables {
    /// Federal income tax plus FICA on `gross_income` of wages.
    pub fn income_tax_breakdown(
        &self,
        gross_income: Money,
        filing_status: FilingStatus,
    ) -> PlanResult<IncomeTaxBreakdown> {
        require_non_negative("gross_income", gross_income)?;
        let schedule = self.schedule(filing_status)?;

        let taxable_income = (gross_income - schedule.standard_deduction).max(Decimal::ZERO);
        let (income_tax, marginal_rate) =
            progressive_tax(taxable_income, &schedule.ordinary_brackets);
        let fica = fica_components(
            &self.fica,
            gross_income,
            schedule.additional_medicare_threshold,
        );
        let fica_tax = fica.total();
        let total_tax = income_tax + fica_tax;

        let effective_rate = if gross_income.is_zero() {
            Decimal::ZERO
        } else {
            total_tax / gross_income
        };

        Ok(IncomeTaxBreakdown {
            gross_income,
            filing_status,
            standard_deduction: schedule.standard_deduction,
            taxable_income,
            income_tax,
            marginal_rate,
            social_security_tax: fica.social_security,
            medicare_tax: fica.medicare,
            additional_medicare_tax: fica.additional_medicare,
            fica_tax,
            total_tax,
            net_income: gross_income - total_tax,
            effective_rate,
        })
    }

    /// `(net_income, effective_rate)` after federal income tax and FICA.
    pub fn post_tax_income(
        &self,
        gross_income: Money,
        filing_status: FilingStatus,
    ) -> PlanResult<(Money, Rate)> {
        let breakdown = self.income_tax_breakdown(gross_income, filing_status)?;
        Ok((breakdown.net_income, breakdown.effective_rate))
    }

    /// Social Security, Medicare and additional Medicare on wages.
    pub fn fica_tax(&self, gross_income: Money, filing_status: FilingStatus) -> PlanResult<Money> {
        require_non_negative("gross_income", gross_income)?;
        let schedule = self.schedule(filing_status)?;
        Ok(fica_components(
            &self.fica,
            gross_income,
            schedule.additional_medicare_threshold,
        )
        .total())
    }
}

/// [`TaxTables::post_tax_income`] against the default (2024) tables.
pub fn post_tax_income(
    gross_income: Money,
    filing_status: FilingStatus,
) -> PlanResult<(Money, Rate)> {
    TaxTables::default().post_tax_income(gross_income, filing_status)
}

/// [`TaxTables::fica_tax`] against the default (2024) tables.
pub fn fica_tax(gross_income: Money, filing_status: FilingStatus) -> PlanResult<Money> {
    TaxTables::default().fica_tax(gross_income, filing_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_126k_bracket_walk() {
        let b = TaxTables::default()
            .income_tax_breakdown(dec!(126000), FilingStatus::Single)
            .unwrap();
        // taxable 111,400: 1,160 + 4,266 + 11,742.50 + 2,610
        assert_eq!(b.taxable_income, dec!(111400));
        assert_eq!(b.income_tax, dec!(19778.50));
        assert_eq!(b.marginal_rate, dec!(0.24));
        assert_eq!(b.social_security_tax, dec!(7812));
        assert_eq!(b.medicare_tax, dec!(1827));
        assert_eq!(b.additional_medicare_tax, Decimal::ZERO);
        assert_eq!(b.fica_tax, dec!(9639));
        assert_eq!(b.net_income, dec!(96582.50));
        let expected_rate = dec!(29417.50) / dec!(126000);
        assert!((b.effective_rate - expected_rate).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_zero_income_is_zero_for_every_status() {
        for status in FilingStatus::ALL {
            let (net, rate) = post_tax_income(Decimal::ZERO, status).unwrap();
            assert_eq!(net, Decimal::ZERO);
            assert_eq!(rate, Decimal::ZERO);
        }
    }

    #[test]
    fn test_income_below_deduction_pays_only_fica() {
        let b = TaxTables::default()
            .income_tax_breakdown(dec!(10000), FilingStatus::Single)
            .unwrap();
        assert_eq!(b.taxable_income, Decimal::ZERO);
        assert_eq!(b.income_tax, Decimal::ZERO);
        assert_eq!(b.fica_tax, dec!(765));
    }

    #[test]
    fn test_income_exactly_on_bracket_edge() {
        // taxable = 11,600: entirely in the 10% bracket
        let b = TaxTables::default()
            .income_tax_breakdown(dec!(26200), FilingStatus::Single)
            .unwrap();
        assert_eq!(b.income_tax, dec!(1160));
        assert_eq!(b.marginal_rate, dec!(0.10));
    }

    #[test]
    fn test_top_bracket_reached() {
        let b = TaxTables::default()
            .income_tax_breakdown(dec!(1_000_000), FilingStatus::Single)
            .unwrap();
        assert_eq!(b.marginal_rate, dec!(0.37));
        // taxable 985,400; tax through 609,350 = 183,647.25; + 376,050 * 0.37
        assert_eq!(b.income_tax, dec!(183647.25) + dec!(376050) * dec!(0.37));
    }

    #[test]
    fn test_social_security_capped_and_additional_medicare() {
        let fica = fica_tax(dec!(300000), FilingStatus::Single).unwrap();
        let expected = dec!(168600) * dec!(0.062)
            + dec!(300000) * dec!(0.0145)
            + dec!(100000) * dec!(0.009);
        assert_eq!(fica, expected);
    }

    #[test]
    fn test_additional_medicare_threshold_depends_on_status() {
        let single = fica_tax(dec!(240000), FilingStatus::Single).unwrap();
        let joint = fica_tax(dec!(240000), FilingStatus::MarriedJoint).unwrap();
        let separate = fica_tax(dec!(240000), FilingStatus::MarriedSeparate).unwrap();
        assert_eq!(single - joint, dec!(40000) * dec!(0.009));
        assert_eq!(separate - joint, dec!(115000) * dec!(0.009));
    }

    #[test]
    fn test_married_joint_pays_less_than_single_on_same_income() {
        let (net_single, _) = post_tax_income(dec!(150000), FilingStatus::Single).unwrap();
        let (net_joint, _) = post_tax_income(dec!(150000), FilingStatus::MarriedJoint).unwrap();
        assert!(net_joint > net_single);
    }

    #[test]
    fn test_negative_income_rejected() {
        assert!(matches!(
            post_tax_income(dec!(-1), FilingStatus::Single),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_schedule_fails_rather_than_defaulting() {
        let mut tables = TaxTables::default();
        tables.schedules.remove(&FilingStatus::HeadHousehold);
        assert!(matches!(
            tables.post_tax_income(dec!(50000), FilingStatus::HeadHousehold),
            Err(PlanError::InvalidFilingStatus(_))
        ));
    }
}
