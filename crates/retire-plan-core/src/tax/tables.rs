use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PlanError;
use crate::types::{Money, Rate};
use crate::PlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Federal filing status. Selects the bracket schedule and deduction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadHousehold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married_joint",
            FilingStatus::MarriedSeparate => "married_separate",
            FilingStatus::HeadHousehold => "head_household",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PlanError::InvalidFilingStatus(s.to_string()))
    }
}

/// One marginal bracket. `upper = None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper: Option<Money>,
    pub rate: Rate,
}

impl TaxBracket {
    pub fn capped(upper: Money, rate: Rate) -> Self {
        Self {
            upper: Some(upper),
            rate,
        }
    }

    pub fn unbounded(rate: Rate) -> Self {
        Self { upper: None, rate }
    }
}

/// Everything that varies by filing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingSchedule {
    pub standard_deduction: Money,
    pub ordinary_brackets: Vec<TaxBracket>,
    pub capital_gains_brackets: Vec<TaxBracket>,
    pub additional_medicare_threshold: Money,
}

/// Payroll tax parameters shared by every filing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FicaParameters {
    pub social_security_rate: Rate,
    pub social_security_wage_cap: Money,
    pub medicare_rate: Rate,
    pub additional_medicare_rate: Rate,
}

/// A point-in-time snapshot of federal tax law.
///
/// The default is the 2024 snapshot. Retargeting to another tax year means
/// deserializing a different table set, not editing code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTables {
    pub tax_year: u16,
    pub fica: FicaParameters,
    pub schedules: BTreeMap<FilingStatus, FilingSchedule>,
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::tax_year_2024()
    }
}

// ---------------------------------------------------------------------------
// 2024 snapshot
// ---------------------------------------------------------------------------

fn ordinary_2024(edges: [Money; 6]) -> Vec<TaxBracket> {
    let rates = [dec!(0.10), dec!(0.12), dec!(0.22), dec!(0.24), dec!(0.32), dec!(0.35)];
    let mut brackets: Vec<TaxBracket> = edges
        .iter()
        .zip(rates.iter())
        .map(|(upper, rate)| TaxBracket::capped(*upper, *rate))
        .collect();
    brackets.push(TaxBracket::unbounded(dec!(0.37)));
    brackets
}

fn capital_gains_2024(zero_rate_top: Money, fifteen_rate_top: Money) -> Vec<TaxBracket> {
    vec![
        TaxBracket::capped(zero_rate_top, Decimal::ZERO),
        TaxBracket::capped(fifteen_rate_top, dec!(0.15)),
        TaxBracket::unbounded(dec!(0.20)),
    ]
}

impl TaxTables {
    pub fn tax_year_2024() -> Self {
        let mut schedules = BTreeMap::new();
        schedules.insert(
            FilingStatus::Single,
            FilingSchedule {
                standard_deduction: dec!(14600),
                ordinary_brackets: ordinary_2024([
                    dec!(11600),
                    dec!(47150),
                    dec!(100525),
                    dec!(191950),
                    dec!(243725),
                    dec!(609350),
                ]),
                capital_gains_brackets: capital_gains_2024(dec!(44625), dec!(492300)),
                additional_medicare_threshold: dec!(200000),
            },
        );
        schedules.insert(
            FilingStatus::MarriedJoint,
            FilingSchedule {
                standard_deduction: dec!(29200),
                ordinary_brackets: ordinary_2024([
                    dec!(23200),
                    dec!(94300),
                    dec!(201050),
                    dec!(383900),
                    dec!(487450),
                    dec!(731200),
                ]),
                capital_gains_brackets: capital_gains_2024(dec!(89250), dec!(553850)),
                additional_medicare_threshold: dec!(250000),
            },
        );
        schedules.insert(
            FilingStatus::MarriedSeparate,
            FilingSchedule {
                standard_deduction: dec!(14600),
                ordinary_brackets: ordinary_2024([
                    dec!(11600),
                    dec!(47150),
                    dec!(100525),
                    dec!(191950),
                    dec!(243725),
                    dec!(365600),
                ]),
                capital_gains_brackets: capital_gains_2024(dec!(44625), dec!(276900)),
                additional_medicare_threshold: dec!(125000),
            },
        );
        schedules.insert(
            FilingStatus::HeadHousehold,
            FilingSchedule {
                standard_deduction: dec!(21900),
                ordinary_brackets: ordinary_2024([
                    dec!(16550),
                    dec!(63100),
                    dec!(100500),
                    dec!(191950),
                    dec!(243700),
                    dec!(609350),
                ]),
                capital_gains_brackets: capital_gains_2024(dec!(59750), dec!(523050)),
                additional_medicare_threshold: dec!(200000),
            },
        );

        Self {
            tax_year: 2024,
            fica: FicaParameters {
                social_security_rate: dec!(0.062),
                social_security_wage_cap: dec!(168600),
                medicare_rate: dec!(0.0145),
                additional_medicare_rate: dec!(0.009),
            },
            schedules,
        }
    }

    /// Schedule for `status`. A table set without one is an error, never a default.
    pub fn schedule(&self, status: FilingStatus) -> PlanResult<&FilingSchedule> {
        self.schedules
            .get(&status)
            .ok_or_else(|| PlanError::InvalidFilingStatus(status.to_string()))
    }

    /// Check every bracket sequence for monotonic, terminated structure.
    pub fn validate(&self) -> PlanResult<()> {
        for rate in [
            self.fica.social_security_rate,
            self.fica.medicare_rate,
            self.fica.additional_medicare_rate,
        ] {
            check_rate("fica", rate)?;
        }
        if self.fica.social_security_wage_cap < Decimal::ZERO {
            return Err(PlanError::InvalidInput {
                field: "fica.social_security_wage_cap".into(),
                reason: "must be >= 0".into(),
            });
        }

        for (status, schedule) in &self.schedules {
            if schedule.standard_deduction < Decimal::ZERO {
                return Err(PlanError::InvalidInput {
                    field: format!("schedules.{status}.standard_deduction"),
                    reason: "must be >= 0".into(),
                });
            }
            validate_brackets(
                &format!("schedules.{status}.ordinary_brackets"),
                &schedule.ordinary_brackets,
            )?;
            validate_brackets(
                &format!("schedules.{status}.capital_gains_brackets"),
                &schedule.capital_gains_brackets,
            )?;
        }
        Ok(())
    }
}

fn check_rate(field: &str, rate: Rate) -> PlanResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PlanError::InvalidInput {
            field: field.into(),
            reason: format!("rate {rate} must be between 0 and 1"),
        });
    }
    Ok(())
}

fn validate_brackets(field: &str, brackets: &[TaxBracket]) -> PlanResult<()> {
    let Some((last, finite)) = brackets.split_last() else {
        return Err(PlanError::InvalidInput {
            field: field.into(),
            reason: "at least one bracket is required".into(),
        });
    };
    if last.upper.is_some() {
        return Err(PlanError::InvalidInput {
            field: field.into(),
            reason: "last bracket must be unbounded".into(),
        });
    }
    check_rate(field, last.rate)?;

    let mut previous = Decimal::ZERO;
    for bracket in finite {
        let upper = bracket.upper.ok_or_else(|| PlanError::InvalidInput {
            field: field.into(),
            reason: "only the last bracket may be unbounded".into(),
        })?;
        if upper <= previous {
            return Err(PlanError::InvalidInput {
                field: field.into(),
                reason: format!("upper bounds must strictly increase ({upper} after {previous})"),
            });
        }
        check_rate(field, bracket.rate)?;
        previous = upper;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_2024_and_valid() {
        let tables = TaxTables::default();
        assert_eq!(tables.tax_year, 2024);
        assert!(tables.validate().is_ok());
        assert_eq!(tables.schedules.len(), 4);
    }

    #[test]
    fn test_filing_status_parses_wire_names() {
        assert_eq!("single".parse::<FilingStatus>().unwrap(), FilingStatus::Single);
        assert_eq!(
            "head_household".parse::<FilingStatus>().unwrap(),
            FilingStatus::HeadHousehold
        );
    }

    #[test]
    fn test_unknown_filing_status_rejected() {
        let err = "widowed".parse::<FilingStatus>().unwrap_err();
        match err {
            PlanError::InvalidFilingStatus(s) => assert_eq!(s, "widowed"),
            other => panic!("Expected InvalidFilingStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_filing_status_rejected_by_serde() {
        let parsed: Result<FilingStatus, _> = serde_json::from_str("\"joint\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_schedule_is_invalid_filing_status() {
        let mut tables = TaxTables::default();
        tables.schedules.remove(&FilingStatus::MarriedSeparate);
        assert!(matches!(
            tables.schedule(FilingStatus::MarriedSeparate),
            Err(PlanError::InvalidFilingStatus(_))
        ));
    }

    #[test]
    fn test_single_top_bracket_is_unbounded_37() {
        let tables = TaxTables::default();
        let single = tables.schedule(FilingStatus::Single).unwrap();
        let top = single.ordinary_brackets.last().unwrap();
        assert_eq!(top.upper, None);
        assert_eq!(top.rate, dec!(0.37));
        assert_eq!(single.ordinary_brackets.len(), 7);
    }

    #[test]
    fn test_non_increasing_edges_rejected() {
        let mut tables = TaxTables::default();
        let schedule = tables.schedules.get_mut(&FilingStatus::Single).unwrap();
        schedule.ordinary_brackets[2].upper = Some(dec!(40000));
        assert!(matches!(
            tables.validate(),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_unterminated_table_rejected() {
        let mut tables = TaxTables::default();
        let schedule = tables.schedules.get_mut(&FilingStatus::Single).unwrap();
        schedule.capital_gains_brackets.pop();
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_tables_round_trip_through_json() {
        let tables = TaxTables::default();
        let json = serde_json::to_string(&tables).unwrap();
        let back: TaxTables = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tables);
    }
}
