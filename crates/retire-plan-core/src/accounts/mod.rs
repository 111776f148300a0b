//! Per-account-type analyzers.
//!
//! Each analyzer applies its account's tax timing before the goal formula,
//! sizes the level contribution, then applies ceilings and match rules.

pub mod brokerage;
pub mod employer_plan;
pub mod ira;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assumptions::GoalPolicy;
use crate::error::PlanError;
use crate::goals::FinancialGoal;
use crate::tax::{FilingStatus, TaxTables};
use crate::types::{Money, Rate, Years};
use crate::PlanResult;

pub use brokerage::analyze_brokerage;
pub use employer_plan::{analyze_roth_401k, analyze_traditional_401k};
pub use ira::{analyze_roth_ira, analyze_traditional_ira};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The five account types analyzed for every scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Brokerage Account")]
    Brokerage,
    #[serde(rename = "Traditional IRA")]
    TraditionalIra,
    #[serde(rename = "Roth IRA")]
    RothIra,
    #[serde(rename = "Traditional 401k")]
    Traditional401k,
    #[serde(rename = "Roth 401k")]
    Roth401k,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Brokerage,
        AccountType::TraditionalIra,
        AccountType::RothIra,
        AccountType::Traditional401k,
        AccountType::Roth401k,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AccountType::Brokerage => "Brokerage Account",
            AccountType::TraditionalIra => "Traditional IRA",
            AccountType::RothIra => "Roth IRA",
            AccountType::Traditional401k => "Traditional 401k",
            AccountType::Roth401k => "Roth 401k",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the required contribution exceeds the account's annual ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitStatus {
    Yes,
    No,
}

impl From<bool> for LimitStatus {
    fn from(exceeded: bool) -> Self {
        if exceeded {
            LimitStatus::Yes
        } else {
            LimitStatus::No
        }
    }
}

/// One metric of an [`AccountResult`]: an amount or a Yes/No status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Amount(Money),
    Status(LimitStatus),
}

impl MetricValue {
    pub fn as_amount(&self) -> Option<Money> {
        match self {
            MetricValue::Amount(v) => Some(*v),
            MetricValue::Status(_) => None,
        }
    }
}

/// Output of one analyzer.
///
/// `principal_required` and `yearly_contribution` are always present and
/// are the figures compared across accounts; everything else is additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResult {
    #[serde(rename = "Principal Required")]
    pub principal_required: Money,
    #[serde(rename = "Yearly Contribution")]
    pub yearly_contribution: Money,
    /// Uncapped contribution before any ceiling applies.
    #[serde(rename = "Required Contribution", default, skip_serializing_if = "Option::is_none")]
    pub required_contribution: Option<Money>,
    #[serde(rename = "Effective Growth Rate", default, skip_serializing_if = "Option::is_none")]
    pub effective_growth_rate: Option<Rate>,
    #[serde(rename = "Withdrawal Tax Rate", default, skip_serializing_if = "Option::is_none")]
    pub withdrawal_tax_rate: Option<Rate>,
    #[serde(rename = "Employee Contribution", default, skip_serializing_if = "Option::is_none")]
    pub employee_contribution: Option<Money>,
    #[serde(
        rename = "Employee Contribution After-Tax",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_contribution_after_tax: Option<Money>,
    #[serde(rename = "Employer Contribution", default, skip_serializing_if = "Option::is_none")]
    pub employer_contribution: Option<Money>,
    /// Roth 401(k) match lands in a traditional sub-account.
    #[serde(
        rename = "Employer Contribution Traditional",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employer_contribution_traditional: Option<Money>,
    #[serde(rename = "Total Contribution", default, skip_serializing_if = "Option::is_none")]
    pub total_contribution: Option<Money>,
    #[serde(rename = "Effective Pre-Tax Cost", default, skip_serializing_if = "Option::is_none")]
    pub effective_pre_tax_cost: Option<Money>,
    #[serde(
        rename = "Contribution Limit Exceeded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contribution_limit_exceeded: Option<LimitStatus>,
}

impl AccountResult {
    pub(crate) fn new(principal_required: Money, yearly_contribution: Money) -> Self {
        Self {
            principal_required,
            yearly_contribution,
            required_contribution: None,
            effective_growth_rate: None,
            withdrawal_tax_rate: None,
            employee_contribution: None,
            employee_contribution_after_tax: None,
            employer_contribution: None,
            employer_contribution_traditional: None,
            total_contribution: None,
            effective_pre_tax_cost: None,
            contribution_limit_exceeded: None,
        }
    }

    /// Present metrics in display order, keyed by their wire names.
    pub fn metrics(&self) -> Vec<(&'static str, MetricValue)> {
        let mut out = vec![
            ("Principal Required", MetricValue::Amount(self.principal_required)),
            ("Yearly Contribution", MetricValue::Amount(self.yearly_contribution)),
        ];
        let optional = [
            ("Required Contribution", self.required_contribution),
            ("Effective Growth Rate", self.effective_growth_rate),
            ("Withdrawal Tax Rate", self.withdrawal_tax_rate),
            ("Employee Contribution", self.employee_contribution),
            ("Employee Contribution After-Tax", self.employee_contribution_after_tax),
            ("Employer Contribution", self.employer_contribution),
            ("Employer Contribution Traditional", self.employer_contribution_traditional),
            ("Total Contribution", self.total_contribution),
            ("Effective Pre-Tax Cost", self.effective_pre_tax_cost),
        ];
        out.extend(
            optional
                .into_iter()
                .filter_map(|(name, v)| v.map(|v| (name, MetricValue::Amount(v)))),
        );
        if let Some(status) = self.contribution_limit_exceeded {
            out.push(("Contribution Limit Exceeded", MetricValue::Status(status)));
        }
        out
    }

    pub fn metric(&self, name: &str) -> Option<MetricValue> {
        self.metrics()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Inputs every analyzer shares for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct AccountContext<'a> {
    /// Income need at retirement start, already inflated to nominal dollars.
    pub future_income: Money,
    pub growth_rate: Rate,
    pub inflation_rate: Rate,
    pub accumulation_years: Years,
    pub retirement_years: Years,
    pub goal: FinancialGoal,
    pub filing_status: FilingStatus,
    pub policy: &'a GoalPolicy,
    pub tax_tables: &'a TaxTables,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Pre-tax amount whose after-tax value at `tax_rate` is `net`.
pub(crate) fn gross_up(net: Money, tax_rate: Rate, context: &str) -> PlanResult<Money> {
    let keep = Decimal::ONE - tax_rate;
    if keep <= Decimal::ZERO {
        return Err(PlanError::DivisionByZero {
            context: format!("{context} gross-up at tax rate {tax_rate}"),
        });
    }
    Ok(net / keep)
}

/// Ceiling applied to a required contribution: `(capped, exceeded)`.
pub(crate) fn apply_ceiling(required: Money, ceiling: Money) -> (Money, LimitStatus) {
    (required.min(ceiling), LimitStatus::from(required > ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_names_match_serde_names() {
        for account in AccountType::ALL {
            let json = serde_json::to_string(&account).unwrap();
            assert_eq!(json, format!("\"{}\"", account.name()));
        }
    }

    #[test]
    fn test_limit_status_serializes_yes_no() {
        assert_eq!(serde_json::to_string(&LimitStatus::Yes).unwrap(), "\"Yes\"");
        assert_eq!(serde_json::to_string(&LimitStatus::No).unwrap(), "\"No\"");
    }

    #[test]
    fn test_canonical_metrics_always_first() {
        let mut result = AccountResult::new(dec!(1000), dec!(10));
        result.contribution_limit_exceeded = Some(LimitStatus::No);
        let metrics = result.metrics();
        assert_eq!(metrics[0].0, "Principal Required");
        assert_eq!(metrics[1].0, "Yearly Contribution");
        assert_eq!(
            metrics.last().unwrap().1,
            MetricValue::Status(LimitStatus::No)
        );
    }

    #[test]
    fn test_optional_metrics_skipped_when_absent() {
        let result = AccountResult::new(dec!(1000), dec!(10));
        let json = serde_json::to_value(&result).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("Principal Required"));
        assert!(map.contains_key("Yearly Contribution"));
    }

    #[test]
    fn test_metric_lookup_by_name() {
        let mut result = AccountResult::new(dec!(1000), dec!(10));
        result.total_contribution = Some(dec!(12));
        assert_eq!(
            result.metric("Total Contribution").and_then(|m| m.as_amount()),
            Some(dec!(12))
        );
        assert!(result.metric("Effective Pre-Tax Cost").is_none());
    }

    #[test]
    fn test_gross_up_and_full_tax_rejected() {
        assert_eq!(gross_up(dec!(75), dec!(0.25), "test").unwrap(), dec!(100));
        assert!(matches!(
            gross_up(dec!(75), Decimal::ONE, "test"),
            Err(PlanError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_apply_ceiling() {
        assert_eq!(apply_ceiling(dec!(8000), dec!(7000)), (dec!(7000), LimitStatus::Yes));
        assert_eq!(apply_ceiling(dec!(7000), dec!(7000)), (dec!(7000), LimitStatus::No));
        assert_eq!(apply_ceiling(dec!(500), dec!(7000)), (dec!(500), LimitStatus::No));
    }
}
