use rust_decimal::Decimal;

use crate::error::PlanError;
use crate::tax::tables::{FilingStatus, TaxTables};
use crate::types::Money;
use crate::PlanResult;

impl TaxTables {
    /// Long-term capital gains tax on `gain`, stacked on `other_income`.
    ///
    /// The whole gain is taxed at the rate of the first bracket whose upper
    /// bound covers `other_income + gain`; past every finite bound the top
    /// rate applies to the full gain.
    pub fn capital_gains_tax(
        &self,
        gain: Money,
        other_income: Money,
        filing_status: FilingStatus,
    ) -> PlanResult<Money> {
        if gain < Decimal::ZERO {
            return Err(PlanError::InvalidInput {
                field: "gain".into(),
                reason: "must be >= 0".into(),
            });
        }
        if other_income < Decimal::ZERO {
            return Err(PlanError::InvalidInput {
                field: "other_income".into(),
                reason: "must be >= 0".into(),
            });
        }
        let brackets = &self.schedule(filing_status)?.capital_gains_brackets;
        let total = other_income + gain;

        let rate = brackets
            .iter()
            .find(|b| b.upper.is_some_and(|upper| total <= upper))
            .or_else(|| brackets.last())
            .map(|b| b.rate)
            .unwrap_or_default();

        Ok(gain * rate)
    }
}

/// [`TaxTables::capital_gains_tax`] against the default (2024) tables.
pub fn capital_gains_tax(
    gain: Money,
    other_income: Money,
    filing_status: FilingStatus,
) -> PlanResult<Money> {
    TaxTables::default().capital_gains_tax(gain, other_income, filing_status)
}
