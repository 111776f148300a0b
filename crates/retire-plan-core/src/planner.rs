use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::accounts::{
    analyze_brokerage, analyze_roth_401k, analyze_roth_ira, analyze_traditional_401k,
    analyze_traditional_ira, AccountContext, AccountResult, AccountType,
};
use crate::assumptions::{
    default_capital_gains_drag, default_contribution_limit_401k, default_contribution_limit_ira,
    default_employer_match, default_inflation_rate, GoalPolicy, MAX_HORIZON_YEARS,
};
use crate::error::PlanError;
use crate::goals::FinancialGoal;
use crate::tax::{FilingStatus, TaxTables};
use crate::time_value::compound;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::PlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything needed to analyze one saver's retirement options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    /// Annual income wanted in retirement, in today's dollars.
    pub quality_of_life_income: Money,
    pub growth_rate: Rate,
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: Rate,
    pub accumulation_years: Years,
    pub retirement_years: Years,
    #[serde(default)]
    pub goal: FinancialGoal,
    #[serde(default)]
    pub filing_status: FilingStatus,
    #[serde(default = "default_employer_match")]
    pub employer_match: Rate,
    #[serde(default = "default_contribution_limit_401k")]
    pub contribution_limit_401k: Money,
    #[serde(default = "default_contribution_limit_ira")]
    pub contribution_limit_ira: Money,
    #[serde(default = "default_capital_gains_drag")]
    pub capital_gains_drag: Rate,
    /// Gross pay today; sets the tax rate on Roth 401(k) deferrals.
    /// Falls back to `quality_of_life_income` when absent.
    #[serde(default)]
    pub current_gross_income: Option<Money>,
    #[serde(default)]
    pub goal_policy: GoalPolicy,
    #[serde(default)]
    pub tax_tables: TaxTables,
}

impl ScenarioInputs {
    /// A scenario with every tunable at its default.
    pub fn new(
        quality_of_life_income: Money,
        growth_rate: Rate,
        accumulation_years: Years,
        retirement_years: Years,
    ) -> Self {
        Self {
            quality_of_life_income,
            growth_rate,
            inflation_rate: default_inflation_rate(),
            accumulation_years,
            retirement_years,
            goal: FinancialGoal::default(),
            filing_status: FilingStatus::default(),
            employer_match: default_employer_match(),
            contribution_limit_401k: default_contribution_limit_401k(),
            contribution_limit_ira: default_contribution_limit_ira(),
            capital_gains_drag: default_capital_gains_drag(),
            current_gross_income: None,
            goal_policy: GoalPolicy::default(),
            tax_tables: TaxTables::default(),
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.quality_of_life_income < Decimal::ZERO {
            return Err(invalid("quality_of_life_income", "must be >= 0"));
        }
        if self.accumulation_years == 0 {
            return Err(invalid("accumulation_years", "must be at least 1"));
        }
        if self.accumulation_years > MAX_HORIZON_YEARS {
            return Err(invalid(
                "accumulation_years",
                &format!("must be at most {MAX_HORIZON_YEARS}"),
            ));
        }
        if self.retirement_years > MAX_HORIZON_YEARS {
            return Err(invalid(
                "retirement_years",
                &format!("must be at most {MAX_HORIZON_YEARS}"),
            ));
        }
        if self.inflation_rate <= Decimal::NEGATIVE_ONE {
            return Err(invalid("inflation_rate", "must be greater than -100%"));
        }
        if self.employer_match < Decimal::ZERO || self.employer_match > Decimal::ONE {
            return Err(invalid("employer_match", "must be between 0 and 1"));
        }
        if self.capital_gains_drag < Decimal::ZERO || self.capital_gains_drag >= Decimal::ONE {
            return Err(invalid("capital_gains_drag", "must be in [0, 1)"));
        }
        if self.contribution_limit_401k < Decimal::ZERO {
            return Err(invalid("contribution_limit_401k", "must be >= 0"));
        }
        if self.contribution_limit_ira < Decimal::ZERO {
            return Err(invalid("contribution_limit_ira", "must be >= 0"));
        }
        if self.current_gross_income.is_some_and(|g| g < Decimal::ZERO) {
            return Err(invalid("current_gross_income", "must be >= 0"));
        }
        self.goal_policy.validate()?;
        self.tax_tables.validate()?;
        Ok(())
    }

    /// Today's income need in nominal dollars at retirement start.
    pub fn future_income(&self) -> PlanResult<Money> {
        let growth = compound(self.inflation_rate, self.accumulation_years)?;
        self.quality_of_life_income
            .checked_mul(growth)
            .ok_or_else(|| {
                invalid(
                    "quality_of_life_income",
                    "inflated need exceeds the representable range",
                )
            })
    }
}

fn invalid(field: &str, reason: &str) -> PlanError {
    PlanError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Per-account results for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub goal: FinancialGoal,
    /// Income need at retirement start, nominal.
    pub future_income: Money,
    pub accounts: BTreeMap<AccountType, AccountResult>,
}

impl AnalysisResult {
    pub fn account(&self, account: AccountType) -> Option<&AccountResult> {
        self.accounts.get(&account)
    }
}

/// Principal and yearly contribution for one goal across all accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRow {
    pub goal: FinancialGoal,
    pub principal_required: BTreeMap<AccountType, Money>,
    pub yearly_contribution: BTreeMap<AccountType, Money>,
}

/// Goal-by-account matrix of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalComparison {
    pub future_income: Money,
    pub rows: Vec<GoalRow>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

fn run_analyzers(scenario: &ScenarioInputs, warnings: &mut Vec<String>) -> PlanResult<AnalysisResult> {
    let future_income = scenario.future_income()?;
    let ctx = AccountContext {
        future_income,
        growth_rate: scenario.growth_rate,
        inflation_rate: scenario.inflation_rate,
        accumulation_years: scenario.accumulation_years,
        retirement_years: scenario.retirement_years,
        goal: scenario.goal,
        filing_status: scenario.filing_status,
        policy: &scenario.goal_policy,
        tax_tables: &scenario.tax_tables,
    };

    let current_income = scenario
        .current_gross_income
        .unwrap_or(scenario.quality_of_life_income);
    let (_, current_effective_rate) = scenario
        .tax_tables
        .post_tax_income(current_income, scenario.filing_status)?;

    tracing::debug!(
        goal = %scenario.goal,
        %future_income,
        %current_effective_rate,
        "analyzing retirement accounts"
    );

    let mut accounts = BTreeMap::new();
    for account in AccountType::ALL {
        let mut account_warnings = Vec::new();
        let result = match account {
            AccountType::Brokerage => {
                analyze_brokerage(&ctx, scenario.capital_gains_drag, &mut account_warnings)
            }
            AccountType::TraditionalIra => {
                analyze_traditional_ira(&ctx, scenario.contribution_limit_ira, &mut account_warnings)
            }
            AccountType::RothIra => {
                analyze_roth_ira(&ctx, scenario.contribution_limit_ira, &mut account_warnings)
            }
            AccountType::Traditional401k => analyze_traditional_401k(
                &ctx,
                scenario.contribution_limit_401k,
                scenario.employer_match,
                &mut account_warnings,
            ),
            AccountType::Roth401k => analyze_roth_401k(
                &ctx,
                scenario.contribution_limit_401k,
                scenario.employer_match,
                current_effective_rate,
                &mut account_warnings,
            ),
        }?;
        warnings.extend(account_warnings.into_iter().map(|w| format!("{account}: {w}")));
        accounts.insert(account, result);
    }

    Ok(AnalysisResult {
        goal: scenario.goal,
        future_income,
        accounts,
    })
}

fn scenario_assumptions(scenario: &ScenarioInputs) -> serde_json::Value {
    serde_json::json!({
        "goal": scenario.goal,
        "filing_status": scenario.filing_status,
        "tax_year": scenario.tax_tables.tax_year,
        "growth_rate": scenario.growth_rate.to_string(),
        "inflation_rate": scenario.inflation_rate.to_string(),
        "accumulation_years": scenario.accumulation_years,
        "retirement_years": scenario.retirement_years,
        "employer_match": scenario.employer_match.to_string(),
        "capital_gains_drag": scenario.capital_gains_drag.to_string(),
        "contribution_limit_401k": scenario.contribution_limit_401k.to_string(),
        "contribution_limit_ira": scenario.contribution_limit_ira.to_string(),
        "self_funded_fraction": scenario.goal_policy.self_funded_fraction.to_string(),
        "real_growth_increment": scenario.goal_policy.real_growth_increment.to_string(),
    })
}

/// Run all five account analyzers for `scenario`.
///
/// The income need is inflated over the accumulation horizon once and
/// shared by every analyzer. Accounts are not ranked.
pub fn analyze_retirement_options(
    scenario: &ScenarioInputs,
) -> PlanResult<ComputationOutput<AnalysisResult>> {
    let start = Instant::now();
    scenario.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let result = run_analyzers(scenario, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Goal-based retirement principal with level annual contributions per account type",
        &scenario_assumptions(scenario),
        warnings,
        elapsed,
        result,
    ))
}

/// Analyze `scenario` once per goal, ignoring its own `goal`.
pub fn compare_goals(scenario: &ScenarioInputs) -> PlanResult<ComputationOutput<GoalComparison>> {
    let start = Instant::now();
    scenario.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(FinancialGoal::ALL.len());
    for goal in FinancialGoal::ALL {
        let goal_scenario = ScenarioInputs {
            goal,
            ..scenario.clone()
        };
        let mut goal_warnings = Vec::new();
        let analysis = run_analyzers(&goal_scenario, &mut goal_warnings)?;
        warnings.extend(goal_warnings.into_iter().map(|w| format!("{goal}: {w}")));

        rows.push(GoalRow {
            goal,
            principal_required: analysis
                .accounts
                .iter()
                .map(|(account, r)| (*account, r.principal_required))
                .collect(),
            yearly_contribution: analysis
                .accounts
                .iter()
                .map(|(account, r)| (*account, r.yearly_contribution))
                .collect(),
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Goal-by-account comparison of retirement principal and yearly contribution",
        &scenario_assumptions(scenario),
        warnings,
        elapsed,
        GoalComparison {
            future_income: scenario.future_income()?,
            rows,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
