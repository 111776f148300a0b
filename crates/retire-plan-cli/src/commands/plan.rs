use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use retire_plan_core::accounts::{AccountType, LimitStatus};
use retire_plan_core::goals::FinancialGoal;
use retire_plan_core::planner::{self, AnalysisResult, ScenarioInputs};
use retire_plan_core::tax::FilingStatus;

use crate::input;

/// Scenario arguments shared by `analyze` and `compare-goals`
#[derive(Args)]
pub struct ScenarioArgs {
    /// Annual retirement income wanted, in today's dollars
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Treat --income as gross salary and convert it to post-tax first
    #[arg(long)]
    pub gross: bool,

    /// Expected annual growth rate (e.g. 0.07 for 7%)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Years of saving before retirement
    #[arg(long)]
    pub working_years: Option<u32>,

    /// Years spent drawing down in retirement
    #[arg(long)]
    pub retirement_years: Option<u32>,

    /// Supplemented, Sustainable, Generational or Nobility
    #[arg(long)]
    pub goal: Option<FinancialGoal>,

    /// single, married_joint, married_separate or head_household
    #[arg(long)]
    pub filing_status: Option<FilingStatus>,

    /// Annual inflation rate
    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Employer 401(k) match as a fraction of the required contribution
    #[arg(long)]
    pub employer_match: Option<Decimal>,

    /// Annual 401(k) employee deferral ceiling
    #[arg(long)]
    pub limit_401k: Option<Decimal>,

    /// Annual IRA contribution ceiling
    #[arg(long)]
    pub limit_ira: Option<Decimal>,

    /// Share of brokerage growth lost to capital gains tax
    #[arg(long)]
    pub capital_gains_drag: Option<Decimal>,

    /// Gross pay today, used to cost Roth 401(k) deferrals
    #[arg(long)]
    pub current_gross_income: Option<Decimal>,

    /// Path to a JSON or YAML scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn scenario_from_args(args: &ScenarioArgs) -> Result<ScenarioInputs, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_scenario(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let filing_status = args.filing_status.unwrap_or_default();
    let stated_income = args
        .income
        .ok_or("--income is required (or provide --input)")?;
    let income = if args.gross {
        let (net, _) = retire_plan_core::tax::post_tax_income(stated_income, filing_status)?;
        tracing::debug!(gross = %stated_income, %net, "converted gross salary to post-tax income");
        net
    } else {
        stated_income
    };

    let mut scenario = ScenarioInputs::new(
        income,
        args.growth_rate
            .ok_or("--growth-rate is required (or provide --input)")?,
        args.working_years
            .ok_or("--working-years is required (or provide --input)")?,
        args.retirement_years
            .ok_or("--retirement-years is required (or provide --input)")?,
    );
    scenario.filing_status = filing_status;
    if let Some(goal) = args.goal {
        scenario.goal = goal;
    }
    if let Some(rate) = args.inflation_rate {
        scenario.inflation_rate = rate;
    }
    if let Some(rate) = args.employer_match {
        scenario.employer_match = rate;
    }
    if let Some(limit) = args.limit_401k {
        scenario.contribution_limit_401k = limit;
    }
    if let Some(limit) = args.limit_ira {
        scenario.contribution_limit_ira = limit;
    }
    if let Some(drag) = args.capital_gains_drag {
        scenario.capital_gains_drag = drag;
    }
    scenario.current_gross_income = args
        .current_gross_income
        .or(args.gross.then_some(stated_income));
    Ok(scenario)
}

/// Account with the lowest yearly contribution among those that stay
/// within their ceiling.
fn recommend(analysis: &AnalysisResult) -> Option<(AccountType, Decimal)> {
    analysis
        .accounts
        .iter()
        .filter(|(_, r)| r.contribution_limit_exceeded != Some(LimitStatus::Yes))
        .min_by_key(|(_, r)| r.yearly_contribution)
        .map(|(account, r)| (*account, r.yearly_contribution))
}

pub fn run_analyze(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = scenario_from_args(&args)?;
    let output = planner::analyze_retirement_options(&scenario)?;
    let recommendation = recommend(&output.result);

    let mut value = serde_json::to_value(output)?;
    if let (Some((account, yearly)), Some(result)) = (
        recommendation,
        value.get_mut("result").and_then(Value::as_object_mut),
    ) {
        result.insert(
            "recommendation".into(),
            json!({
                "account": account,
                "yearly_contribution": yearly,
            }),
        );
    }
    Ok(value)
}

pub fn run_compare_goals(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = scenario_from_args(&args)?;
    let output = planner::compare_goals(&scenario)?;
    Ok(serde_json::to_value(output)?)
}
