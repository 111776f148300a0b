use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use retire_plan_core::tax::{FilingStatus, TaxTables};

/// Arguments for the wage tax breakdown
#[derive(Args)]
pub struct TaxArgs {
    /// Gross annual wages
    #[arg(long)]
    pub income: Option<Decimal>,

    /// single, married_joint, married_separate or head_household
    #[arg(long, default_value = "single")]
    pub filing_status: FilingStatus,
}

/// Arguments for long-term capital gains tax
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Realized long-term gain
    #[arg(long)]
    pub gain: Option<Decimal>,

    /// Other taxable income the gain stacks on
    #[arg(long, default_value = "0")]
    pub other_income: Decimal,

    /// single, married_joint, married_separate or head_household
    #[arg(long, default_value = "single")]
    pub filing_status: FilingStatus,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let income = args.income.ok_or("--income is required")?;
    let tables = TaxTables::default();
    let breakdown = tables.income_tax_breakdown(income, args.filing_status)?;
    Ok(json!({
        "tax_year": tables.tax_year,
        "result": breakdown,
    }))
}

pub fn run_capital_gains(args: CapitalGainsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gain = args.gain.ok_or("--gain is required")?;
    let tables = TaxTables::default();
    let tax = tables.capital_gains_tax(gain, args.other_income, args.filing_status)?;
    let effective_rate = if gain.is_zero() {
        Decimal::ZERO
    } else {
        tax / gain
    };
    Ok(json!({
        "tax_year": tables.tax_year,
        "result": {
            "gain": gain,
            "other_income": args.other_income,
            "filing_status": args.filing_status,
            "tax": tax,
            "effective_rate": effective_rate,
        },
    }))
}
