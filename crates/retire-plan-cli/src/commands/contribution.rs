use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use retire_plan_core::time_value::required_contribution;

/// Arguments for contribution sizing
#[derive(Args)]
pub struct ContributionArgs {
    /// Balance to reach (e.g. a retirement principal or a down payment)
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Annual growth rate (e.g. 0.07 for 7%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of yearly contributions
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_contribution(args: ContributionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let target = args.target.ok_or("--target is required")?;
    let rate = args.rate.ok_or("--rate is required")?;
    let years = args.years.ok_or("--years is required")?;

    let contribution = required_contribution(target, rate, years)?;
    Ok(json!({
        "result": {
            "target": target,
            "rate": rate,
            "years": years,
            "contribution": contribution,
            "total_contributed": contribution * Decimal::from(years),
        },
    }))
}
