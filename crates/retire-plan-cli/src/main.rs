mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::contribution::ContributionArgs;
use commands::plan::ScenarioArgs;
use commands::tax::{CapitalGainsArgs, TaxArgs};

/// Goal-based retirement projections across account types
#[derive(Parser)]
#[command(
    name = "rplan",
    version,
    about = "Goal-based retirement projections across account types",
    long_about = "A CLI for sizing retirement savings with decimal precision. \
                  Computes the principal and yearly contribution each account type \
                  (brokerage, traditional/Roth IRA, traditional/Roth 401k) needs to \
                  fund a retirement goal, plus the federal tax figures behind them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log projection milestones to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Principal and yearly contribution for every account type
    Analyze(ScenarioArgs),
    /// Goal-by-account matrix of principal and yearly contribution
    CompareGoals(ScenarioArgs),
    /// Federal income tax and FICA on wages
    Tax(TaxArgs),
    /// Long-term capital gains tax stacked on other income
    CapitalGains(CapitalGainsArgs),
    /// Level yearly contribution needed to reach a target
    Contribution(ContributionArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::plan::run_analyze(args),
        Commands::CompareGoals(args) => commands::plan::run_compare_goals(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::CapitalGains(args) => commands::tax::run_capital_gains(args),
        Commands::Contribution(args) => commands::contribution::run_contribution(args),
        Commands::Version => {
            println!("rplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
