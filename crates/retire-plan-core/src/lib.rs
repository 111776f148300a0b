pub mod accounts;
pub mod assumptions;
pub mod error;
pub mod goals;
pub mod planner;
pub mod tax;
pub mod time_value;
pub mod types;

pub use error::PlanError;
pub use types::*;

pub use accounts::{AccountResult, AccountType, LimitStatus, MetricValue};
pub use goals::{principal_for_goal, FinancialGoal};
pub use planner::{analyze_retirement_options, compare_goals, AnalysisResult, ScenarioInputs};
pub use tax::{capital_gains_tax, post_tax_income, FilingStatus, TaxTables};
pub use time_value::required_contribution;

/// Standard result type for all retirement-planning operations
pub type PlanResult<T> = Result<T, PlanError>;
