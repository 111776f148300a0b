//! Federal income, payroll and capital-gains tax.
//!
//! Tax law is data: every computation is a method on [`TaxTables`], and the
//! free functions run against the default 2024 snapshot.

pub mod capital_gains;
pub mod income;
pub mod tables;

pub use capital_gains::capital_gains_tax;
pub use income::{fica_tax, post_tax_income, IncomeTaxBreakdown};
pub use tables::{FicaParameters, FilingSchedule, FilingStatus, TaxBracket, TaxTables};
