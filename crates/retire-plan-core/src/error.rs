use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid filing status '{0}': must be one of single, married_joint, married_separate, head_household")]
    InvalidFilingStatus(String),

    #[error("Rate ordering violated in {context}: return rate {return_rate} must exceed {inflation_rate}")]
    RateOrdering {
        context: String,
        return_rate: Decimal,
        inflation_rate: Decimal,
    },

    #[error("Invalid rate in {context}: {rate} (must be > 0)")]
    InvalidRate { context: String, rate: Decimal },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::SerializationError(e.to_string())
    }
}
