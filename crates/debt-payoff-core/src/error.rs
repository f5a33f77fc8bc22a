use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtPayoffError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Debt not found: {0}")]
    DebtNotFound(String),

    #[error("Duplicate debt: a debt named '{0}' already exists")]
    DuplicateDebt(String),

    #[error("Schedule did not terminate within {months} months")]
    NonTerminatingSchedule { months: u32 },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DebtPayoffError {
    fn from(e: serde_json::Error) -> Self {
        DebtPayoffError::SerializationError(e.to_string())
    }
}
