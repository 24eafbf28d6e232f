use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanEmiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Exchange rate fetch failed for base {base}: {reason}")]
    RateFetch { base: String, reason: String },

    #[error("Malformed rate data: {0}")]
    MalformedRates(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanEmiError {
    fn from(e: serde_json::Error) -> Self {
        LoanEmiError::SerializationError(e.to_string())
    }
}
