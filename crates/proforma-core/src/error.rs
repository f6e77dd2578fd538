use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProformaError {
    #[error("Invalid distribution parameters: {field} — {reason}")]
    InvalidDistributionParameters { field: String, reason: String },

    #[error("Invalid trial count: {0} (at least one trial is required)")]
    InvalidTrialCount(u32),

    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProformaError {
    fn from(e: serde_json::Error) -> Self {
        ProformaError::SerializationError(e.to_string())
    }
}
