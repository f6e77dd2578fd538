pub mod cashflow;
pub mod discount;
pub mod error;
pub mod forecast;
pub mod sampling;
pub mod sensitivity;
pub mod simulation;
pub mod stats;
pub mod types;

pub use error::ProformaError;
pub use types::*;

/// Standard result type for all proforma operations
pub type ProformaResult<T> = Result<T, ProformaError>;
