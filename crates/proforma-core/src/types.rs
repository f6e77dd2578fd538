use serde::{Deserialize, Serialize};

use crate::sampling::outlook::OutlookCategory;

/// Which side of the loan a cash-flow vector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stakeholder {
    Borrower,
    Lender,
}

/// The two competing development projects under appraisal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Project {
    Office,
    Residential,
}

/// One independent Monte Carlo sample path through the sales/cost model.
///
/// Produced once per simulation iteration by the forecast stage and
/// consumed read-only downstream; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Trial index within the run
    pub index: usize,
    /// The run-level outlook shared by every trial
    pub outlook: OutlookCategory,
    /// Total office sales: outlook-conditioned gap draw plus baseline
    pub office_total_sales: f64,
    /// Total residential sales drawn from the sales triangle
    pub residential_total_sales: f64,
    /// Residential construction cost drawn from the cost triangle
    pub residential_construction_cost: f64,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}
