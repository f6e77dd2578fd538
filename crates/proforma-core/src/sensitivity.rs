//! Lending-rate sensitivity analysis: expected terminal loan value across
//! a discrete grid of candidate rates and acceptance probabilities.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::discount;
use crate::error::ProformaError;
use crate::types::{with_metadata, ComputationOutput};
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the lending-rate sensitivity analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Loan principal
    pub principal: f64,
    /// Loan term in years
    pub term_years: u32,
    /// Candidate annual rates, in presentation order
    pub candidate_rates: Vec<f64>,
    /// Borrower acceptance probability for each candidate rate,
    /// one-to-one by index
    pub acceptance_probabilities: Vec<f64>,
}

/// One evaluated cell of the sensitivity grid; immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub candidate_rate: f64,
    pub acceptance_probability: f64,
    /// principal × (1 + rate)^term
    pub future_value: f64,
    /// future_value × acceptance_probability
    pub expected_value: f64,
}

/// Full sensitivity table plus the maximizing rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityTable {
    pub points: Vec<SensitivityPoint>,
    /// Rate with the highest expected value; ties go to the lowest rate
    pub optimal_rate: f64,
    pub optimal_expected_value: f64,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate expected terminal loan value across the candidate-rate grid
/// and report the maximizing rate.
///
/// Fully deterministic; takes no random input. Non-finite future values
/// fail with `NumericOverflow` rather than being clamped.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> ProformaResult<ComputationOutput<SensitivityTable>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    // Validation
    if input.candidate_rates.is_empty() {
        return Err(ProformaError::InvalidInput {
            field: "candidate_rates".into(),
            reason: "At least one candidate rate is required".into(),
        });
    }
    if input.candidate_rates.len() != input.acceptance_probabilities.len() {
        return Err(ProformaError::InvalidInput {
            field: "acceptance_probabilities".into(),
            reason: format!(
                "Must pair one-to-one with candidate_rates ({} rates, {} probabilities)",
                input.candidate_rates.len(),
                input.acceptance_probabilities.len()
            ),
        });
    }
    if !input.principal.is_finite() || input.principal <= 0.0 {
        return Err(ProformaError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal must be positive (got {})", input.principal),
        });
    }
    for &probability in &input.acceptance_probabilities {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ProformaError::InvalidInput {
                field: "acceptance_probabilities".into(),
                reason: format!("Probability must be between 0 and 1 (got {probability})"),
            });
        }
    }

    // Evaluate the grid
    let mut points = Vec::with_capacity(input.candidate_rates.len());
    for (&rate, &probability) in input
        .candidate_rates
        .iter()
        .zip(&input.acceptance_probabilities)
    {
        let future_value = discount::future_value(input.principal, rate, input.term_years)?;
        points.push(SensitivityPoint {
            candidate_rate: rate,
            acceptance_probability: probability,
            future_value,
            expected_value: future_value * probability,
        });
    }

    // Maximizing rate, ties broken by the lowest rate
    let mut best = &points[0];
    for point in &points[1..] {
        if point.expected_value > best.expected_value
            || (point.expected_value == best.expected_value
                && point.candidate_rate < best.candidate_rate)
        {
            best = point;
        }
    }

    let output = SensitivityTable {
        optimal_rate: best.candidate_rate,
        optimal_expected_value: best.expected_value,
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lending-Rate Sensitivity Analysis",
        &serde_json::json!({
            "principal": input.principal,
            "term_years": input.term_years,
            "candidate_rates": input.candidate_rates,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_input() -> SensitivityInput {
        SensitivityInput {
            principal: 38_375_000.0,
            term_years: 3,
            candidate_rates: vec![0.07, 0.08, 0.09, 0.10],
            acceptance_probabilities: vec![1.0, 0.75, 0.5, 0.25],
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = run_sensitivity(&reference_input()).unwrap();
        let table = &result.result;

        // Quoted to the nearest dollar from rounded intermediates, so
        // compared at 0.01% relative tolerance
        let expected = [47_011_030.0, 36_256_137.0, 24_850_119.0, 12_769_281.0];
        for (point, expected) in table.points.iter().zip(expected) {
            assert!(
                (point.expected_value - expected).abs() / expected < 1e-4,
                "rate={}, expected_value={}, reference={expected}",
                point.candidate_rate,
                point.expected_value
            );
        }

        assert_eq!(table.optimal_rate, 0.07);
        assert_eq!(table.optimal_expected_value, table.points[0].expected_value);
    }

    #[test]
    fn test_future_values_compound_exactly() {
        let result = run_sensitivity(&reference_input()).unwrap();
        for point in &result.result.points {
            let exact = 38_375_000.0 * (1.0 + point.candidate_rate).powi(3);
            assert_eq!(point.future_value, exact);
            assert_eq!(
                point.expected_value,
                exact * point.acceptance_probability
            );
        }
    }

    #[test]
    fn test_tie_broken_by_lowest_rate() {
        // 100 × 1.0 at 0% equals 200 × 0.5 at 100%
        let input = SensitivityInput {
            principal: 100.0,
            term_years: 1,
            candidate_rates: vec![1.0, 0.0],
            acceptance_probabilities: vec![0.5, 1.0],
        };
        let result = run_sensitivity(&input).unwrap();
        assert_eq!(result.result.optimal_rate, 0.0);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut input = reference_input();
        input.acceptance_probabilities.pop();
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let input = SensitivityInput {
            principal: 100.0,
            term_years: 3,
            candidate_rates: vec![],
            acceptance_probabilities: vec![],
        };
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut input = reference_input();
        input.acceptance_probabilities[0] = 1.5;
        assert!(matches!(
            run_sensitivity(&input),
            Err(ProformaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_overflow_reported() {
        let input = SensitivityInput {
            principal: f64::MAX,
            term_years: 400,
            candidate_rates: vec![10.0],
            acceptance_probabilities: vec![1.0],
        };
        assert!(matches!(
            run_sensitivity(&input),
            Err(ProformaError::NumericOverflow { .. })
        ));
    }
}
