use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::ProformaError;
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Summary statistics over one NPV sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (n−1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Welch two-sample t-test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Both readings of the negative-outcome metric, deliberately side by
/// side: the source material describes a "proportion" but computes an
/// odds-of-counts ratio, so neither is silently preferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownsideMetrics {
    pub negative_count: usize,
    pub non_negative_count: usize,
    /// count(NPV < 0) / count(NPV >= 0); None when nothing is non-negative
    pub shortfall_odds: Option<f64>,
    /// count(NPV < 0) / n
    pub shortfall_proportion: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with the n−1 denominator. Callers guarantee n >= 2.
fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// A constant sample has zero variance by definition, even when the
/// rounded mean would make the two-pass formula report residual noise.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarize a sample. At least two observations are required.
pub fn summarize(values: &[f64]) -> ProformaResult<SummaryStats> {
    if values.len() < 2 {
        return Err(ProformaError::DegenerateSample(format!(
            "summary statistics need at least 2 observations, got {}",
            values.len()
        )));
    }

    let m = mean(values);
    let std_dev = if is_constant(values) {
        0.0
    } else {
        sample_variance(values, m).sqrt()
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(SummaryStats {
        n: values.len(),
        mean: m,
        std_dev,
        min,
        max,
    })
}

/// Welch two-sample t-test comparing two NPV distributions.
///
/// Reports the t statistic, the Welch–Satterthwaite degrees of freedom and
/// the two-sided p-value from the Student's t CDF. A sample tested against
/// itself yields statistic 0 and p-value 1.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> ProformaResult<TTestResult> {
    if a.len() < 2 || b.len() < 2 {
        return Err(ProformaError::DegenerateSample(format!(
            "t-test needs at least 2 observations per sample (got {} and {})",
            a.len(),
            b.len()
        )));
    }

    if is_constant(a) || is_constant(b) {
        return Err(ProformaError::DegenerateSample(
            "t-test requires nonzero variance in both samples".into(),
        ));
    }

    let (mean_a, mean_b) = (mean(a), mean(b));
    let (var_a, var_b) = (sample_variance(a, mean_a), sample_variance(b, mean_b));

    // Distinct values can still underflow to a zero variance
    if var_a == 0.0 || var_b == 0.0 {
        return Err(ProformaError::DegenerateSample(
            "t-test requires nonzero variance in both samples".into(),
        ));
    }

    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let (se_a, se_b) = (var_a / n_a, var_b / n_b);

    let statistic = (mean_a - mean_b) / (se_a + se_b).sqrt();
    let degrees_of_freedom =
        (se_a + se_b).powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));

    let t_dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|e| {
        ProformaError::InvalidInput {
            field: "degrees_of_freedom".into(),
            reason: e.to_string(),
        }
    })?;
    let p_value = 2.0 * (1.0 - t_dist.cdf(statistic.abs()));

    Ok(TTestResult {
        statistic,
        degrees_of_freedom,
        p_value,
    })
}

/// Count-based downside metrics over one NPV sample.
pub fn downside_metrics(values: &[f64]) -> DownsideMetrics {
    let negative_count = values.iter().filter(|v| **v < 0.0).count();
    let non_negative_count = values.len() - negative_count;

    let shortfall_odds =
        (non_negative_count > 0).then(|| negative_count as f64 / non_negative_count as f64);
    let shortfall_proportion = if values.is_empty() {
        0.0
    } else {
        negative_count as f64 / values.len() as f64
    };

    DownsideMetrics {
        negative_count,
        non_negative_count,
        shortfall_odds,
        shortfall_proportion,
    }
}
