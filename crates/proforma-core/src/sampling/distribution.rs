use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Normal, Triangular};

use crate::error::ProformaError;
use crate::ProformaResult;

/// Probability distribution specification for an uncertain quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DistributionSpec {
    Normal { mean: f64, std_dev: f64 },
    Triangular { low: f64, mode: f64, high: f64 },
}

impl DistributionSpec {
    /// Check the parameter invariants without sampling.
    ///
    /// `field` names the configuration field being validated so the error
    /// points at the offending input.
    pub fn validate(&self, field: &str) -> ProformaResult<()> {
        let fail = |reason: String| {
            Err(ProformaError::InvalidDistributionParameters {
                field: field.to_string(),
                reason,
            })
        };

        match *self {
            DistributionSpec::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() {
                    return fail(format!(
                        "Normal parameters must be finite (mean={mean}, std_dev={std_dev})"
                    ));
                }
                if std_dev < 0.0 {
                    return fail(format!("Standard deviation must be >= 0 (got {std_dev})"));
                }
            }
            DistributionSpec::Triangular { low, mode, high } => {
                if !low.is_finite() || !mode.is_finite() || !high.is_finite() {
                    return fail(format!(
                        "Triangular bounds must be finite (low={low}, mode={mode}, high={high})"
                    ));
                }
                if !(low <= mode && mode <= high) {
                    return fail(format!(
                        "Triangular bounds must satisfy low <= mode <= high \
                         (got low={low}, mode={mode}, high={high})"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Draw a single value from the given distribution using the provided RNG.
///
/// Normal sampling is untruncated; Triangular sampling is bounded by
/// `[low, high]` with peak density at `mode`. Point-mass specifications
/// (`std_dev == 0`, or a triangle collapsed to one point) yield the
/// constant without advancing the RNG.
pub fn sample(rng: &mut StdRng, spec: &DistributionSpec) -> ProformaResult<f64> {
    spec.validate("distribution")?;

    match *spec {
        DistributionSpec::Normal { mean, std_dev } => {
            if std_dev == 0.0 {
                return Ok(mean);
            }
            let n = Normal::new(mean, std_dev).map_err(|e| {
                ProformaError::InvalidDistributionParameters {
                    field: "distribution".into(),
                    reason: format!("Invalid Normal parameters: {e}"),
                }
            })?;
            Ok(rng.sample(n))
        }
        DistributionSpec::Triangular { low, mode, high } => {
            if high == low {
                return Ok(low);
            }
            let t = Triangular::new(low, high, mode).map_err(|e| {
                ProformaError::InvalidDistributionParameters {
                    field: "distribution".into(),
                    reason: format!("Invalid Triangular parameters: {e}"),
                }
            })?;
            Ok(rng.sample(t))
        }
    }
}

/// Draw `n` independent samples from the given distribution.
pub fn sample_n(rng: &mut StdRng, spec: &DistributionSpec, n: usize) -> ProformaResult<Vec<f64>> {
    let mut samples = Vec::with_capacity(n);
    for _ in 0..n {
        samples.push(sample(rng, spec)?);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const SEED: u64 = 42;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(SEED)
    }

    #[test]
    fn test_normal_sample_statistics() {
        let spec = DistributionSpec::Normal {
            mean: 100.0,
            std_dev: 10.0,
        };
        let samples = sample_n(&mut rng(), &spec, 50_000).unwrap();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!((mean - 100.0).abs() < 0.5, "mean={mean}");
        assert!((var.sqrt() - 10.0).abs() < 0.5, "std_dev={}", var.sqrt());
    }

    #[test]
    fn test_triangular_samples_stay_in_bounds() {
        let spec = DistributionSpec::Triangular {
            low: 20_000_000.0,
            mode: 42_300_000.0,
            high: 130_000_000.0,
        };
        let samples = sample_n(&mut rng(), &spec, 10_000).unwrap();

        assert!(samples.iter().all(|&v| (20_000_000.0..=130_000_000.0).contains(&v)));

        // Triangular mean = (low + mode + high) / 3
        let expected_mean = (20_000_000.0 + 42_300_000.0 + 130_000_000.0) / 3.0;
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(
            (mean - expected_mean).abs() / expected_mean < 0.02,
            "mean={mean}, expected={expected_mean}"
        );
    }

    #[test]
    fn test_seeded_reproducibility() {
        let spec = DistributionSpec::Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        let a = sample_n(&mut rng(), &spec, 100).unwrap();
        let b = sample_n(&mut rng(), &spec, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let spec = DistributionSpec::Normal {
            mean: 0.0,
            std_dev: -1.0,
        };
        assert!(matches!(
            sample(&mut rng(), &spec),
            Err(ProformaError::InvalidDistributionParameters { .. })
        ));
    }

    #[test]
    fn test_unordered_triangle_rejected() {
        let spec = DistributionSpec::Triangular {
            low: 10.0,
            mode: 5.0,
            high: 20.0,
        };
        assert!(matches!(
            sample(&mut rng(), &spec),
            Err(ProformaError::InvalidDistributionParameters { .. })
        ));
    }

    #[test]
    fn test_non_finite_parameter_rejected() {
        let spec = DistributionSpec::Triangular {
            low: f64::NEG_INFINITY,
            mode: 0.0,
            high: 1.0,
        };
        assert!(spec.validate("residential_sales").is_err());
    }

    #[test]
    fn test_point_mass_specs() {
        let constant_normal = DistributionSpec::Normal {
            mean: 7.5,
            std_dev: 0.0,
        };
        assert_eq!(sample(&mut rng(), &constant_normal).unwrap(), 7.5);

        let constant_triangle = DistributionSpec::Triangular {
            low: 3.0,
            mode: 3.0,
            high: 3.0,
        };
        assert_eq!(sample(&mut rng(), &constant_triangle).unwrap(), 3.0);
    }
}
