use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::sampling::distribution::{self, DistributionSpec};
use crate::sampling::outlook::OutlookCategory;
use crate::types::Trial;
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Office gap model
// ---------------------------------------------------------------------------

/// Normal parameters for one outlook category's sales gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapParams {
    pub mean: f64,
    pub std_dev: f64,
}

/// Gap between realized and previously stated office sales, conditioned
/// on the macro outlook: one Normal parameter pair per category.
///
/// Keeping the category branching inside this lookup leaves the sampler
/// and the forecast operations free of outlook conditionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeGapModel {
    pub pessimistic: GapParams,
    pub neutral: GapParams,
    pub optimistic: GapParams,
}

impl Default for OfficeGapModel {
    /// Reference gap parameters estimated from the historical sales record.
    fn default() -> Self {
        Self {
            pessimistic: GapParams {
                mean: -10_897_290.0,
                std_dev: 4_846_559.0,
            },
            neutral: GapParams {
                mean: 1_318_240.0,
                std_dev: 4_699_856.0,
            },
            optimistic: GapParams {
                mean: 8_807_820.0,
                std_dev: 5_718_097.0,
            },
        }
    }
}

impl OfficeGapModel {
    /// Parameter pair for the given outlook category.
    pub fn params(&self, outlook: OutlookCategory) -> GapParams {
        match outlook {
            OutlookCategory::Pessimistic => self.pessimistic,
            OutlookCategory::Neutral => self.neutral,
            OutlookCategory::Optimistic => self.optimistic,
        }
    }

    /// The gap distribution for the given outlook category.
    pub fn gap_distribution(&self, outlook: OutlookCategory) -> DistributionSpec {
        let GapParams { mean, std_dev } = self.params(outlook);
        DistributionSpec::Normal { mean, std_dev }
    }

    pub fn validate(&self) -> ProformaResult<()> {
        for (category, field) in [
            (OutlookCategory::Pessimistic, "office_gap_params.pessimistic"),
            (OutlookCategory::Neutral, "office_gap_params.neutral"),
            (OutlookCategory::Optimistic, "office_gap_params.optimistic"),
        ] {
            self.gap_distribution(category).validate(field)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reference parameters
// ---------------------------------------------------------------------------

/// Historical mean office sales; gap draws are offsets from this figure.
pub const OFFICE_SALES_BASELINE: f64 = 65_153_540.0;

/// Reference triangle for residential total sales. The lower bound makes
/// negative sales unrepresentable.
pub fn residential_sales_triangle() -> DistributionSpec {
    DistributionSpec::Triangular {
        low: 20_000_000.0,
        mode: 42_300_000.0,
        high: 130_000_000.0,
    }
}

/// Reference triangle for residential construction cost: ±10% around the
/// expected 20,000,000.
pub fn residential_cost_triangle() -> DistributionSpec {
    DistributionSpec::Triangular {
        low: 18_000_000.0,
        mode: 20_000_000.0,
        high: 22_000_000.0,
    }
}

// ---------------------------------------------------------------------------
// Forecast operations
// ---------------------------------------------------------------------------

/// Forecast `n` office total-sales figures conditioned on the outlook.
///
/// Each figure is one gap draw added to the historical baseline, so the
/// batch mean equals the mean of the gap samples plus the baseline.
pub fn forecast_office_sales(
    rng: &mut StdRng,
    model: &OfficeGapModel,
    outlook: OutlookCategory,
    baseline: f64,
    n: usize,
) -> ProformaResult<Vec<f64>> {
    let gaps = distribution::sample_n(rng, &model.gap_distribution(outlook), n)?;
    Ok(gaps.into_iter().map(|gap| baseline + gap).collect())
}

/// Forecast `n` residential total-sales figures from the sales triangle.
pub fn forecast_residential_sales(
    rng: &mut StdRng,
    triangle: &DistributionSpec,
    n: usize,
) -> ProformaResult<Vec<f64>> {
    distribution::sample_n(rng, triangle, n)
}

/// Draw `n` independent residential construction costs.
pub fn sample_construction_costs(
    rng: &mut StdRng,
    triangle: &DistributionSpec,
    n: usize,
) -> ProformaResult<Vec<f64>> {
    distribution::sample_n(rng, triangle, n)
}

/// Assemble one trial: one office gap draw, one residential sales draw and
/// one construction cost draw, in that fixed order.
pub fn forecast_trial(
    rng: &mut StdRng,
    gap_model: &OfficeGapModel,
    office_baseline: f64,
    residential_sales: &DistributionSpec,
    residential_cost: &DistributionSpec,
    outlook: OutlookCategory,
    index: usize,
) -> ProformaResult<Trial> {
    let gap = distribution::sample(rng, &gap_model.gap_distribution(outlook))?;
    let total_sales = distribution::sample(rng, residential_sales)?;
    let construction_cost = distribution::sample(rng, residential_cost)?;

    Ok(Trial {
        index,
        outlook,
        office_total_sales: office_baseline + gap,
        residential_total_sales: total_sales,
        residential_construction_cost: construction_cost,
    })
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
    fn test_gap_lookup_is_closed_over_categories() {
        let model = OfficeGapModel::default();
        assert_eq!(model.params(OutlookCategory::Pessimistic).mean, -10_897_290.0);
        assert_eq!(model.params(OutlookCategory::Neutral).mean, 1_318_240.0);
        assert_eq!(model.params(OutlookCategory::Optimistic).mean, 8_807_820.0);
    }

    #[test]
    fn test_office_forecast_mean_tracks_category() {
        let model = OfficeGapModel::default();
        let n = 50_000;

        for outlook in OutlookCategory::ALL {
            let sales =
                forecast_office_sales(&mut rng(), &model, outlook, OFFICE_SALES_BASELINE, n)
                    .unwrap();
            assert_eq!(sales.len(), n);

            let mean = sales.iter().sum::<f64>() / n as f64;
            let expected = OFFICE_SALES_BASELINE + model.params(outlook).mean;
            // 4 standard errors of the mean
            let tolerance = 4.0 * model.params(outlook).std_dev / (n as f64).sqrt();
            assert!(
                (mean - expected).abs() < tolerance,
                "outlook={outlook:?}, mean={mean}, expected={expected}"
            );
        }
    }

    #[test]
    fn test_residential_sales_bounded() {
        let sales =
            forecast_residential_sales(&mut rng(), &residential_sales_triangle(), 10_000).unwrap();
        assert!(sales
            .iter()
            .all(|&v| (20_000_000.0..=130_000_000.0).contains(&v)));
    }

    #[test]
    fn test_construction_costs_bounded() {
        let costs =
            sample_construction_costs(&mut rng(), &residential_cost_triangle(), 10_000).unwrap();
        assert!(costs
            .iter()
            .all(|&v| (18_000_000.0..=22_000_000.0).contains(&v)));
    }

    #[test]
    fn test_forecast_trial_is_deterministic_per_seed() {
        let model = OfficeGapModel::default();
        let sales = residential_sales_triangle();
        let cost = residential_cost_triangle();

        let a = forecast_trial(
            &mut rng(),
            &model,
            OFFICE_SALES_BASELINE,
            &sales,
            &cost,
            OutlookCategory::Neutral,
            7,
        )
        .unwrap();
        let b = forecast_trial(
            &mut rng(),
            &model,
            OFFICE_SALES_BASELINE,
            &sales,
            &cost,
            OutlookCategory::Neutral,
            7,
        )
        .unwrap();

        assert_eq!(a.index, 7);
        assert_eq!(a.office_total_sales, b.office_total_sales);
        assert_eq!(a.residential_total_sales, b.residential_total_sales);
        assert_eq!(
            a.residential_construction_cost,
            b.residential_construction_cost
        );
    }

    #[test]
    fn test_invalid_gap_params_rejected() {
        let mut model = OfficeGapModel::default();
        model.neutral.std_dev = -1.0;
        assert!(model.validate().is_err());
    }
}
