use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cashflow::assembler;
use crate::cashflow::loan::LoanTerms;
use crate::discount;
use crate::error::ProformaError;
use crate::forecast::sales::{self, OfficeGapModel};
use crate::sampling::distribution::DistributionSpec;
use crate::sampling::outlook::{self, OutlookCategory, OutlookWeights};
use crate::stats::comparator::{self, DownsideMetrics, SummaryStats, TTestResult};
use crate::types::{with_metadata, ComputationOutput, Project, Stakeholder, Trial};
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Complete configuration of one simulation run.
///
/// A run is fully reproducible from this value alone: every random draw
/// derives from `rng_seed`, and every other field is immutable for the
/// duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of Monte Carlo trials
    #[serde(default = "default_trial_count")]
    pub trial_count: u32,
    /// Master seed; trial `i` samples from a sub-stream seeded
    /// `rng_seed ^ i`
    #[serde(default)]
    pub rng_seed: u64,
    /// Outlook selection weights for the single run-level draw
    #[serde(default)]
    pub outlook_weights: OutlookWeights,
    /// Office sales-gap parameters per outlook category
    #[serde(default)]
    pub office_gap_params: OfficeGapModel,
    /// Historical mean office sales the gap draws offset
    #[serde(default = "default_office_baseline")]
    pub office_sales_baseline: f64,
    /// Distribution of residential total sales
    #[serde(default = "sales::residential_sales_triangle")]
    pub residential_sales: DistributionSpec,
    /// Distribution of residential construction cost
    #[serde(default = "sales::residential_cost_triangle")]
    pub residential_cost: DistributionSpec,
    /// Bullet-loan terms shared by both projects
    #[serde(default)]
    pub loan: LoanTerms,
    /// Borrower discount rate (the stated lending rate)
    #[serde(default = "default_borrower_discount_rate")]
    pub borrower_discount_rate: f64,
    /// Lender discount rate (its cost of funds)
    #[serde(default = "default_lender_discount_rate")]
    pub lender_discount_rate: f64,
}

fn default_trial_count() -> u32 {
    10_000
}

fn default_office_baseline() -> f64 {
    sales::OFFICE_SALES_BASELINE
}

fn default_borrower_discount_rate() -> f64 {
    0.07
}

fn default_lender_discount_rate() -> f64 {
    0.06
}

impl Default for SimulationConfig {
    /// The reference parameter set.
    fn default() -> Self {
        Self {
            trial_count: default_trial_count(),
            rng_seed: 0,
            outlook_weights: OutlookWeights::default(),
            office_gap_params: OfficeGapModel::default(),
            office_sales_baseline: default_office_baseline(),
            residential_sales: sales::residential_sales_triangle(),
            residential_cost: sales::residential_cost_triangle(),
            loan: LoanTerms::default(),
            borrower_discount_rate: default_borrower_discount_rate(),
            lender_discount_rate: default_lender_discount_rate(),
        }
    }
}

impl SimulationConfig {
    /// Validate everything up front, before any sampling starts.
    pub fn validate(&self) -> ProformaResult<()> {
        if self.trial_count == 0 {
            return Err(ProformaError::InvalidTrialCount(self.trial_count));
        }
        if self.outlook_weights.total() == 0 {
            return Err(ProformaError::InvalidInput {
                field: "outlook_weights".into(),
                reason: "At least one outlook weight must be positive".into(),
            });
        }
        self.office_gap_params.validate()?;
        if !self.office_sales_baseline.is_finite() {
            return Err(ProformaError::InvalidInput {
                field: "office_sales_baseline".into(),
                reason: "Baseline must be finite".into(),
            });
        }
        self.residential_sales.validate("residential_sales")?;
        self.residential_cost.validate("residential_cost")?;
        self.loan.validate()?;
        for (field, rate) in [
            ("borrower_discount_rate", self.borrower_discount_rate),
            ("lender_discount_rate", self.lender_discount_rate),
        ] {
            if !(rate > -1.0) {
                return Err(ProformaError::InvalidInput {
                    field: field.into(),
                    reason: "Discount rate must be greater than -100%".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// NPV sample and its statistics for one (stakeholder, project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAppraisal {
    pub project: Project,
    /// Present value of every trial's cash-flow vector, in trial order
    pub npv_sample: Vec<f64>,
    pub stats: SummaryStats,
    pub downside: DownsideMetrics,
}

/// Office-versus-residential comparison for one stakeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderComparison {
    pub stakeholder: Stakeholder,
    pub discount_rate: f64,
    pub office: ProjectAppraisal,
    pub residential: ProjectAppraisal,
    /// Welch t-test of office versus residential NPVs; None when the
    /// samples were degenerate (reported as a run warning)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_test: Option<TTestResult>,
}

/// Output of a full simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trial_count: u32,
    /// The run-level outlook shared by every trial
    pub outlook: OutlookCategory,
    pub borrower: StakeholderComparison,
    pub lender: StakeholderComparison,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run the per-trial sampling stage in parallel.
///
/// Trial `i` draws from an independent sub-stream seeded `rng_seed ^ i`,
/// so the result is bit-identical for any worker count or scheduling
/// order. A sampling failure aborts the whole stage; trials never skip
/// silently.
pub fn simulate_trials(
    config: &SimulationConfig,
    outlook: OutlookCategory,
) -> ProformaResult<Vec<Trial>> {
    (0..config.trial_count as usize)
        .into_par_iter()
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(config.rng_seed ^ index as u64);
            sales::forecast_trial(
                &mut rng,
                &config.office_gap_params,
                config.office_sales_baseline,
                &config.residential_sales,
                &config.residential_cost,
                outlook,
                index,
            )
        })
        .collect()
}

/// Run the full simulation: one outlook draw, parallel trials, cash-flow
/// assembly, discounting and aggregation.
pub fn run_simulation(
    config: &SimulationConfig,
) -> ProformaResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;

    // One outlook draw per run: the macro outlook persists across the
    // loan term, so every trial shares it.
    let mut master_rng = StdRng::seed_from_u64(config.rng_seed);
    let outlook = outlook::draw_outlook(&mut master_rng, &config.outlook_weights)?;

    let trials = simulate_trials(config, outlook)?;

    // Assemble and discount the four cash-flow vectors of every trial.
    let npvs: Vec<[f64; 4]> = trials
        .par_iter()
        .map(|trial| -> ProformaResult<[f64; 4]> {
            let borrower_office_flows =
                assembler::borrower_office(trial.office_total_sales, &config.loan);
            let borrower_residential_flows = assembler::borrower_residential(
                trial.residential_total_sales,
                trial.residential_construction_cost,
                &config.loan,
            );
            let lender_office_flows = assembler::lender(trial.office_total_sales, &config.loan);
            let lender_residential_flows =
                assembler::lender(trial.residential_total_sales, &config.loan);

            Ok([
                discount::npv(&borrower_office_flows, config.borrower_discount_rate)?,
                discount::npv(&borrower_residential_flows, config.borrower_discount_rate)?,
                discount::npv(&lender_office_flows, config.lender_discount_rate)?,
                discount::npv(&lender_residential_flows, config.lender_discount_rate)?,
            ])
        })
        .collect::<ProformaResult<Vec<_>>>()?;

    // Single-writer reduction into the four per-combination samples.
    let mut borrower_office = Vec::with_capacity(npvs.len());
    let mut borrower_residential = Vec::with_capacity(npvs.len());
    let mut lender_office = Vec::with_capacity(npvs.len());
    let mut lender_residential = Vec::with_capacity(npvs.len());
    for [bo, br, lo, lr] in &npvs {
        borrower_office.push(*bo);
        borrower_residential.push(*br);
        lender_office.push(*lo);
        lender_residential.push(*lr);
    }

    let borrower = compare(
        Stakeholder::Borrower,
        config.borrower_discount_rate,
        borrower_office,
        borrower_residential,
        &mut warnings,
    )?;
    let lender = compare(
        Stakeholder::Lender,
        config.lender_discount_rate,
        lender_office,
        lender_residential,
        &mut warnings,
    )?;

    let result = SimulationResult {
        trial_count: config.trial_count,
        outlook,
        borrower,
        lender,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Project Appraisal",
        &serde_json::json!({
            "trial_count": config.trial_count,
            "rng_seed": config.rng_seed,
            "outlook": outlook,
            "loan_principal": config.loan.principal,
            "loan_obligation": config.loan.obligation,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Aggregate one stakeholder's two NPV samples.
///
/// A degenerate significance test — for example the lender sample
/// collapsing onto the obligation when every trial repays in full — is
/// recoverable: it becomes a warning and a `None` test result instead of
/// aborting the run.
fn compare(
    stakeholder: Stakeholder,
    discount_rate: f64,
    office_npvs: Vec<f64>,
    residential_npvs: Vec<f64>,
    warnings: &mut Vec<String>,
) -> ProformaResult<StakeholderComparison> {
    let t_test = match comparator::welch_t_test(&office_npvs, &residential_npvs) {
        Ok(test) => Some(test),
        Err(ProformaError::DegenerateSample(reason)) => {
            warnings.push(format!(
                "{stakeholder:?} office-vs-residential t-test skipped: {reason}"
            ));
            None
        }
        Err(e) => return Err(e),
    };

    Ok(StakeholderComparison {
        stakeholder,
        discount_rate,
        office: appraise(Project::Office, office_npvs)?,
        residential: appraise(Project::Residential, residential_npvs)?,
        t_test,
    })
}

fn appraise(project: Project, npv_sample: Vec<f64>) -> ProformaResult<ProjectAppraisal> {
    let stats = comparator::summarize(&npv_sample)?;
    let downside = comparator::downside_metrics(&npv_sample);
    Ok(ProjectAppraisal {
        project,
        npv_sample,
        stats,
        downside,
    })
}
