use serde::{Deserialize, Serialize};

use super::loan::LoanTerms;

/// Calendar offsets, in years from loan origination, of the five
/// appraisal periods. Shared with the discounting engine.
pub const PERIOD_OFFSETS: [f64; 5] = [0.0, 0.25, 1.0, 2.0, 3.0];

// ---------------------------------------------------------------------------
// Development schedule constants
// ---------------------------------------------------------------------------

/// Loan proceeds reaching the borrower at origination, net of fees.
const NET_LOAN_PROCEEDS: f64 = 37_875_000.0;

/// Office project: land acquisition and construction, all-in, at month 3.
const OFFICE_DEVELOPMENT_OUTLAY: f64 = -24_375_000.0;

/// Residential project: land acquisition at month 3; the trial's
/// construction-cost draw is added on top.
const RESIDENTIAL_LAND_OUTLAY: f64 = -4_375_000.0;

/// Development costs falling due at the end of years one and two.
const YEAR_ONE_COSTS: f64 = -9_000_000.0;
const YEAR_TWO_COSTS: f64 = -12_500_000.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Ordered five-period cash-flow vector for one (stakeholder, project,
/// trial) combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowVector {
    /// Signed amounts, one per entry of [`PERIOD_OFFSETS`]
    pub amounts: [f64; 5],
}

impl CashFlowVector {
    pub fn new(amounts: [f64; 5]) -> Self {
        Self { amounts }
    }

    /// Undiscounted sum of all five periods.
    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    /// The maturity-period amount.
    pub fn terminal(&self) -> f64 {
        self.amounts[4]
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Borrower cash flows for the office project: fixed development schedule,
/// then sales less the loan obligation at maturity.
pub fn borrower_office(office_total_sales: f64, loan: &LoanTerms) -> CashFlowVector {
    CashFlowVector::new([
        NET_LOAN_PROCEEDS,
        OFFICE_DEVELOPMENT_OUTLAY,
        YEAR_ONE_COSTS,
        YEAR_TWO_COSTS,
        office_total_sales - loan.obligation,
    ])
}

/// Borrower cash flows for the residential project. The month-3 outlay
/// absorbs the trial's construction-cost draw; the rest of the schedule
/// matches the office project.
pub fn borrower_residential(
    residential_total_sales: f64,
    construction_cost: f64,
    loan: &LoanTerms,
) -> CashFlowVector {
    CashFlowVector::new([
        NET_LOAN_PROCEEDS,
        RESIDENTIAL_LAND_OUTLAY - construction_cost,
        YEAR_ONE_COSTS,
        YEAR_TWO_COSTS,
        residential_total_sales - loan.obligation,
    ])
}

/// Lender cash flows for either project: principal disbursed at
/// origination, nothing until maturity, then the recourse-clamped
/// collection.
pub fn lender(total_sales: f64, loan: &LoanTerms) -> CashFlowVector {
    CashFlowVector::new([
        -loan.principal,
        0.0,
        0.0,
        0.0,
        lender_terminal(total_sales, loan.obligation),
    ])
}

/// Terminal settlement under the recourse clause. By loan covenant the
/// lender has first claim on all sale proceeds up to the full obligation;
/// the borrower absorbs any shortfall with no further recourse.
///
/// - sales above the obligation: the lender collects the obligation in full
/// - sales between zero and the obligation: the lender collects the sales
/// - non-positive sales: the lender collects nothing
pub fn lender_terminal(total_sales: f64, obligation: f64) -> f64 {
    total_sales.clamp(0.0, obligation)
}
