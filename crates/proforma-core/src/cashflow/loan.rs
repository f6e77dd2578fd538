use serde::{Deserialize, Serialize};

use crate::discount;
use crate::error::ProformaError;
use crate::ProformaResult;

/// Terms of the single bullet-repayment loan financing either project.
///
/// The obligation is the fixed principal-plus-accrued-interest sum owed at
/// maturity; it is constant across all trials and both projects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount disbursed to the borrower at origination
    pub principal: f64,
    /// Annual stated lending rate
    pub stated_rate: f64,
    /// Loan term in years
    pub term_years: u32,
    /// Fixed sum owed at maturity (principal plus accrued interest)
    pub obligation: f64,
}

impl LoanTerms {
    /// Bullet loan: the obligation compounds the stated rate over the term.
    pub fn bullet(principal: f64, stated_rate: f64, term_years: u32) -> ProformaResult<Self> {
        let obligation = discount::future_value(principal, stated_rate, term_years)?;
        Ok(Self {
            principal,
            stated_rate,
            term_years,
            obligation,
        })
    }

    /// Loan terms with an externally supplied obligation.
    pub fn with_obligation(
        principal: f64,
        stated_rate: f64,
        term_years: u32,
        obligation: f64,
    ) -> Self {
        Self {
            principal,
            stated_rate,
            term_years,
            obligation,
        }
    }

    pub fn validate(&self) -> ProformaResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(ProformaError::InvalidInput {
                field: "loan.principal".into(),
                reason: format!("Principal must be positive (got {})", self.principal),
            });
        }
        if !(self.stated_rate > -1.0) {
            return Err(ProformaError::InvalidInput {
                field: "loan.stated_rate".into(),
                reason: "Stated rate must be greater than -100%".into(),
            });
        }
        if !self.obligation.is_finite() || self.obligation < 0.0 {
            return Err(ProformaError::InvalidInput {
                field: "loan.obligation".into(),
                reason: format!("Obligation must be non-negative (got {})", self.obligation),
            });
        }
        Ok(())
    }
}

impl Default for LoanTerms {
    /// Reference loan: 38,375,000 at a stated 7% over a 3-year term.
    fn default() -> Self {
        let principal = 38_375_000.0_f64;
        let stated_rate = 0.07_f64;
        let term_years = 3;
        Self {
            principal,
            stated_rate,
            term_years,
            obligation: principal * (1.0 + stated_rate).powi(term_years as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_obligation_compounds_over_term() {
        let loan = LoanTerms::bullet(38_375_000.0, 0.07, 3).unwrap();
        let expected = 38_375_000.0 * 1.07_f64.powi(3);
        assert!((loan.obligation - expected).abs() < 1e-6);
        assert_eq!(loan, LoanTerms::default());
    }

    #[test]
    fn test_explicit_obligation_is_kept_verbatim() {
        let loan = LoanTerms::with_obligation(38_375_000.0, 0.07, 3, 47_011_025.0);
        assert_eq!(loan.obligation, 47_011_025.0);
    }

    #[test]
    fn test_non_positive_principal_rejected() {
        let loan = LoanTerms::with_obligation(0.0, 0.07, 3, 1.0);
        assert!(loan.validate().is_err());
    }

    #[test]
    fn test_negative_obligation_rejected() {
        let loan = LoanTerms::with_obligation(1_000.0, 0.07, 3, -1.0);
        assert!(loan.validate().is_err());
    }
}
