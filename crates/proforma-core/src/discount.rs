//! Present-value discounting over the five fixed appraisal periods.

use crate::cashflow::assembler::{CashFlowVector, PERIOD_OFFSETS};
use crate::error::ProformaError;
use crate::ProformaResult;

/// Net present value of a five-period cash-flow vector.
///
/// `NPV = Σ amount[i] / (1 + rate)^offset[i]` over [`PERIOD_OFFSETS`].
/// A pure fold: the discount factor at offset 0 is exactly 1, so a zero
/// rate reduces the NPV to the plain sum of the vector.
pub fn npv(flows: &CashFlowVector, rate: f64) -> ProformaResult<f64> {
    if !(rate > -1.0) {
        return Err(ProformaError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let base = 1.0 + rate;
    Ok(flows
        .amounts
        .iter()
        .zip(PERIOD_OFFSETS.iter())
        .map(|(amount, offset)| amount / base.powf(*offset))
        .sum())
}

/// Future value of a principal compounded annually for `years` years.
///
/// Non-finite results are reported as overflow, never clamped.
pub fn future_value(principal: f64, rate: f64, years: u32) -> ProformaResult<f64> {
    if !(rate > -1.0) {
        return Err(ProformaError::InvalidInput {
            field: "rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }

    let value = principal * (1.0 + rate).powi(years as i32);
    if !value.is_finite() {
        return Err(ProformaError::NumericOverflow {
            context: format!("future value of {principal} at rate {rate} over {years} years"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_rate_is_identity() {
        let flows = CashFlowVector::new([
            37_875_000.0,
            -24_375_000.0,
            -9_000_000.0,
            -12_500_000.0,
            19_000_000.0,
        ]);
        assert_eq!(npv(&flows, 0.0).unwrap(), flows.total());
    }

    #[test]
    fn test_origination_period_is_undiscounted() {
        let flows = CashFlowVector::new([1_000_000.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(npv(&flows, 0.25).unwrap(), 1_000_000.0);
    }

    #[test]
    fn test_known_discounted_value() {
        // Single terminal flow of 1.07^3 at 7% discounts back to exactly 1
        let flows = CashFlowVector::new([0.0, 0.0, 0.0, 0.0, 1.07_f64.powi(3)]);
        assert_relative_eq!(npv(&flows, 0.07).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quarter_year_offset() {
        let flows = CashFlowVector::new([0.0, 100.0, 0.0, 0.0, 0.0]);
        let expected = 100.0 / 1.08_f64.powf(0.25);
        assert_relative_eq!(npv(&flows, 0.08).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_rate_floor_enforced() {
        let flows = CashFlowVector::new([1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(npv(&flows, -1.0).is_err());
        assert!(npv(&flows, -2.0).is_err());
    }

    #[test]
    fn test_future_value_compounds_annually() {
        let fv = future_value(38_375_000.0, 0.07, 3).unwrap();
        assert_relative_eq!(fv, 38_375_000.0 * 1.225_043, epsilon = 1.0);
    }

    #[test]
    fn test_future_value_overflow_reported() {
        let result = future_value(f64::MAX, 10.0, 300);
        assert!(matches!(
            result,
            Err(ProformaError::NumericOverflow { .. })
        ));
    }
}
