//! Scalar error metrics reported after fitting

use nalgebra::DVector;

use crate::{EstimationError, Result};

fn check_lengths(predictions: &DVector<f64>, targets: &DVector<f64>) -> Result<()> {
    if predictions.is_empty() || predictions.len() != targets.len() {
        return Err(EstimationError::InvalidArgument(format!(
            "cannot compare {} predictions against {} targets",
            predictions.len(),
            targets.len()
        )));
    }

    Ok(())
}

/// Mean squared error
pub fn mse(predictions: &DVector<f64>, targets: &DVector<f64>) -> Result<f64> {
    check_lengths(predictions, targets)?;

    Ok((predictions - targets).norm_squared() / targets.len() as f64)
}

/// Root mean squared error
#[inline(always)]
pub fn rmse(predictions: &DVector<f64>, targets: &DVector<f64>) -> Result<f64> {
    mse(predictions, targets).map(f64::sqrt)
}

/// Coefficient of determination.
/// Constant targets yield 1.0 for a perfect fit and 0.0 otherwise.
pub fn r_squared(predictions: &DVector<f64>, targets: &DVector<f64>) -> Result<f64> {
    check_lengths(predictions, targets)?;

    let mean = targets.mean();
    let ss_tot: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res = (predictions - targets).norm_squared();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;

    #[test]
    fn perfect_fit() {
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(mse(&y, &y).unwrap(), 0.0);
        assert_eq!(rmse(&y, &y).unwrap(), 0.0);
        assert_eq!(r_squared(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn known_errors() {
        let predictions = DVector::from_vec(vec![1.0, 2.0, 5.0]);
        let targets = DVector::from_vec(vec![1.0, 4.0, 3.0]);
        // squared errors 0, 4, 4
        assert_eq!(round(mse(&predictions, &targets).unwrap(), 4), 2.6667);
        assert_eq!(round(rmse(&predictions, &targets).unwrap(), 4), 1.633);
        // ss_res = 8, ss_tot = 14 / 3
        assert_eq!(round(r_squared(&predictions, &targets).unwrap(), 4), -0.7143);
    }

    #[test]
    fn mismatched_lengths() {
        let a = DVector::from_vec(vec![1.0, 2.0]);
        let b = DVector::from_vec(vec![1.0]);
        assert!(rmse(&a, &b).is_err());
        assert!(r_squared(&DVector::zeros(0), &DVector::zeros(0)).is_err());
    }
}
