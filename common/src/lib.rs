//! This crate provides common funcionality shared by the estimators

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod error;
pub mod metrics;
mod standardize;

pub use error::{EstimationError, Result};
pub use standardize::{with_intercept, Standardizer};

use nalgebra::{DMatrix, DVector};

/// Validates a design matrix and its paired response vector.
/// Both must be non-empty, have matching row counts and only finite entries.
pub fn check_design(design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<()> {
    if design.nrows() == 0 || design.ncols() == 0 {
        return Err(EstimationError::InvalidArgument(format!(
            "design matrix must not be empty, got {}x{}",
            design.nrows(),
            design.ncols()
        )));
    }
    if design.nrows() != targets.len() {
        return Err(EstimationError::InvalidArgument(format!(
            "design has {} rows but targets have {} elements",
            design.nrows(),
            targets.len()
        )));
    }
    if design.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
        return Err(EstimationError::InvalidArgument(
            "design and targets must only contain finite values".to_string(),
        ));
    }

    Ok(())
}

/// Rejects negative or non-finite regularization strengths
pub fn check_regularization_coeff(regularization_coeff: f64) -> Result<()> {
    if !regularization_coeff.is_finite() || regularization_coeff < 0.0 {
        return Err(EstimationError::InvalidArgument(format!(
            "regularization_coeff must be finite and >= 0, got {}",
            regularization_coeff
        )));
    }

    Ok(())
}
