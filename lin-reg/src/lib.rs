#[macro_use]
extern crate log;

use common::{EstimationError, Result};
use nalgebra::{DMatrix, DVector};

mod lasso;
mod tikhonov_regularization;

pub use lasso::{Lasso, LassoObjective};
pub use tikhonov_regularization::TikhonovRegularization;

/// Generic way of performing penalized linear regression
pub trait LinReg: Clone {
    /// Fit the coefficients, mapping the design to the targets
    ///
    /// # Parameters
    /// design: Input data with one row per observation. Prepend a column of 1s
    /// (`common::with_intercept`) to fit an intercept
    /// targets: Target data with one element per row of `design`
    fn fit(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<FittedLinear>;
}

/// The coefficients produced by a single fit.
/// Never mutated after `fit` returns.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLinear {
    weights: DVector<f64>,
    regularization_coeff: f64,
}

impl FittedLinear {
    pub(crate) fn new(weights: DVector<f64>, regularization_coeff: f64) -> Self {
        Self {
            weights,
            regularization_coeff,
        }
    }

    /// The fitted coefficient vector
    #[inline(always)]
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// The penalty strength the coefficients were fit with
    #[inline(always)]
    pub fn regularization_coeff(&self) -> f64 {
        self.regularization_coeff
    }

    /// Predictions for every row of `design`
    #[inline]
    pub fn predict(&self, design: &DMatrix<f64>) -> Result<DVector<f64>> {
        predict(design, &self.weights)
    }
}

/// Computes `design * weights`
pub fn predict(design: &DMatrix<f64>, weights: &DVector<f64>) -> Result<DVector<f64>> {
    if design.ncols() != weights.len() {
        return Err(EstimationError::InvalidArgument(format!(
            "design has {} columns but there are {} weights",
            design.ncols(),
            weights.len()
        )));
    }

    Ok(design * weights)
}
