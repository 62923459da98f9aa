use common::{check_design, check_regularization_coeff, EstimationError, Result};
use nalgebra::{DMatrix, DVector, Dim, Matrix, SymmetricEigen};

use super::{FittedLinear, LinReg};

/// Tikhonov regularization aka ridge regression
/// It is particularly useful to mitigate the problem of multicollinearity in
/// linear regression
#[derive(Debug, Clone)]
pub struct TikhonovRegularization {
    /// Ridge parameter, must not be negative
    pub regularization_coeff: f64,
}

impl LinReg for TikhonovRegularization {
    fn fit(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<FittedLinear> {
        check_regularization_coeff(self.regularization_coeff)?;
        check_design(design, targets)?;

        let reg_m: DMatrix<f64> = Matrix::from_diagonal_element_generic(
            Dim::from_usize(design.ncols()),
            Dim::from_usize(design.ncols()),
            self.regularization_coeff,
        );

        let p0 = design.transpose() * design + reg_m;
        let p1 = design.transpose() * targets;
        if p0.iter().chain(p1.iter()).any(|v| !v.is_finite()) {
            return Err(EstimationError::InvalidArgument(
                "normal equations overflow, rescale the design".to_string(),
            ));
        }

        let condition_number = condition_number(&p0);
        debug!(
            "ridge fit of {}x{} design, regularization_coeff: {}, condition_number: {:e}",
            design.nrows(),
            design.ncols(),
            self.regularization_coeff,
            condition_number
        );
        // reciprocal condition number below the rounding error of p columns
        if 1.0 / condition_number < design.ncols() as f64 * f64::EPSILON {
            return Err(EstimationError::SingularMatrix { condition_number });
        }

        let weights = p0
            .cholesky()
            .ok_or(EstimationError::SingularMatrix { condition_number })?
            .solve(&p1);
        trace!("ridge weights: {}", weights);

        Ok(FittedLinear::new(weights, self.regularization_coeff))
    }
}

/// Ratio of the largest to the smallest absolute eigenvalue of a symmetric matrix
fn condition_number(m: &DMatrix<f64>) -> f64 {
    let eigenvalues = SymmetricEigen::new(m.clone()).eigenvalues.abs();
    let min = eigenvalues.min();
    if min == 0.0 {
        return f64::INFINITY;
    }

    eigenvalues.max() / min
}
