use common::{check_design, check_regularization_coeff, EstimationError, Result};
use minimizer::{minimize, MinimizerParams};
use nalgebra::{DMatrix, DVector};
use nanorand::{Rng, WyRand};

use super::{FittedLinear, LinReg};

/// Lasso regression, least squares with an L1 penalty on the coefficients.
/// There is no closed form, so the objective is minimized numerically
/// starting from an initial guess. The found minimum depends on that guess.
#[derive(Debug, Clone)]
pub struct Lasso {
    /// Scales the L1 penalty, must not be negative
    pub regularization_coeff: f64,
    /// Optional seed for the Rng drawing the initial guess
    pub seed: Option<u64>,
    /// Iteration cap of the minimizer
    pub max_iters: u64,
    /// Convergence tolerance of the minimizer
    pub sd_tolerance: f64,
    /// Size of the initial simplex around the initial guess
    pub initial_step: f64,
}

impl Lasso {
    /// Create a new lasso regressor with default minimizer settings
    pub fn new(regularization_coeff: f64) -> Self {
        let defaults = MinimizerParams::default();

        Self {
            regularization_coeff,
            seed: None,
            max_iters: defaults.max_iters,
            sd_tolerance: defaults.sd_tolerance,
            initial_step: defaults.initial_step,
        }
    }

    /// Fit the coefficients starting the search at `initial_guess`
    pub fn fit_from(
        &self,
        design: &DMatrix<f64>,
        targets: &DVector<f64>,
        initial_guess: &DVector<f64>,
    ) -> Result<FittedLinear> {
        check_regularization_coeff(self.regularization_coeff)?;
        check_design(design, targets)?;
        if initial_guess.len() != design.ncols() {
            return Err(EstimationError::InvalidArgument(format!(
                "initial guess has {} elements, design has {} columns",
                initial_guess.len(),
                design.ncols()
            )));
        }

        let objective = LassoObjective::new(design, targets, self.regularization_coeff);
        let params = MinimizerParams {
            max_iters: self.max_iters,
            sd_tolerance: self.sd_tolerance,
            initial_step: self.initial_step,
            bounds: None,
        };
        let min = minimize(
            |w: &[f64]| objective.cost(&DVector::from_column_slice(w)),
            initial_guess.as_slice(),
            &params,
        )?
        .converged()?;
        debug!(
            "lasso fit with regularization_coeff {} took {} iterations, objective: {}",
            self.regularization_coeff, min.diagnostics.iterations, min.diagnostics.objective
        );

        Ok(FittedLinear::new(
            DVector::from_vec(min.solution),
            self.regularization_coeff,
        ))
    }

    /// Draws the initial guess uniformly from [0, 1)
    fn initial_guess(&self, dim: usize) -> DVector<f64> {
        let mut rng = match self.seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        DVector::from_fn(dim, |_, _| rng.generate::<f64>())
    }
}

impl LinReg for Lasso {
    fn fit(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<FittedLinear> {
        let initial_guess = self.initial_guess(design.ncols());
        trace!("lasso initial guess: {}", initial_guess);

        self.fit_from(design, targets, &initial_guess)
    }
}

/// The penalized least squares objective `||y - Xw||^2 + lambda * ||w||_1`.
///
/// The penalty sums absolute values. Summing the raw coefficients instead
/// would reward arbitrarily negative weights and leave the objective
/// unbounded below.
pub struct LassoObjective<'a> {
    design: &'a DMatrix<f64>,
    targets: &'a DVector<f64>,
    regularization_coeff: f64,
}

impl<'a> LassoObjective<'a> {
    /// Create the objective for the given data and penalty strength
    pub fn new(
        design: &'a DMatrix<f64>,
        targets: &'a DVector<f64>,
        regularization_coeff: f64,
    ) -> Self {
        Self {
            design,
            targets,
            regularization_coeff,
        }
    }

    /// Evaluate the objective at `weights`
    #[inline]
    pub fn cost(&self, weights: &DVector<f64>) -> f64 {
        let residuals = self.targets - self.design * weights;

        residuals.norm_squared() + self.regularization_coeff * weights.lp_norm(1)
    }
}
