use std::sync::Arc;

use common::{metrics::rmse, Result};
use lin_reg::LinReg;
use nalgebra::{DMatrix, DVector};

use crate::{Evaluation, OptEnvironment};

/// Fits on a training split and scores on a held out validation split.
/// The split itself is done by the caller.
pub struct EnvValidation {
    train_design: Arc<DMatrix<f64>>,
    train_targets: Arc<DVector<f64>>,
    validation_design: Arc<DMatrix<f64>>,
    validation_targets: Arc<DVector<f64>>,
}

impl EnvValidation {
    #[inline(always)]
    pub fn new(
        train_design: Arc<DMatrix<f64>>,
        train_targets: Arc<DVector<f64>>,
        validation_design: Arc<DMatrix<f64>>,
        validation_targets: Arc<DVector<f64>>,
    ) -> Self {
        Self {
            train_design,
            train_targets,
            validation_design,
            validation_targets,
        }
    }
}

impl<R> OptEnvironment<R> for EnvValidation
where
    R: LinReg,
{
    fn evaluate(&self, regressor: &R) -> Result<Evaluation> {
        let fitted = regressor.fit(&self.train_design, &self.train_targets)?;
        let predictions = fitted.predict(&self.validation_design)?;
        let rmse = rmse(&predictions, &self.validation_targets)?;
        trace!(
            "regularization_coeff: {}, validation rmse: {}",
            fitted.regularization_coeff(),
            rmse
        );

        Ok(Evaluation { fitted, rmse })
    }
}
