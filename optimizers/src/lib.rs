//! Hyperparameter search over independent fits

#[macro_use]
extern crate log;

use common::Result;
use lin_reg::{FittedLinear, LinReg};

mod env_validation;
mod lambda_search;

pub use env_validation::EnvValidation;
pub use lambda_search::{Best, LambdaSearch, Trial};

/// A model fit together with its held out error
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The coefficients fit on the training data
    pub fitted: FittedLinear,
    /// Root mean square error of `fitted` on the validation data
    pub rmse: f64,
}

pub trait OptEnvironment<R>
where
    R: LinReg,
{
    /// Fits the regressor and scores the fit
    ///
    /// # Arguments:
    /// regressor: the configured, not yet fitted regressor
    ///
    /// # Returns:
    /// the fit and its validation error, or the reason it could not be fit
    fn evaluate(&self, regressor: &R) -> Result<Evaluation>;
}

/// Linearly maps `value` from one range into another
#[inline(always)]
pub fn scale(from_min: f64, from_max: f64, to_min: f64, to_max: f64, value: f64) -> f64 {
    to_min + ((value - from_min) * (to_max - to_min)) / (from_max - from_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_unit_interval() {
        assert_eq!(scale(0.0, 1.0, 10.0, 20.0, 0.5), 15.0);
        assert_eq!(scale(0.0, 1.0, -1.0, 1.0, 0.0), -1.0);
        assert_eq!(scale(0.0, 1.0, -4.0, 3.0, 1.0), 3.0);
    }
}
