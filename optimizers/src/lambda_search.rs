//! Random search over the regularization coefficient.
//!
//! Coefficients are drawn log-uniformly, so every decade of the range gets
//! the same share of candidates. Each candidate is fit independently on a
//! thread pool and the fit with the lowest validation error is kept.

use std::{cmp::max, sync::Arc};

use common::{EstimationError, Result};
use crossbeam::channel::unbounded;
use lin_reg::{FittedLinear, LinReg};
use nanorand::{Rng, WyRand};
use threadpool::ThreadPool;

use crate::{scale, Evaluation, OptEnvironment};

/// A regularization coefficient evaluated during the last step
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// The drawn regularization coefficient
    pub regularization_coeff: f64,
    /// Validation rmse, or why the candidate could not be fit
    pub outcome: Result<f64>,
}

/// The best candidate found so far
#[derive(Debug, Clone, PartialEq)]
pub struct Best {
    /// The drawn regularization coefficient
    pub regularization_coeff: f64,
    /// Its validation rmse
    pub validation_rmse: f64,
    /// The model fit with it on the training data
    pub fitted: FittedLinear,
}

/// Searches `10^[min_exponent, max_exponent)` for the regularization
/// coefficient with the lowest validation error
pub struct LambdaSearch {
    min_exponent: f64,
    max_exponent: f64,
    num_candidates: usize,
    rng: WyRand,
    trials: Vec<Trial>,
    best: Option<Best>,
}

impl LambdaSearch {
    /// Create a new search
    ///
    /// # Arguments:
    /// seed: An optional seed for the random number generator
    /// num_candidates: coefficients evaluated per step
    /// min_exponent, max_exponent: decimal exponents of the searched range
    pub fn new(
        seed: Option<u64>,
        num_candidates: usize,
        min_exponent: f64,
        max_exponent: f64,
    ) -> Result<Self> {
        if num_candidates == 0 {
            return Err(EstimationError::InvalidArgument(
                "num_candidates must be greater than zero".to_string(),
            ));
        }
        if !min_exponent.is_finite() || !max_exponent.is_finite() || min_exponent > max_exponent {
            return Err(EstimationError::InvalidArgument(format!(
                "invalid exponent range [{}, {})",
                min_exponent, max_exponent
            )));
        }

        let rng = match seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        Ok(Self {
            min_exponent,
            max_exponent,
            num_candidates,
            rng,
            trials: Vec::with_capacity(num_candidates),
            best: None,
        })
    }

    /// Draws `num_candidates` coefficients and fits each of them on a thread pool
    ///
    /// # Arguments:
    /// env: fits a regressor and scores it on held out data
    /// regressor_gen: builds the regressor for a regularization coefficient
    ///
    /// # Returns:
    /// The best candidate over all steps so far. If no candidate could ever be
    /// fit, the error of the first failed candidate of this step.
    pub fn step<R, F, E>(&mut self, env: Arc<E>, regressor_gen: F) -> Result<&Best>
    where
        R: LinReg + Send + 'static,
        F: Fn(f64) -> R,
        E: OptEnvironment<R> + Send + Sync + 'static,
    {
        let coeffs: Vec<f64> = (0..self.num_candidates).map(|_| self.draw()).collect();

        let pool = ThreadPool::new(max(num_cpus::get().saturating_sub(2), 1));
        let (ch_eval_s, ch_eval_r) = unbounded();
        for (i, coeff) in coeffs.iter().enumerate() {
            let ch_eval_s = ch_eval_s.clone();
            let env = env.clone();
            let regressor = regressor_gen(*coeff);
            pool.execute(move || {
                if let Err(err) = ch_eval_s.send((i, env.evaluate(&regressor))) {
                    error!("could not report candidate {}: {}", i, err);
                }
            });
        }
        drop(ch_eval_s);

        let mut evaluations: Vec<Option<Result<Evaluation>>> = vec![None; coeffs.len()];
        while let Ok((i, evaluation)) = ch_eval_r.recv() {
            evaluations[i] = Some(evaluation);
        }

        self.trials.clear();
        for (coeff, evaluation) in coeffs.into_iter().zip(evaluations) {
            let evaluation = evaluation.unwrap_or_else(|| {
                Err(EstimationError::Solver("candidate was never evaluated".to_string()))
            });
            let outcome = match evaluation {
                Ok(Evaluation { fitted, rmse }) => {
                    let improves = self.best.as_ref().map_or(true, |b| rmse < b.validation_rmse);
                    if rmse.is_finite() && improves {
                        self.best = Some(Best {
                            regularization_coeff: coeff,
                            validation_rmse: rmse,
                            fitted,
                        });
                    }
                    Ok(rmse)
                }
                Err(e) => {
                    debug!("regularization_coeff {} could not be fit: {}", coeff, e);
                    Err(e)
                }
            };
            self.trials.push(Trial {
                regularization_coeff: coeff,
                outcome,
            });
        }

        match &self.best {
            Some(best) => {
                debug!(
                    "lambda search step done, best regularization_coeff: {}, rmse: {}",
                    best.regularization_coeff, best.validation_rmse
                );
                Ok(best)
            }
            None => Err(self
                .trials
                .iter()
                .find_map(|t| t.outcome.clone().err())
                .unwrap_or_else(|| {
                    EstimationError::Solver("no candidate had a finite error".to_string())
                })),
        }
    }

    /// The best candidate over all steps, None before any fit succeeded
    #[inline(always)]
    pub fn best(&self) -> Option<&Best> {
        self.best.as_ref()
    }

    /// The candidates of the last step, in the order they were drawn
    #[inline(always)]
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    fn draw(&mut self) -> f64 {
        let exponent = scale(
            0.0,
            1.0,
            self.min_exponent,
            self.max_exponent,
            self.rng.generate::<f64>(),
        );

        10_f64.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use lin_reg::TikhonovRegularization;
    use nalgebra::{DMatrix, DVector};

    use super::*;
    use crate::EnvValidation;

    fn noisy_env() -> EnvValidation {
        let mut rng = WyRand::new_seed(3);
        let mut noisy = |n: usize| {
            let design = DMatrix::from_fn(n, 3, |_, _| rng.generate::<f64>() * 2.0 - 1.0);
            let noise = DVector::from_fn(n, |_, _| (rng.generate::<f64>() - 0.5) * 0.4);
            let targets = &design * DVector::from_vec(vec![1.5, -2.0, 0.5]) + noise;
            (design, targets)
        };
        let (train_design, train_targets) = noisy(30);
        let (validation_design, validation_targets) = noisy(30);

        EnvValidation::new(
            Arc::new(train_design),
            Arc::new(train_targets),
            Arc::new(validation_design),
            Arc::new(validation_targets),
        )
    }

    fn ridge(regularization_coeff: f64) -> TikhonovRegularization {
        TikhonovRegularization {
            regularization_coeff,
        }
    }

    #[test]
    fn keeps_the_best_fit() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let env = Arc::new(noisy_env());
        let mut search = LambdaSearch::new(Some(0), 16, -3.0, 2.0).unwrap();
        for _ in 0..3 {
            let best = search.step(env.clone(), ridge).unwrap().clone();

            assert_eq!(search.trials().len(), 16);
            for trial in search.trials() {
                assert!(trial.regularization_coeff >= 1e-3 && trial.regularization_coeff < 1e2);
                assert!(best.validation_rmse <= *trial.outcome.as_ref().unwrap());
            }
        }
        let best = search.best().unwrap();
        info!(
            "best regularization_coeff: {}, rmse: {}",
            best.regularization_coeff, best.validation_rmse
        );

        // the kept model is the fit of the kept coefficient
        let refit = env.evaluate(&ridge(best.regularization_coeff)).unwrap();
        assert_eq!(refit.fitted, best.fitted);
        assert_eq!(refit.rmse, best.validation_rmse);
        assert_eq!(best.fitted.regularization_coeff(), best.regularization_coeff);
    }

    #[test]
    fn failed_fits_are_never_best() {
        let env = Arc::new(noisy_env());
        let mut search = LambdaSearch::new(Some(1), 8, -2.0, 1.0).unwrap();
        // coefficients below 1 turn into negative penalties
        let best = search
            .step(env, |coeff| ridge(coeff - 1.0))
            .map(|b| b.regularization_coeff);

        for trial in search.trials() {
            if trial.regularization_coeff < 1.0 {
                assert!(matches!(trial.outcome, Err(EstimationError::InvalidArgument(_))));
            } else {
                assert!(trial.outcome.is_ok());
            }
        }
        if let Ok(coeff) = best {
            assert!(coeff >= 1.0);
        }
    }

    #[test]
    fn nothing_fits() {
        let mut search = LambdaSearch::new(Some(2), 4, 0.0, 1.0).unwrap();
        let res = search.step(Arc::new(noisy_env()), |coeff| ridge(-coeff));

        assert!(matches!(res, Err(EstimationError::InvalidArgument(_))));
        assert!(search.best().is_none());
    }

    #[test]
    fn seeded_candidates_repeat() {
        let env = Arc::new(noisy_env());
        let mut a = LambdaSearch::new(Some(5), 6, -4.0, 3.0).unwrap();
        let mut b = LambdaSearch::new(Some(5), 6, -4.0, 3.0).unwrap();
        a.step(env.clone(), ridge).unwrap();
        b.step(env, ridge).unwrap();

        assert_eq!(a.trials(), b.trials());
        assert_eq!(a.best(), b.best());
    }

    #[test]
    fn invalid_search() {
        assert!(LambdaSearch::new(None, 0, -1.0, 1.0).is_err());
        assert!(LambdaSearch::new(None, 4, 1.0, -1.0).is_err());
        assert!(LambdaSearch::new(None, 4, f64::NAN, 1.0).is_err());
    }
}
