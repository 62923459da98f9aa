use common::{EstimationError, Result};
use minimizer::{minimize, Bounds, MinimizerParams};
use statrs::function::factorial::ln_factorial;

/// Estimates the rate of a Poisson distribution by numerically minimizing
/// the negative log-likelihood of the observed counts.
/// The log-likelihood turns the product over observations into a sum,
/// which does not underflow, and has its maximum at the same rate.
#[derive(Debug, Clone)]
pub struct PoissonMle {
    /// Smallest rate the optimizer may propose, the rate must stay positive
    pub lower_bound: f64,
    /// Iteration cap of the minimizer
    pub max_iters: u64,
    /// Convergence tolerance of the minimizer
    pub sd_tolerance: f64,
    /// Size of the initial simplex around the initial guess
    pub initial_step: f64,
}

impl Default for PoissonMle {
    fn default() -> Self {
        let defaults = MinimizerParams::default();

        Self {
            lower_bound: 1e-10,
            max_iters: defaults.max_iters,
            sd_tolerance: defaults.sd_tolerance,
            initial_step: defaults.initial_step,
        }
    }
}

/// The estimated rate and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonFit {
    theta: f64,
    neg_log_likelihood: f64,
    iterations: u64,
}

impl PoissonFit {
    /// The estimated rate
    #[inline(always)]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Negative log-likelihood at `theta`
    #[inline(always)]
    pub fn neg_log_likelihood(&self) -> f64 {
        self.neg_log_likelihood
    }

    /// Iterations the minimizer needed
    #[inline(always)]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl PoissonMle {
    /// Estimate the rate of the distribution that generated `counts`
    ///
    /// # Arguments:
    /// counts: the observed non-negative integer counts
    /// initial_guess: positive starting rate of the search
    pub fn estimate(&self, counts: &[u64], initial_guess: f64) -> Result<PoissonFit> {
        if counts.is_empty() {
            return Err(EstimationError::InvalidArgument(
                "cannot estimate a rate from zero counts".to_string(),
            ));
        }
        if !initial_guess.is_finite() || initial_guess <= 0.0 {
            return Err(EstimationError::InvalidArgument(format!(
                "initial guess must be a positive rate, got {}",
                initial_guess
            )));
        }
        if !self.lower_bound.is_finite() || self.lower_bound <= 0.0 {
            return Err(EstimationError::InvalidArgument(format!(
                "lower_bound must be positive, got {}",
                self.lower_bound
            )));
        }

        let nll = NegLogLikelihood::new(counts);
        let params = MinimizerParams {
            max_iters: self.max_iters,
            sd_tolerance: self.sd_tolerance,
            initial_step: self.initial_step,
            bounds: Some(Bounds::lower(vec![self.lower_bound])),
        };
        let min = minimize(|theta: &[f64]| nll.cost(theta[0]), &[initial_guess], &params)?
            .converged()?;
        debug!(
            "poisson mle over {} counts: theta: {}, iterations: {}",
            counts.len(),
            min.solution[0],
            min.diagnostics.iterations
        );

        Ok(PoissonFit {
            theta: min.solution[0],
            neg_log_likelihood: min.diagnostics.objective,
            iterations: min.diagnostics.iterations,
        })
    }
}

/// Sufficient statistics of the counts, so evaluating the likelihood is O(1)
struct NegLogLikelihood {
    n: f64,
    sum: f64,
    sum_ln_factorials: f64,
}

impl NegLogLikelihood {
    fn new(counts: &[u64]) -> Self {
        Self {
            n: counts.len() as f64,
            sum: counts.iter().map(|c| *c as f64).sum(),
            sum_ln_factorials: counts.iter().map(|c| ln_factorial(*c)).sum(),
        }
    }

    /// `n * theta - sum(x) * ln(theta) + sum(ln(x!))`
    fn cost(&self, theta: f64) -> f64 {
        // 0 * ln(0) is taken as 0
        let ln_term = if self.sum == 0.0 { 0.0 } else { self.sum * theta.ln() };

        self.n * theta - ln_term + self.sum_ln_factorials
    }
}

/// Negative log-likelihood of `counts` under a Poisson distribution with rate `theta`
pub fn neg_log_likelihood(theta: f64, counts: &[u64]) -> f64 {
    NegLogLikelihood::new(counts).cost(theta)
}

/// Log of the probability of observing `k` events at rate `theta`
pub fn log_pmf(k: u64, theta: f64) -> f64 {
    -neg_log_likelihood(theta, &[k])
}

/// The closed form maximum likelihood estimate of the rate.
/// Returns None for empty counts.
pub fn sample_mean(counts: &[u64]) -> Option<f64> {
    if counts.is_empty() {
        return None;
    }

    Some(counts.iter().map(|c| *c as f64).sum::<f64>() / counts.len() as f64)
}
