//! Generic unconstrained minimization of scalar objectives.
//!
//! The estimators only need `minimize(objective, initial_guess, params)`,
//! which runs a Nelder-Mead simplex search from `argmin` and reports whether
//! the tolerance was actually reached.

#[macro_use]
extern crate log;

use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus},
    solver::neldermead::NelderMead,
};
use common::{EstimationError, Result};

mod bounds;

pub use bounds::Bounds;

/// Parameters of the simplex search
#[derive(Debug, Clone)]
pub struct MinimizerParams {
    /// Iteration cap, reaching it means the search did not converge
    pub max_iters: u64,
    /// Converged once the standard deviation of the simplex costs falls below this
    pub sd_tolerance: f64,
    /// Offset along each axis used to span the initial simplex
    pub initial_step: f64,
    /// Optional box, proposals outside of it cost infinity
    pub bounds: Option<Bounds>,
}

impl Default for MinimizerParams {
    fn default() -> Self {
        Self {
            max_iters: 10_000,
            sd_tolerance: 1e-12,
            initial_step: 0.5,
            bounds: None,
        }
    }
}

/// How the search ended
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Objective value at the solution
    pub objective: f64,
    /// Number of iterations performed
    pub iterations: u64,
    /// Termination status as reported by the solver
    pub termination: String,
}

/// Result of a minimization
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best parameters found, always inside the bounds if any were given
    pub solution: Vec<f64>,
    /// Whether the convergence tolerance was reached
    pub achieved: bool,
    /// Final objective and iteration count
    pub diagnostics: Diagnostics,
}

impl Minimum {
    /// Turns a search that hit its iteration cap into a `Convergence` error
    pub fn converged(self) -> Result<Self> {
        if !self.achieved {
            warn!(
                "minimizer stopped with {} after {} iterations, objective {}",
                self.diagnostics.termination, self.diagnostics.iterations, self.diagnostics.objective
            );
            return Err(EstimationError::Convergence {
                objective: self.diagnostics.objective,
                iterations: self.diagnostics.iterations,
            });
        }

        Ok(self)
    }
}

/// Adapts a closure to argmin's `CostFunction`.
/// Proposals outside the bounds are never evaluated, they cost infinity so the
/// simplex contracts back inside instead of settling on a flat region.
struct Problem<'a, F> {
    objective: &'a F,
    bounds: Option<&'a Bounds>,
}

impl<'a, F> CostFunction for Problem<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, Error> {
        if let Some(bounds) = self.bounds {
            if !bounds.contains(param) {
                return Ok(f64::INFINITY);
            }
        }
        let cost = (self.objective)(param);
        // NaN would poison the simplex ordering
        Ok(if cost.is_nan() { f64::INFINITY } else { cost })
    }
}

/// Minimize `objective` starting from `initial_guess`.
///
/// # Arguments:
/// objective: scalar function of the parameter vector
/// initial_guess: the first simplex vertex, the other vertices are offset by `initial_step`
/// params: iteration budget, tolerance and optional bounds
///
/// # Returns:
/// The best point found. `achieved` is false when the iteration cap was hit,
/// use `Minimum::converged` to turn that into an error.
pub fn minimize<F>(objective: F, initial_guess: &[f64], params: &MinimizerParams) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    check_params(initial_guess, params)?;

    let start = match &params.bounds {
        Some(bounds) => bounds.project(initial_guess),
        None => initial_guess.to_vec(),
    };
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.clone());
    for i in 0..start.len() {
        let mut vertex = start.clone();
        vertex[i] += params.initial_step;
        // step the other way when the upper bound is in reach
        if let Some(bounds) = &params.bounds {
            if !bounds.contains(&vertex) {
                vertex[i] = start[i] - params.initial_step;
            }
        }
        simplex.push(vertex);
    }
    trace!("initial simplex: {:?}", simplex);

    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(params.sd_tolerance)
        .map_err(|e| EstimationError::Solver(e.to_string()))?;
    let problem = Problem {
        objective: &objective,
        bounds: params.bounds.as_ref(),
    };
    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(params.max_iters))
        .run()
        .map_err(|e| EstimationError::Solver(e.to_string()))?;

    let state = res.state();
    let best = state
        .get_best_param()
        .ok_or_else(|| EstimationError::Solver("solver returned no parameters".to_string()))?;
    let solution = best.clone();
    let status = state.get_termination_status();
    let achieved = matches!(
        status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let diagnostics = Diagnostics {
        objective: state.get_best_cost(),
        iterations: state.get_iter(),
        termination: format!("{:?}", status),
    };
    debug!(
        "minimize: achieved: {}, iterations: {}, objective: {}",
        achieved, diagnostics.iterations, diagnostics.objective
    );

    Ok(Minimum {
        solution,
        achieved,
        diagnostics,
    })
}

fn check_params(initial_guess: &[f64], params: &MinimizerParams) -> Result<()> {
    if initial_guess.is_empty() {
        return Err(EstimationError::InvalidArgument(
            "initial guess must not be empty".to_string(),
        ));
    }
    if initial_guess.iter().any(|v| !v.is_finite()) {
        return Err(EstimationError::InvalidArgument(format!(
            "initial guess must be finite, got {:?}",
            initial_guess
        )));
    }
    if !params.initial_step.is_finite() || params.initial_step <= 0.0 {
        return Err(EstimationError::InvalidArgument(format!(
            "initial_step must be positive, got {}",
            params.initial_step
        )));
    }
    if params.max_iters == 0 {
        return Err(EstimationError::InvalidArgument(
            "max_iters must be greater than zero".to_string(),
        ));
    }
    if let Some(bounds) = &params.bounds {
        if bounds.dim() != initial_guess.len() {
            return Err(EstimationError::InvalidArgument(format!(
                "bounds cover {} dimensions, initial guess has {}",
                bounds.dim(),
                initial_guess.len()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;

    fn quadratic(p: &[f64]) -> f64 {
        (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2)
    }

    #[test]
    fn minimize_quadratic() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let min = minimize(quadratic, &[0.0, 0.0], &MinimizerParams::default()).unwrap();
        info!("min: {:?}", min);

        assert!(min.achieved);
        assert_eq!(round(min.solution[0], 3), 1.0);
        assert_eq!(round(min.solution[1], 3), -2.0);
        assert!(min.diagnostics.objective < 1e-6);
        assert!(min.diagnostics.iterations > 0);
    }

    #[test]
    fn iteration_cap_is_not_convergence() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let params = MinimizerParams {
            max_iters: 1,
            ..Default::default()
        };
        let min = minimize(quadratic, &[10.0, 10.0], &params).unwrap();
        assert!(!min.achieved);
        assert_eq!(min.diagnostics.iterations, 1);

        match min.converged() {
            Err(EstimationError::Convergence { objective, iterations }) => {
                assert_eq!(iterations, 1);
                assert!(objective > 0.0);
            }
            other => panic!("expected a convergence error, got {:?}", other),
        }
    }

    #[test]
    fn bounded_solution() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let params = MinimizerParams {
            bounds: Some(Bounds::lower(vec![0.0])),
            ..Default::default()
        };
        let min = minimize(|p: &[f64]| (p[0] + 1.0).powi(2), &[2.0], &params).unwrap();
        assert!(min.achieved);
        assert!(min.solution[0] >= 0.0 && min.solution[0] < 1e-6);
        assert_eq!(round(min.diagnostics.objective, 6), 1.0);
    }

    #[test]
    fn far_start_overshooting_the_bound() {
        if let Err(_) = pretty_env_logger::try_init() {}

        // the expanding simplex jumps past 0 long before it reaches 3
        let params = MinimizerParams {
            bounds: Some(Bounds::lower(vec![0.0])),
            ..Default::default()
        };
        for start in [1e3, 1e6] {
            let min = minimize(|p: &[f64]| (p[0] - 3.0).powi(2), &[start], &params).unwrap();
            info!("start: {}, min: {:?}", start, min);

            assert!(min.achieved);
            assert_eq!(round(min.solution[0], 3), 3.0);
        }
    }

    #[test]
    fn start_next_to_upper_bound() {
        let params = MinimizerParams {
            bounds: Some(Bounds::new(vec![-10.0], vec![10.0]).unwrap()),
            ..Default::default()
        };
        let min = minimize(|p: &[f64]| (p[0] - 2.0).powi(2), &[10.0], &params).unwrap();

        assert!(min.achieved);
        assert_eq!(round(min.solution[0], 3), 2.0);
    }

    #[test]
    fn nan_objective_is_avoided() {
        let objective = |p: &[f64]| if p[0] < 0.0 { f64::NAN } else { (p[0] - 3.0).powi(2) };
        let min = minimize(objective, &[1.0], &MinimizerParams::default()).unwrap();
        assert!(min.achieved);
        assert_eq!(round(min.solution[0], 3), 3.0);
    }

    #[test]
    fn invalid_arguments() {
        let params = MinimizerParams::default();
        assert!(matches!(
            minimize(quadratic, &[], &params),
            Err(EstimationError::InvalidArgument(_))
        ));
        assert!(matches!(
            minimize(quadratic, &[f64::NAN, 0.0], &params),
            Err(EstimationError::InvalidArgument(_))
        ));
        let bad_bounds = MinimizerParams {
            bounds: Some(Bounds::lower(vec![0.0])),
            ..Default::default()
        };
        assert!(minimize(quadratic, &[0.0, 0.0], &bad_bounds).is_err());
    }
}
