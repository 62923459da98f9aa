use thiserror::Error;

/// Everything that can go wrong while fitting an estimator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimationError {
    /// Negative regularization, empty input or mismatched dimensions
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The regularized normal-equation matrix cannot be inverted
    #[error("matrix is singular or near-singular (condition number: {condition_number:e})")]
    SingularMatrix {
        /// Condition number of the matrix that was about to be solved
        condition_number: f64,
    },

    /// The numerical optimizer stopped before reaching its tolerance
    #[error("optimizer did not converge after {iterations} iterations (objective: {objective})")]
    Convergence {
        /// Best objective value seen
        objective: f64,
        /// Number of iterations performed
        iterations: u64,
    },

    /// The optimizer library failed internally
    #[error("optimizer failure: {0}")]
    Solver(String),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, EstimationError>;
