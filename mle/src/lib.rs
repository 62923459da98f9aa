//! Maximum likelihood estimation of distribution parameters

#[macro_use]
extern crate log;

mod poisson;
mod sampling;

pub use poisson::{log_pmf, neg_log_likelihood, sample_mean, PoissonFit, PoissonMle};
pub use sampling::sample_poisson;
