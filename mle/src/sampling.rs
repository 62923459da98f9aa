use common::{EstimationError, Result};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Poisson};

/// Draw `n` counts from a Poisson distribution with rate `theta`
///
/// # Parameters:
/// n: the number of counts to generate
/// theta: the positive rate
/// seed: An optional seed for the random number generator
pub fn sample_poisson(n: usize, theta: f64, seed: Option<u64>) -> Result<Vec<u64>> {
    let poisson = Poisson::new(theta).map_err(|e| {
        EstimationError::InvalidArgument(format!("invalid poisson rate {}: {}", theta, e))
    })?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Ok((0..n).map(|_| poisson.sample(&mut rng) as u64).collect())
}
