use nalgebra::{DMatrix, DVector};
use nanorand::{Rng, WyRand};

/// A linear regression problem with known coefficients
pub(crate) struct Synthetic {
    pub(crate) design: DMatrix<f64>,
    pub(crate) targets: DVector<f64>,
}

impl Synthetic {
    /// Splits off the last `validation_len` rows
    pub(crate) fn split(&self, validation_len: usize) -> (Synthetic, Synthetic) {
        let train_len = self.design.nrows() - validation_len;
        let train = Synthetic {
            design: self.design.rows(0, train_len).into_owned(),
            targets: self.targets.rows(0, train_len).into_owned(),
        };
        let validation = Synthetic {
            design: self.design.rows(train_len, validation_len).into_owned(),
            targets: self.targets.rows(train_len, validation_len).into_owned(),
        };

        (train, validation)
    }
}

/// Uniform features in [-1, 1), targets `design * weights` plus uniform noise.
///
/// # Parameters:
/// n: the number of observations
/// weights: the true coefficients, one per feature
/// collinearity: how strongly every feature after the first follows the first one, in [0, 1]
/// noise: amplitude of the additive noise
/// seed: An optional seed for the random number generator
pub(crate) fn linear_series(
    n: usize,
    weights: &[f64],
    collinearity: f64,
    noise: f64,
    seed: Option<u64>,
) -> Synthetic {
    let mut rng = match seed {
        Some(seed) => WyRand::new_seed(seed),
        None => WyRand::new(),
    };

    let mut design = DMatrix::from_fn(n, weights.len(), |_, _| rng.generate::<f64>() * 2.0 - 1.0);
    for i in 0..n {
        let base = design[(i, 0)];
        for j in 1..weights.len() {
            design[(i, j)] = collinearity * base + (1.0 - collinearity) * design[(i, j)];
        }
    }
    let noise = DVector::from_fn(n, |_, _| (rng.generate::<f64>() * 2.0 - 1.0) * noise);
    let targets = &design * DVector::from_column_slice(weights) + noise;

    Synthetic { design, targets }
}
