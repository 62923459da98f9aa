#[macro_use]
extern crate log;

use std::{error::Error, sync::Arc, time::Instant};

use common::{metrics::rmse, EstimationError, Standardizer};
use dialoguer::{theme::ColorfulTheme, Select};
use lin_reg::{Lasso, LinReg, TikhonovRegularization};
use mle::{sample_mean, sample_poisson, PoissonMle};
use optimizers::{EnvValidation, LambdaSearch};

mod data;

use data::{linear_series, Synthetic};

const SEED: Option<u64> = Some(0);
const NUM_OBSERVATIONS: usize = 200;
const VALIDATION_LEN: usize = 50;
const NUM_GENS: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let notebooks = vec![
        "Ridge regression",
        "Lasso regression",
        "Poisson MLE",
        "Ridge random search",
    ];
    let e = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select notebook")
        .items(&notebooks)
        .default(0)
        .interact()?;
    match e {
        0 => ridge()?,
        1 => lasso()?,
        2 => poisson()?,
        3 => ridge_random_search()?,
        _ => panic!("invalid notebook selection"),
    }

    Ok(())
}

/// Standardizes both splits with the statistics of the training split
fn standardized(
    train: &Synthetic,
    validation: &Synthetic,
) -> Result<(Synthetic, Synthetic), EstimationError> {
    let standardizer = Standardizer::fit(&train.design)?;

    Ok((
        Synthetic {
            design: standardizer.transform(&train.design)?,
            targets: train.targets.clone(),
        },
        Synthetic {
            design: standardizer.transform(&validation.design)?,
            targets: validation.targets.clone(),
        },
    ))
}

fn ridge() -> Result<(), EstimationError> {
    // strongly collinear features make the normal equations ill-conditioned
    let values = linear_series(NUM_OBSERVATIONS, &[3.0, -1.0, 0.5, 2.0], 0.95, 0.5, SEED);
    let (train, validation) = values.split(VALIDATION_LEN);
    let (train, validation) = standardized(&train, &validation)?;

    for regularization_coeff in [0.0, 0.01, 0.1, 1.0, 10.0, 100.0] {
        let regressor = TikhonovRegularization {
            regularization_coeff,
        };
        let t0 = Instant::now();
        let fitted = match regressor.fit(&train.design, &train.targets) {
            Ok(fitted) => fitted,
            Err(e) => {
                warn!("ridge with regularization_coeff {}: {}", regularization_coeff, e);
                continue;
            }
        };
        let err = rmse(&fitted.predict(&validation.design)?, &validation.targets)?;
        info!(
            "ridge regularization_coeff: {}, weights: {:.4}, validation rmse: {:.4}, took {}us",
            regularization_coeff,
            fitted.weights().transpose(),
            err,
            t0.elapsed().as_micros()
        );
    }

    Ok(())
}

fn lasso() -> Result<(), EstimationError> {
    // only two of the five features carry signal
    let values = linear_series(NUM_OBSERVATIONS, &[2.0, 0.0, -3.0, 0.0, 0.0], 0.0, 0.3, SEED);
    let (train, validation) = values.split(VALIDATION_LEN);
    let (train, validation) = standardized(&train, &validation)?;

    for regularization_coeff in [0.0, 1.0, 10.0, 50.0] {
        let regressor = Lasso {
            seed: SEED,
            ..Lasso::new(regularization_coeff)
        };
        let t0 = Instant::now();
        let fitted = regressor.fit(&train.design, &train.targets)?;
        let err = rmse(&fitted.predict(&validation.design)?, &validation.targets)?;
        info!(
            "lasso regularization_coeff: {}, weights: {:.4}, validation rmse: {:.4}, took {}ms",
            regularization_coeff,
            fitted.weights().transpose(),
            err,
            t0.elapsed().as_millis()
        );
    }

    Ok(())
}

fn poisson() -> Result<(), EstimationError> {
    let mle = PoissonMle::default();

    let counts = [1, 0, 4, 1, 5];
    let fit = mle.estimate(&counts, 3.0)?;
    info!(
        "counts: {:?}, theta: {:.6}, sample mean: {:?}, neg log likelihood: {:.4}",
        counts,
        fit.theta(),
        sample_mean(&counts),
        fit.neg_log_likelihood()
    );

    for n in [10, 100, 1_000, 10_000] {
        let counts = sample_poisson(n, 3.0, SEED)?;
        let fit = mle.estimate(&counts, 1.0)?;
        info!(
            "{} samples of Poisson(3): theta: {:.4} after {} iterations",
            n,
            fit.theta(),
            fit.iterations()
        );
    }

    Ok(())
}

fn ridge_random_search() -> Result<(), EstimationError> {
    let values = linear_series(NUM_OBSERVATIONS, &[3.0, -1.0, 0.5, 2.0], 0.95, 0.5, SEED);
    let (train, validation) = values.split(VALIDATION_LEN);
    let (train, validation) = standardized(&train, &validation)?;

    let env = Arc::new(EnvValidation::new(
        Arc::new(train.design),
        Arc::new(train.targets),
        Arc::new(validation.design),
        Arc::new(validation.targets),
    ));

    let mut search = LambdaSearch::new(SEED, 16, -4.0, 3.0)?;
    for i in 0..NUM_GENS {
        let t0 = Instant::now();
        let best = search.step(env.clone(), |regularization_coeff| TikhonovRegularization {
            regularization_coeff,
        })?;
        info!(
            "generation {} took {}ms. best regularization_coeff: {}, rmse: {}",
            i,
            t0.elapsed().as_millis(),
            best.regularization_coeff,
            best.validation_rmse
        );
    }

    if let Some(best) = search.best() {
        info!(
            "best regularization_coeff: {}, weights: {:.4}",
            best.regularization_coeff,
            best.fitted.weights().transpose()
        );
    }

    Ok(())
}
