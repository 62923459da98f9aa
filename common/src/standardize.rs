use nalgebra::{DMatrix, DVector};

use crate::{EstimationError, Result};

/// Learns per-column location and scale, so that features are penalized fairly
#[derive(Debug, Clone)]
pub struct Standardizer {
    means: DVector<f64>,
    std_devs: DVector<f64>,
}

impl Standardizer {
    /// Learn the column means and population standard deviations of `design`
    pub fn fit(design: &DMatrix<f64>) -> Result<Self> {
        if design.nrows() == 0 || design.ncols() == 0 {
            return Err(EstimationError::InvalidArgument(
                "cannot standardize an empty design matrix".to_string(),
            ));
        }
        let n = design.nrows() as f64;
        let means = DVector::from_iterator(
            design.ncols(),
            design.column_iter().map(|c| c.sum() / n),
        );
        let std_devs = DVector::from_iterator(
            design.ncols(),
            design
                .column_iter()
                .zip(means.iter())
                .map(|(c, m)| (c.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n).sqrt()),
        );
        debug!("standardizer means: {}, std_devs: {}", means, std_devs);

        Ok(Self { means, std_devs })
    }

    /// Center every column and scale it to unit variance.
    /// Constant columns are only centered.
    pub fn transform(&self, design: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if design.ncols() != self.means.len() {
            return Err(EstimationError::InvalidArgument(format!(
                "standardizer was fit on {} columns, got {}",
                self.means.len(),
                design.ncols()
            )));
        }

        Ok(DMatrix::from_fn(design.nrows(), design.ncols(), |i, j| {
            let centered = design[(i, j)] - self.means[j];
            if self.std_devs[j] > 0.0 {
                centered / self.std_devs[j]
            } else {
                centered
            }
        }))
    }

    /// Column means learned in `fit`
    #[inline(always)]
    pub fn means(&self) -> &DVector<f64> {
        &self.means
    }

    /// Column standard deviations learned in `fit`
    #[inline(always)]
    pub fn std_devs(&self) -> &DVector<f64> {
        &self.std_devs
    }
}

/// Prepends a column of ones, so the first coefficient acts as the intercept
pub fn with_intercept(design: &DMatrix<f64>) -> DMatrix<f64> {
    design.clone().insert_column(0, 1.0)
}
