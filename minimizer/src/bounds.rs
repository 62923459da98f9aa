use common::{EstimationError, Result};

/// Per-coordinate box constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Lower bounds only, each coordinate is unbounded above
    pub fn lower(lower: Vec<f64>) -> Self {
        let upper = vec![f64::INFINITY; lower.len()];
        Self { lower, upper }
    }

    /// Lower and upper bounds, pairs are swapped if given in the wrong order
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(EstimationError::InvalidArgument(format!(
                "{} lower bounds but {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        if lower.iter().chain(upper.iter()).any(|v| v.is_nan()) {
            return Err(EstimationError::InvalidArgument("bounds must not be NaN".to_string()));
        }

        let (lower, upper): (Vec<f64>, Vec<f64>) =
            lower.iter().zip(upper.iter()).map(|(l, u)| (l.min(*u), l.max(*u))).unzip();
        Ok(Self { lower, upper })
    }

    /// Number of constrained coordinates
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Whether every coordinate lies inside its closed interval
    pub fn contains(&self, param: &[f64]) -> bool {
        param.len() == self.dim()
            && param
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(p, (l, u))| *p >= *l && *p <= *u)
    }

    /// Clamps every coordinate into its interval
    pub fn project(&self, param: &[f64]) -> Vec<f64> {
        param
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(p, (l, u))| p.max(*l).min(*u))
            .collect()
    }
}
