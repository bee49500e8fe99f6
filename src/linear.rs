use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Ordinary least squares
// ---------------------------------------------------------------------------

/// Condition numbers above this trigger a warning even at full rank.
const CONDITION_WARNING: f64 = 1e8;

/// Least-squares estimator with an intercept and no regularization.
///
/// The intercept is handled by centering: the slope is the least-squares
/// solution of the centered design, found through its SVD, and the intercept
/// is `ȳ - x̄·w`. Singular values below `σ_max · ε · max(n, p)` count as zero,
/// so a rank-deficient design yields the minimum-norm solution with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl LinearRegression {
    pub fn new() -> Self {
        Self
    }

    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LinearModel> {
        if x.nrows() != y.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        let (x_mean, y_mean) = match (x.mean_axis(Axis(0)), y.mean()) {
            (Some(xm), Some(ym)) => (xm, ym),
            _ => {
                return Err(PipelineError::DataSufficiency(
                    "cannot fit a linear model on zero rows".to_string(),
                ))
            }
        };

        let (n, p) = x.dim();
        let design = DMatrix::from_fn(n, p, |i, j| x[[i, j]] - x_mean[j]);
        let target = DVector::from_iterator(n, y.iter().map(|&v| v - y_mean));

        let svd = design.svd(true, true);
        let largest = svd.singular_values.iter().fold(0.0_f64, |acc, &s| acc.max(s));
        let cutoff = largest * f64::EPSILON * n.max(p) as f64;
        let rank = svd.rank(cutoff);
        let smallest_kept = svd
            .singular_values
            .iter()
            .copied()
            .filter(|&s| s > cutoff)
            .fold(f64::INFINITY, f64::min);

        let condition = if rank > 0 { largest / smallest_kept } else { f64::INFINITY };
        if rank < p {
            log::warn!(
                "Design matrix is rank deficient (rank {rank} of {p}); returning the minimum-norm solution"
            );
        } else if condition > CONDITION_WARNING {
            log::warn!("Design matrix is ill-conditioned (condition number {condition:.3e})");
        } else {
            log::debug!("Design matrix condition number {condition:.3e}");
        }

        let solution = svd
            .solve(&target, cutoff)
            .map_err(|e| PipelineError::Numerical(e.to_string()))?;
        let coefficients = Array1::from_iter(solution.iter().copied());

        let intercept = y_mean - x_mean.dot(&coefficients);
        Ok(LinearModel {
            coefficients,
            intercept,
            rank,
        })
    }
}

/// Fitted coefficients. Immutable once trained.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Array1<f64>,
    intercept: f64,
    rank: usize,
}

impl LinearModel {
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Effective rank of the centered design seen while fitting.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    /// Render intercept and coefficients, one per line.
    pub fn summary(&self, feature_names: &[String]) -> String {
        let mut s = String::new();
        s.push_str(&format!("Intercept: {:.6}\n", self.intercept));
        for (i, &c) in self.coefficients.iter().enumerate() {
            match feature_names.get(i) {
                Some(name) => s.push_str(&format!("  {name:16}: {c:>12.6}\n")),
                None => s.push_str(&format!("  Feature {i:<8}: {c:>12.6}\n")),
            }
        }
        s
    }
}
