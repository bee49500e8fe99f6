use std::fmt;

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::linear::LinearModel;

// ---------------------------------------------------------------------------
// Regression metrics
// ---------------------------------------------------------------------------

/// Scores of a fitted model on one set of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Coefficient of determination
    pub r2: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn calculate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(PipelineError::DataSufficiency(
                "cannot score an empty evaluation set".to_string(),
            ));
        }
        Ok(Self {
            mse: Self::mean_squared_error(y_true, y_pred),
            r2: Self::r_squared(y_true, y_pred),
            n_samples: y_true.len(),
        })
    }

    /// Mean Squared Error: (1/n) * Σ(y_true - y_pred)²
    pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum::<f64>()
            / n
    }

    /// R² = 1 - SS_res / SS_tot
    ///
    /// With constant targets SS_tot is zero; the score is then 1.0 for an
    /// exact fit and 0.0 otherwise.
    pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let y_mean = y_true.mean().unwrap_or(0.0);

        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|&t| (t - y_mean).powi(2)).sum();

        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean Squared Error: {}", self.mse)?;
        writeln!(f, "R^2 Score: {}", self.r2)
    }
}

/// Score `model` on the evaluation partition.
pub fn evaluate(model: &LinearModel, x: &Array2<f64>, y: &Array1<i64>) -> Result<RegressionMetrics> {
    if x.nrows() != y.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    let y_pred = model.predict(x)?;
    let y_true = y.mapv(|v| v as f64);
    let metrics = RegressionMetrics::calculate(&y_true, &y_pred)?;
    log::info!(
        "Evaluated on {} samples: mse={:.6}, r2={:.6}",
        metrics.n_samples,
        metrics.mse,
        metrics.r2
    );
    Ok(metrics)
}
