use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

/// Columns whose spread falls below this are left unscaled (centered only).
const MIN_SCALE: f64 = 1e-12;

/// Zero-mean, unit-variance scaling with statistics from the fitted rows.
///
/// Uses the population standard deviation. A constant column gets scale 1,
/// so it maps to all zeros instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Array1<f64>,
    scales: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let means = x.mean_axis(Axis(0)).ok_or_else(|| {
            PipelineError::DataSufficiency("cannot fit scaler on zero rows".to_string())
        })?;
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_SCALE { 1.0 } else { s });

        log::debug!("Scaler means: {means}, scales: {scales}");
        Ok(Self { means, scales })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.means.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.means.len(),
                got: x.ncols(),
            });
        }
        let mut out = x.to_owned();
        out -= &self.means;
        out /= &self.scales;
        Ok(out)
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn scales(&self) -> &Array1<f64> {
        &self.scales
    }
}
