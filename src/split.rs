use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Train/evaluation partitioning
// ---------------------------------------------------------------------------

/// Rows partitioned into training and evaluation subsets.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_eval: Array2<f64>,
    pub y_train: Array1<i64>,
    pub y_eval: Array1<i64>,
    /// Source row of each training sample, in partition order.
    pub train_indices: Vec<usize>,
    /// Source row of each evaluation sample, in partition order.
    pub eval_indices: Vec<usize>,
}

/// Number of rows held out: `ceil(test_fraction * n)`.
pub fn eval_size(n: usize, test_fraction: f64) -> usize {
    (test_fraction * n as f64).ceil() as usize
}

/// Shuffle row indices once with `seed`, hold out the first
/// `eval_size(n, test_fraction)` rows and train on the rest.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<i64>,
    test_fraction: f64,
    seed: u64,
) -> Result<Split> {
    if x.nrows() != y.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::Config(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n = x.nrows();
    let n_eval = eval_size(n, test_fraction);
    if n_eval == 0 || n_eval >= n {
        return Err(PipelineError::DataSufficiency(format!(
            "cannot split {n} row(s) with test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (eval_indices, train_indices) = indices.split_at(n_eval);
    log::info!(
        "Split {n} rows: {} train, {} eval (seed {seed})",
        train_indices.len(),
        eval_indices.len()
    );

    Ok(Split {
        x_train: x.select(Axis(0), train_indices),
        x_eval: x.select(Axis(0), eval_indices),
        y_train: y.select(Axis(0), train_indices),
        y_eval: y.select(Axis(0), eval_indices),
        train_indices: train_indices.to_vec(),
        eval_indices: eval_indices.to_vec(),
    })
}
