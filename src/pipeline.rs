use std::path::Path;

use ndarray::{Array1, Array2};

use crate::config::{PipelineConfig, ScalingMode};
use crate::data::loader::load_table;
use crate::data::model::RawTable;
use crate::error::Result;
use crate::linear::{LinearModel, LinearRegression};
use crate::metrics::{evaluate, RegressionMetrics};
use crate::preprocess::prepare;
use crate::scale::StandardScaler;
use crate::split::train_test_split;

// ---------------------------------------------------------------------------
// Stage wiring
// ---------------------------------------------------------------------------

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model: LinearModel,
    pub metrics: RegressionMetrics,
    pub feature_names: Vec<String>,
    pub n_train: usize,
    pub n_eval: usize,
}

/// Load `path` and run every stage with `config`.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<Evaluation> {
    config.validate()?;
    let table = load_table(path, &config.loader)?;
    run_on_table(&table, config)
}

/// Run every stage after loading.
pub fn run_on_table(table: &RawTable, config: &PipelineConfig) -> Result<Evaluation> {
    config.validate()?;

    let dataset = prepare(table)?;
    let feature_names = dataset.feature_names().to_vec();
    log::debug!("Gender codes in order: {:?}", dataset.encoder().classes());

    let (x_train, x_eval, y_train, y_eval) = match config.scaling {
        ScalingMode::FullDataset => {
            let (x, y) = dataset.into_standardized()?;
            let split = train_test_split(&x, &y, config.test_fraction, config.seed)?;
            (split.x_train, split.x_eval, split.y_train, split.y_eval)
        }
        ScalingMode::TrainOnly => {
            let split = train_test_split(dataset.x(), dataset.y(), config.test_fraction, config.seed)?;
            let scaler = StandardScaler::fit(&split.x_train)?;
            (
                scaler.transform(&split.x_train)?,
                scaler.transform(&split.x_eval)?,
                split.y_train,
                split.y_eval,
            )
        }
    };
    log::info!(
        "Preprocessed features with {:?} scaling ({} train, {} eval rows)",
        config.scaling,
        x_train.nrows(),
        x_eval.nrows()
    );

    let model = train(&x_train, &y_train)?;
    log::debug!("Fitted model:\n{}", model.summary(&feature_names));

    let metrics = evaluate(&model, &x_eval, &y_eval)?;
    Ok(Evaluation {
        model,
        metrics,
        feature_names,
        n_train: x_train.nrows(),
        n_eval: x_eval.nrows(),
    })
}

fn train(x: &Array2<f64>, y: &Array1<i64>) -> Result<LinearModel> {
    LinearRegression::new().fit(x, &y.mapv(|v| v as f64))
}
