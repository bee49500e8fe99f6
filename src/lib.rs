//! # Abalone ring-count regression
//!
//! Predicts the number of shell rings (a proxy for age) of an abalone
//! specimen from its sex and seven body measurements, using ordinary least
//! squares on standardized features.
//!
//! ## Modules
//!
//! - `data` - raw cell types, spreadsheet/CSV loading, missing-value filtering
//! - `preprocess` - numeric coercion, label encoding, feature/target separation
//! - `encode` - label encoder for the categorical column
//! - `scale` - standard scaler
//! - `split` - seeded train/evaluation split
//! - `linear` - least-squares fitting
//! - `metrics` - mean squared error and R²
//! - `pipeline` - the stages wired together
//! - `config` - run constants
//! - `error` - error taxonomy

pub mod config;
pub mod data;
pub mod encode;
pub mod error;
pub mod linear;
pub mod metrics;
pub mod pipeline;
pub mod preprocess;
pub mod scale;
pub mod split;

pub use config::{LoaderConfig, PipelineConfig, ScalingMode};
pub use data::model::{CellValue, RawTable};
pub use error::{PipelineError, Result};
pub use linear::{LinearModel, LinearRegression};
pub use metrics::RegressionMetrics;
pub use pipeline::Evaluation;
