use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Loader settings
// ---------------------------------------------------------------------------

/// Where the records live inside the input resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Worksheet to read from spreadsheet files. Ignored for CSV.
    pub sheet_name: String,
    /// Leading rows discarded before the header row.
    pub metadata_rows: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Original Data".to_string(),
            metadata_rows: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline settings
// ---------------------------------------------------------------------------

/// Which rows the feature scaler is fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Fit on the training partition, apply to both partitions.
    #[default]
    TrainOnly,
    /// Fit on every clean row before splitting. Leaks evaluation statistics
    /// into training; kept for parity with the reference numbers.
    FullDataset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub loader: LoaderConfig,
    /// Fraction of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/evaluation shuffle.
    pub seed: u64,
    pub scaling: ScalingMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            test_fraction: 0.2,
            seed: 42,
            scaling: ScalingMode::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config. Absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("reading {}: {e}", path.display()))
        })?;
        let config: PipelineConfig = serde_json::from_str(&text).map_err(|e| {
            PipelineError::Config(format!("parsing {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::Config(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.loader.sheet_name.trim().is_empty() {
            return Err(PipelineError::Config("sheet_name is empty".to_string()));
        }
        Ok(())
    }
}
