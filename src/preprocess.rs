use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::data::filter::{complete_rows, missing_counts};
use crate::data::model::{CellValue, RawTable};
use crate::encode::LabelEncoder;
use crate::error::{PipelineError, Result};
use crate::scale::StandardScaler;

pub const CATEGORICAL_COLUMN: &str = "Gender";
pub const TARGET_COLUMN: &str = "Rings";

/// Columns coerced to numbers. The target is among them.
pub const NUMERIC_COLUMNS: [&str; 8] = [
    "Length",
    "Diameter",
    "Height",
    "Whole_weight",
    "Shucked_weight",
    "Viscera_weight",
    "Shell_weight",
    "Rings",
];

/// Feature matrix column order.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Gender",
    "Length",
    "Diameter",
    "Height",
    "Whole_weight",
    "Shucked_weight",
    "Viscera_weight",
    "Shell_weight",
];

/// Downstream splitting needs at least one row on each side.
pub const MIN_ROWS: usize = 2;

// ---------------------------------------------------------------------------
// Dataset – cleaned, encoded, not yet scaled
// ---------------------------------------------------------------------------

/// Features and target with row-for-row correspondence.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<i64>,
    feature_names: Vec<String>,
    encoder: LabelEncoder,
}

impl Dataset {
    pub fn new(
        x: Array2<f64>,
        y: Array1<i64>,
        feature_names: Vec<String>,
        encoder: LabelEncoder,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.ncols() != feature_names.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: x.ncols(),
                got: feature_names.len(),
            });
        }
        Ok(Self {
            x,
            y,
            feature_names,
            encoder,
        })
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<i64> {
        &self.y
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Standardize every feature column over all rows.
    pub fn into_standardized(self) -> Result<(Array2<f64>, Array1<i64>)> {
        let (_, x) = StandardScaler::fit_transform(&self.x)?;
        Ok((x, self.y))
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// All preprocessing steps, with the scaler fitted on every clean row.
///
/// In order: numeric coercion, label encoding of `Gender`, dropping
/// incomplete rows, separating features from `Rings`, standardization.
pub fn preprocess(table: &RawTable) -> Result<(Array2<f64>, Array1<i64>)> {
    prepare(table)?.into_standardized()
}

/// Coerce, encode, drop incomplete rows and split features from target.
pub fn prepare(table: &RawTable) -> Result<Dataset> {
    let mut table = table.clone();

    let coerced = coerce_numeric_columns(&mut table)?;
    for (column, count) in &coerced {
        log::warn!("{count} value(s) in '{column}' are not numeric; treating as missing");
    }

    let encoder = encode_categorical(&mut table, CATEGORICAL_COLUMN)?;
    log::debug!("{} classes: {:?}", encoder.column, encoder.classes());

    for (column, count) in missing_counts(&table) {
        log::debug!("{count} missing value(s) in '{column}'");
    }
    let keep = complete_rows(&table);
    let dropped = table.len() - keep.len();
    if dropped > 0 {
        log::info!("Dropped {dropped} incomplete row(s), {} remain", keep.len());
    }
    if keep.len() < MIN_ROWS {
        return Err(PipelineError::DataSufficiency(format!(
            "{} complete row(s) after cleaning, need at least {MIN_ROWS}",
            keep.len()
        )));
    }

    let feature_idx = FEATURE_COLUMNS
        .iter()
        .map(|name| table.column_index(name))
        .collect::<Result<Vec<_>>>()?;
    let target_idx = table.column_index(TARGET_COLUMN)?;

    let mut x = Array2::<f64>::zeros((keep.len(), feature_idx.len()));
    let mut y = Array1::<i64>::zeros(keep.len());
    for (out_row, &row_idx) in keep.iter().enumerate() {
        let row = &table.rows()[row_idx];
        for (out_col, &col_idx) in feature_idx.iter().enumerate() {
            x[[out_row, out_col]] = numeric(&row[col_idx]);
        }
        // Integer cast truncates toward zero.
        y[out_row] = numeric(&row[target_idx]) as i64;
    }

    let feature_names = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
    Dataset::new(x, y, feature_names, encoder)
}

/// Replace each cell of the numeric columns with a `Float`, or `Null` when it
/// cannot be parsed. Returns how many non-missing cells became missing.
fn coerce_numeric_columns(table: &mut RawTable) -> Result<BTreeMap<String, usize>> {
    let indices = NUMERIC_COLUMNS
        .iter()
        .map(|name| table.column_index(name).map(|idx| (*name, idx)))
        .collect::<Result<Vec<_>>>()?;

    let mut coerced = BTreeMap::new();
    for row in table.rows_mut() {
        for &(name, idx) in &indices {
            let cell = &mut row[idx];
            let value = match cell.coerce_f64() {
                Some(v) => CellValue::Float(v),
                None => {
                    if !cell.is_null() {
                        *coerced.entry(name.to_string()).or_insert(0) += 1;
                    }
                    CellValue::Null
                }
            };
            *cell = value;
        }
    }
    Ok(coerced)
}

/// Replace the categorical column with integer codes. Missing stays missing.
fn encode_categorical(table: &mut RawTable, column: &str) -> Result<LabelEncoder> {
    let idx = table.column_index(column)?;
    let encoder = LabelEncoder::fit(column, &table.unique_values(idx));

    for row in table.rows_mut() {
        let cell = &mut row[idx];
        *cell = match encoder.code_for(cell) {
            Some(code) => CellValue::Integer(code),
            None => CellValue::Null,
        };
    }
    Ok(encoder)
}

/// Cells reaching this point have been coerced or encoded.
fn numeric(cell: &CellValue) -> f64 {
    cell.coerce_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    pub(crate) fn header() -> Vec<String> {
        std::iter::once(CATEGORICAL_COLUMN)
            .chain(NUMERIC_COLUMNS)
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn row(gender: &str, measurements: [&str; 7], rings: &str) -> Vec<CellValue> {
        std::iter::once(gender)
            .chain(measurements)
            .chain(std::iter::once(rings))
            .map(CellValue::parse)
            .collect()
    }

    fn sample_table() -> RawTable {
        RawTable::new(
            header(),
            vec![
                row("M", ["0.455", "0.365", "0.095", "0.514", "0.2245", "0.101", "0.15"], "15"),
                row("M", ["0.35", "0.265", "0.09", "0.2255", "0.0995", "0.0485", "0.07"], "7"),
                row("F", ["0.53", "0.42", "0.135", "0.677", "0.2565", "0.1415", "0.21"], "9"),
                row("M", ["N/A", "0.365", "0.125", "0.516", "0.2155", "0.114", "0.155"], "10"),
                row("I", ["0.33", "0.255", "0.08", "0.205", "0.0895", "0.0395", "0.055"], "7"),
                row("I", ["0.425", "0.3", "0.095", "0.3515", "0.141", "0.0775", "0.12"], "8"),
            ],
        )
    }

    #[test]
    fn test_features_and_target_align() {
        let (x, y) = preprocess(&sample_table()).unwrap();
        assert_eq!(x.nrows(), y.len());
        assert_eq!(x.ncols(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn test_unparseable_cell_drops_row_from_both() {
        let dataset = prepare(&sample_table()).unwrap();
        assert_eq!(dataset.n_samples(), 5);
        assert_eq!(dataset.y().to_vec(), vec![15, 7, 9, 7, 8]);
        // The 0.365 diameter of the dropped row only appears once, in row 0.
        let diameters: Vec<f64> = dataset.x().column(2).to_vec();
        assert_eq!(diameters.iter().filter(|&&d| d == 0.365).count(), 1);
    }

    #[test]
    fn test_gender_codes_are_alphabetical() {
        let dataset = prepare(&sample_table()).unwrap();
        assert_eq!(dataset.encoder().classes(), vec!["F", "I", "M"]);
        let codes: Vec<f64> = dataset.x().column(0).to_vec();
        assert_eq!(codes, vec![2.0, 2.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_codes_do_not_depend_on_row_order() {
        let table = sample_table();
        let mut reversed_rows = table.rows().to_vec();
        reversed_rows.reverse();
        let reversed = RawTable::new(table.columns().to_vec(), reversed_rows);

        let a = prepare(&table).unwrap();
        let b = prepare(&reversed).unwrap();
        assert_eq!(a.encoder(), b.encoder());
    }

    #[test]
    fn test_target_truncates_toward_zero() {
        let table = RawTable::new(
            header(),
            vec![
                row("M", ["0.4"; 7], "9.9"),
                row("F", ["0.5"; 7], "12.0"),
            ],
        );
        let dataset = prepare(&table).unwrap();
        assert_eq!(dataset.y().to_vec(), vec![9, 12]);
    }

    #[test]
    fn test_standardized_features() {
        let (x, _) = preprocess(&sample_table()).unwrap();
        for col in x.columns() {
            assert_abs_diff_eq!(col.mean().unwrap(), 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(col.std(0.0), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_missing_gender_drops_row() {
        let table = RawTable::new(
            header(),
            vec![
                row("M", ["0.4"; 7], "9"),
                row("", ["0.5"; 7], "10"),
                row("F", ["0.6"; 7], "11"),
            ],
        );
        let dataset = prepare(&table).unwrap();
        assert_eq!(dataset.y().to_vec(), vec![9, 11]);
    }

    #[test]
    fn test_extra_column_with_missing_value_drops_row() {
        let mut columns = header();
        columns.push("Notes".to_string());
        let mut rows = vec![
            row("M", ["0.4"; 7], "9"),
            row("F", ["0.5"; 7], "10"),
            row("I", ["0.6"; 7], "11"),
        ];
        rows[0].push(CellValue::String("keep".into()));
        rows[1].push(CellValue::Null);
        rows[2].push(CellValue::String("keep".into()));

        let dataset = prepare(&RawTable::new(columns, rows)).unwrap();
        assert_eq!(dataset.y().to_vec(), vec![9, 11]);
    }

    #[test]
    fn test_too_few_rows() {
        let table = RawTable::new(
            header(),
            vec![
                row("M", ["0.4"; 7], "9"),
                row("F", ["bad"; 7], "10"),
            ],
        );
        assert!(matches!(
            prepare(&table),
            Err(PipelineError::DataSufficiency(_))
        ));
    }

    #[test]
    fn test_missing_column() {
        let mut columns = header();
        columns.retain(|c| c != "Height");
        let table = RawTable::new(columns, vec![]);
        assert!(matches!(
            prepare(&table),
            Err(PipelineError::MissingColumn(c)) if c == "Height"
        ));
    }
}
