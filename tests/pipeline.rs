use std::path::PathBuf;

use abalone_rings::data::loader::load_table;
use abalone_rings::preprocess::{prepare, preprocess};
use abalone_rings::{pipeline, LoaderConfig, PipelineConfig, PipelineError, ScalingMode};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

const HEADER: &str =
    "Gender,Length,Diameter,Height,Whole_weight,Shucked_weight,Viscera_weight,Shell_weight,Rings";

const TEN_ROWS: [&str; 10] = [
    "M,0.455,0.365,0.095,0.514,0.2245,0.101,0.15,15",
    "M,0.35,0.265,0.09,0.2255,0.0995,0.0485,0.07,7",
    "F,0.53,0.42,0.135,0.677,0.2565,0.1415,0.21,9",
    "M,0.44,0.365,0.125,0.516,0.2155,0.114,0.155,10",
    "F,0.33,0.255,0.08,0.205,0.0895,0.0395,0.055,7",
    "F,0.425,0.3,0.095,0.3515,0.141,0.0775,0.12,8",
    "F,0.53,0.415,0.15,0.7775,0.237,0.1415,0.33,20",
    "F,0.545,0.425,0.125,0.768,0.294,0.1495,0.26,16",
    "M,0.475,0.37,0.125,0.5095,0.2165,0.1125,0.165,9",
    "F,0.55,0.44,0.15,0.8945,0.3145,0.151,0.32,19",
];

fn write_resource(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let mut contents = String::from("Abalone data,,,,,,,,\nModelling extract,,,,,,,,\n");
    contents.push_str(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    let path = dir.path().join("abalone.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn write_workbook(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Notes").unwrap();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Original Data").unwrap();
    sheet.write_string(0, 0, "Abalone data").unwrap();
    sheet.write_string(1, 0, "Modelling extract").unwrap();
    for (r, line) in std::iter::once(HEADER).chain(rows.iter().copied()).enumerate() {
        for (c, field) in line.split(',').enumerate() {
            let (row, col) = (r as u32 + 2, c as u16);
            match field.parse::<f64>() {
                Ok(v) => sheet.write_number(row, col, v).unwrap(),
                Err(_) => sheet.write_string(row, col, field).unwrap(),
            };
        }
    }
    let path = dir.path().join("Manya_Gogia_DataModeling.xlsx");
    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_workbook_and_csv_give_same_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = write_workbook(&dir, &TEN_ROWS);
    let csv = write_resource(&dir, &TEN_ROWS);

    let config = PipelineConfig::default();
    let from_xlsx = pipeline::run(&xlsx, &config).unwrap();
    let from_csv = pipeline::run(&csv, &config).unwrap();
    assert_eq!(from_xlsx.n_train, 8);
    assert_eq!(from_xlsx.n_eval, 2);
    assert_eq!(from_xlsx.metrics, from_csv.metrics);
}

#[test]
fn test_ten_row_table_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_resource(&dir, &TEN_ROWS);

    for scaling in [ScalingMode::TrainOnly, ScalingMode::FullDataset] {
        let config = PipelineConfig {
            scaling,
            ..PipelineConfig::default()
        };
        let evaluation = pipeline::run(&path, &config).unwrap();
        assert_eq!(evaluation.n_train, 8);
        assert_eq!(evaluation.n_eval, 2);
        assert!(evaluation.metrics.mse.is_finite());
        assert!(evaluation.metrics.mse >= 0.0);
        assert!(evaluation.metrics.r2 <= 1.0);

        let report = evaluation.metrics.to_string();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Mean Squared Error: "));
        assert!(lines[1].starts_with("R^2 Score: "));
    }
}

#[test]
fn test_unparseable_length_excluded_from_features_and_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = TEN_ROWS.to_vec();
    rows[3] = "M,N/A,0.365,0.125,0.516,0.2155,0.114,0.155,10";
    let path = write_resource(&dir, &rows);

    let table = load_table(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(table.len(), 10);

    let dataset = prepare(&table).unwrap();
    assert_eq!(dataset.n_samples(), 9);
    assert_eq!(dataset.y().to_vec(), vec![15, 7, 9, 7, 8, 20, 16, 9, 19]);

    let (x, y) = preprocess(&table).unwrap();
    assert_eq!(x.nrows(), 9);
    assert_eq!(y.len(), 9);
}

#[test]
fn test_missing_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Manya_Gogia_DataModeling.xlsx");
    let err = pipeline::run(&path, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Resource { .. }));
}

#[test]
fn test_too_few_clean_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_resource(
        &dir,
        &[
            "M,0.455,0.365,0.095,0.514,0.2245,0.101,0.15,15",
            "F,,0.265,0.09,0.2255,0.0995,0.0485,0.07,7",
            "I,0.35,0.265,0.09,0.2255,0.0995,0.0485,0.07,unknown",
        ],
    );
    let err = pipeline::run(&path, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::DataSufficiency(_)));
}
