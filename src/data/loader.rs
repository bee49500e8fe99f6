use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::model::{CellValue, RawTable};
use crate::config::LoaderConfig;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw specimen table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – the sheet named in `config`
/// * `.csv` – a single sheet with the same row layout
///
/// In both cases the first `config.metadata_rows` rows are discarded, the
/// following row supplies the column labels and the remaining rows become
/// the table, indexed from zero.
pub fn load_table(path: &Path, config: &LoaderConfig) -> Result<RawTable> {
    if !path.exists() {
        return Err(PipelineError::resource(path, "file not found"));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_sheet(path, &config.sheet_name)?,
        "csv" => read_csv(path)?,
        other => {
            return Err(PipelineError::resource(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };

    let table = RawTable::from_grid(grid, config.metadata_rows).ok_or_else(|| {
        PipelineError::resource(
            path,
            format!("no header row after {} metadata rows", config.metadata_rows),
        )
    })?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    log::debug!("Header: {:?}", table.columns());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_sheet(path: &Path, sheet_name: &str) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PipelineError::resource(path, format!("opening workbook: {e}")))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet_name) {
        return Err(PipelineError::resource(
            path,
            format!("sheet '{sheet_name}' not found (available: {})", sheet_names.join(", ")),
        ));
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| PipelineError::resource(path, format!("reading sheet '{sheet_name}': {e}")))?;

    // The range begins at the first used cell; pad back to A1 so row
    // positions match the sheet.
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    grid.extend(range.rows().map(|row| {
        std::iter::repeat(CellValue::Null)
            .take(col_offset)
            .chain(row.iter().map(spreadsheet_to_cell))
            .collect()
    }));
    Ok(grid)
}

fn spreadsheet_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::parse(s),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number; the numeric columns never hold dates, so the raw
        // value is enough.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        // `#N/A`, `#DIV/0!` and friends read as missing, as they would in a
        // dataframe.
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every record, header included, is kept as data. Rows may differ in length.
fn read_csv(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::resource(path, format!("opening CSV: {e}")))?;

    let mut grid = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| PipelineError::resource(path, format!("CSV row {row_no}: {e}")))?;
        grid.push(record.iter().map(CellValue::parse).collect());
    }
    Ok(grid)
}
