/// Data layer: raw cell types, loading, and missing-value filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read sheet → grid → drop metadata rows, take header
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RawTable  │  column labels, rows of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  rows with no missing cell → retained indices
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
