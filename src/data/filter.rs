use std::collections::BTreeMap;

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Missing-value filtering
// ---------------------------------------------------------------------------

/// Return indices of rows with no missing cell in any column.
///
/// Every column counts, including ones the model never reads, the same way
/// a dataframe-wide `dropna` behaves.
pub fn complete_rows(table: &RawTable) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().all(|cell| !cell.is_null()))
        .map(|(i, _)| i)
        .collect()
}

/// Count of missing cells per column, omitting columns with none.
pub fn missing_counts(table: &RawTable) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in table.rows() {
        for (col, cell) in table.columns().iter().zip(row) {
            if cell.is_null() {
                *counts.entry(col.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}
