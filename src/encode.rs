use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Label encoding: categorical value → integer code
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to codes `0..n`.
///
/// Codes follow the sorted order of the values (alphabetical for text), so
/// the mapping is the same whatever order the rows arrive in.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    pub column: String,
    mapping: BTreeMap<CellValue, i64>,
}

impl LabelEncoder {
    /// Build an encoder for the given column from its unique values.
    pub fn fit(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let mapping: BTreeMap<CellValue, i64> = unique_values
            .iter()
            .filter(|v| !v.is_null())
            .zip(0..)
            .map(|(v, code)| (v.clone(), code))
            .collect();

        LabelEncoder {
            column: column.to_string(),
            mapping,
        }
    }

    /// Code for a value, or `None` for values not seen while fitting.
    pub fn code_for(&self, value: &CellValue) -> Option<i64> {
        self.mapping.get(value).copied()
    }

    /// Class labels in code order.
    pub fn classes(&self) -> Vec<String> {
        self.mapping.keys().map(|v| v.to_string()).collect()
    }
}
