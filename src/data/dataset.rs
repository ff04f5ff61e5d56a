use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::cell::CellValue;

/// One row of the table, keyed by header name.
pub type Record = HashMap<String, CellValue>;

/// A loaded table: the header names in file order plus the rows.
///
/// Engines never infer columns from `columns`; callers pass the column names
/// they want analysed. The list is kept for display and selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from column names and row-major cells. Short rows are
    /// padded with `Empty`; surplus cells are dropped.
    pub fn from_rows<I, R, C>(columns: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        let records = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter().map(Into::into);
                columns
                    .iter()
                    .map(|name| (name.clone(), cells.next().unwrap_or_default()))
                    .collect::<Record>()
            })
            .collect();
        Self { columns, records }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// The raw cell at `column` in `record`, or `Empty` when the key is absent.
    pub fn cell<'a>(record: &'a Record, column: &str) -> &'a CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        record.get(column).unwrap_or(EMPTY)
    }

    /// Values of `column` that parse as finite numbers, in row order.
    /// Rows with missing, empty or non-numeric cells are skipped.
    pub fn numeric_column(&self, column: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| Self::cell(r, column).as_number())
            .collect()
    }

    /// Row-wise `(x, y)` pairs where both cells parse as finite numbers.
    pub fn numeric_pairs(&self, x_column: &str, y_column: &str) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| {
                let x = Self::cell(r, x_column).as_number()?;
                let y = Self::cell(r, y_column).as_number()?;
                Some((x, y))
            })
            .collect()
    }

    /// Whether at least half of the first 100 rows of `column` are numeric.
    pub fn is_mostly_numeric(&self, column: &str) -> bool {
        let sample: Vec<&CellValue> = self
            .records
            .iter()
            .take(100)
            .map(|r| Self::cell(r, column))
            .collect();
        if sample.is_empty() {
            return false;
        }
        let numeric = sample.iter().filter(|c| c.as_number().is_some()).count();
        numeric as f64 / sample.len() as f64 >= 0.5
    }
}
