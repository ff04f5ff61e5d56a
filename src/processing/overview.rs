use serde::Serialize;

use crate::data::Dataset;
use crate::processing::histogram::{histogram, Histogram, DEFAULT_BINS};
use crate::processing::statistics::DescriptiveStats;

/// Dashboard card for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOverview {
    pub column: String,
    pub stats: DescriptiveStats,
    pub histogram: Histogram,
}

/// Statistics and a default histogram for each selected column, in the
/// order given. Columns without a single numeric cell are left out.
pub fn column_overview(dataset: &Dataset, columns: &[String]) -> Vec<ColumnOverview> {
    columns
        .iter()
        .filter_map(|column| {
            let values = dataset.numeric_column(column);
            let Some(histogram) = histogram(&values, DEFAULT_BINS) else {
                tracing::debug!("column {column:?} has no numeric values, skipped");
                return None;
            };
            Some(ColumnOverview {
                column: column.clone(),
                stats: histogram.stats.clone(),
                histogram,
            })
        })
        .collect()
}
