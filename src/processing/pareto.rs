//! Pareto ranking of categorical values.
//!
//! Categories from every selected column are pooled into one shared
//! frequency table: the value `"Scratch"` in column A and in column B counts
//! toward the same bar. There is no per-column breakdown.

use std::collections::HashMap;

use serde::Serialize;

use crate::data::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoEntry {
    pub category: String,
    pub frequency: usize,
    /// Running share of the total, in percent, up to and including this entry.
    pub cumulative_percentage: f64,
}

/// Rank pre-counted categories. Entries are sorted by frequency descending;
/// equal frequencies keep their input order. Zero-count categories are
/// dropped. Returns an empty vec when the total is zero.
pub fn rank_counts<I, S>(counts: I) -> Vec<ParetoEntry>
where
    I: IntoIterator<Item = (S, usize)>,
    S: Into<String>,
{
    let mut tallies: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(c, n)| (c.into(), n))
        .filter(|(_, n)| *n > 0)
        .collect();
    // stable sort keeps first-seen order on ties
    tallies.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = tallies.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut cumulative = 0.0;
    tallies
        .into_iter()
        .map(|(category, frequency)| {
            cumulative += frequency as f64 / total as f64 * 100.0;
            ParetoEntry {
                category,
                frequency,
                cumulative_percentage: cumulative,
            }
        })
        .collect()
}

/// Count every present cell across `columns` and rank the categories.
///
/// Cells that are empty (or numeric zero) are not counted.
pub fn pareto(dataset: &Dataset, columns: &[String]) -> Vec<ParetoEntry> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &dataset.records {
        for column in columns {
            let cell = Dataset::cell(record, column);
            if !cell.is_present() {
                continue;
            }
            let key = cell.label();
            match counts.get_mut(&key) {
                Some(n) => *n += 1,
                None => {
                    counts.insert(key.clone(), 1);
                    order.push(key);
                }
            }
        }
    }

    rank_counts(order.into_iter().map(|k| {
        let n = counts[&k];
        (k, n)
    }))
}
