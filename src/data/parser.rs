use std::collections::HashMap;

use crate::data::cell::CellValue;

/// How many leading rows are inspected when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Detect the header row index among raw rows.
///
/// Row 0 is the header unless it is a preamble line (title, export note)
/// narrower than the table. The header is then the first row, within the
/// first `max_rows`, that has the most common cell count, whatever its cells
/// hold. Falls back to row 0.
pub fn detect_header_row(rows: &[Vec<CellValue>], max_rows: usize) -> usize {
    let rows = &rows[..rows.len().min(max_rows)];
    let Some(first) = rows.first() else {
        return 0;
    };

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.len()).or_insert(0) += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    let table_width = top_width(&counts, top);
    // A first row as common as any other width is the header, not a preamble.
    if first.len() >= table_width || counts.get(&first.len()) == Some(&top) {
        return 0;
    }

    rows.iter().position(|r| r.len() == table_width).unwrap_or(0)
}

/// The widest row length among those seen `top` times.
fn top_width(counts: &HashMap<usize, usize>, top: usize) -> usize {
    counts
        .iter()
        .filter(|&(_, &c)| c == top)
        .map(|(&len, _)| len)
        .max()
        .unwrap_or(0)
}

/// Turn a raw header row into unique, non-empty column names.
pub fn header_names(row: &[CellValue], width: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(width);
    for i in 0..width {
        let raw = row.get(i).map(|c| c.label()).unwrap_or_default();
        let base = raw.trim().to_string();
        let base = if base.is_empty() {
            format!("Column {}", i + 1)
        } else {
            base
        };

        let mut name = base.clone();
        let mut suffix = 2;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}
