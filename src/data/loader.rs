use std::path::Path;

use crate::data::cell::CellValue;
use crate::data::dataset::Dataset;
use crate::data::parser;

/// Load a CSV or spreadsheet file into a dataset keyed by its header row.
pub fn load_file(path: &Path) -> Result<Dataset, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "csv" => read_csv_rows(path)?,
        "xls" | "xlsx" | "xlsm" | "ods" => read_excel_rows(path)?,
        _ => return Err(format!("Unsupported file format: .{ext}")),
    };

    let dataset = rows_to_dataset(rows)?;
    tracing::info!(
        "Loaded {} rows x {} columns from {:?}",
        dataset.row_count(),
        dataset.columns.len(),
        path
    );
    Ok(dataset)
}

/// Parse CSV text that is already in memory.
pub fn parse_csv(text: &str) -> Result<Dataset, String> {
    rows_to_dataset(csv_rows(text.as_bytes()))
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, String> {
    let content = std::fs::read(path).map_err(|e| format!("Cannot read file: {e}"))?;
    // Latin-1 fallback: each byte maps to the same code point.
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{:?} is not valid UTF-8, reading as Latin-1", path);
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };
    Ok(csv_rows(text.as_bytes()))
}

fn csv_rows(bytes: &[u8]) -> Vec<Vec<CellValue>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();
                if row.iter().any(|c| !matches!(c, CellValue::Empty)) {
                    rows.push(row);
                }
            }
            Err(e) => tracing::warn!("Skipping malformed CSV record {}: {e}", i + 1),
        }
    }
    rows
}

fn read_excel_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, String> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("Cannot open Excel file: {e}"))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or("No sheets found")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Cannot read sheet: {e}"))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => CellValue::Empty,
                    Data::Float(f) => CellValue::Number(*f),
                    Data::Int(i) => CellValue::Number(*i as f64),
                    Data::String(s) => CellValue::from_text(s),
                    Data::Bool(b) => CellValue::Text(b.to_string()),
                    Data::DateTime(dt) => CellValue::Text(dt.to_string()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
                    Data::Error(e) => CellValue::Text(format!("{e:?}")),
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(|c| !matches!(c, CellValue::Empty)))
        .collect();
    Ok(rows)
}

fn rows_to_dataset(rows: Vec<Vec<CellValue>>) -> Result<Dataset, String> {
    if rows.is_empty() {
        return Err("No data found in file".to_string());
    }

    let header_row = parser::detect_header_row(&rows, parser::HEADER_SCAN_ROWS);
    // Cells past the header in wider rows get generated `Column N` names.
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let columns = parser::header_names(&rows[header_row], width);
    if columns.is_empty() {
        return Err("No columns found in header row".to_string());
    }
    tracing::debug!("Header detected at row {header_row}: {columns:?}");

    let data_rows = rows.into_iter().skip(header_row + 1);
    Ok(Dataset::from_rows(columns, data_rows))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn csv_text_becomes_records() {
        let ds = parse_csv("Defect,Line,Length\nScratch,A,12.1\nDent,B,\n,,\nCrack,A,n/a\n")
            .expect("csv should parse");
        assert_eq!(ds.columns, vec!["Defect", "Line", "Length"]);
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.numeric_column("Length"), vec![12.1]);
        assert_eq!(
            Dataset::cell(&ds.records[1], "Length"),
            &CellValue::Empty
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        let ds = parse_csv("a,b,c\n1,2\n4,5,6,7\n").expect("csv should parse");
        assert_eq!(ds.columns, vec!["a", "b", "c", "Column 4"]);
        assert_eq!(ds.numeric_column("c"), vec![6.0]);
        assert_eq!(ds.numeric_column("Column 4"), vec![7.0]);
    }

    #[test]
    fn header_with_blank_trailing_name_is_kept() {
        let ds = parse_csv("Defect,\nScratch,Night\nDent,Day\nScratch,Day\n").expect("csv should parse");
        assert_eq!(ds.columns, vec!["Defect", "Column 2"]);
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn header_with_numeric_name_is_kept() {
        let ds = parse_csv("Defect,2024\nScratch,Night\nDent,Day\n").expect("csv should parse");
        assert_eq!(ds.columns, vec!["Defect", "2024"]);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn preamble_line_is_skipped() {
        let ds = parse_csv("Line 3 export\nDefect,Shift\nScratch,Night\nDent,Day\n").expect("csv should parse");
        assert_eq!(ds.columns, vec!["Defect", "Shift"]);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_csv("").is_err());
        assert!(parse_csv("\n\n").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.txt")).unwrap_err();
        assert!(err.contains("Unsupported"), "{err}");
    }

    #[test]
    fn load_csv_from_disk_with_latin1_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("measurements.csv");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(b"Operario,Peso\nJos\xe9,10.5\nAna,11.5\n")
            .expect("write");
        drop(file);

        let ds = load_file(&path).expect("load");
        assert_eq!(ds.columns, vec!["Operario", "Peso"]);
        assert_eq!(ds.numeric_column("Peso"), vec![10.5, 11.5]);
        assert_eq!(
            Dataset::cell(&ds.records[0], "Operario"),
            &CellValue::Text("Jos\u{e9}".to_string())
        );
    }
}
