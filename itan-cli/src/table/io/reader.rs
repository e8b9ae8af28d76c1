//! Read tables from CSV and spreadsheet files

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};

use super::FileKind;
use crate::table::{Cell, Table, excel_serial_to_datetime, infer, parse_datetime};

/// Read a table from a CSV file or the first sheet of a workbook
pub fn read_table(path: &Path) -> Result<Table> {
    match FileKind::from_path(path)? {
        FileKind::Csv => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
            read_csv_str(&text).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
        }
        FileKind::Spreadsheet => {
            let mut sheets = read_sheets(path, false, true)?;
            Ok(sheets.pop().map(|(_, t)| t).unwrap_or_default())
        }
    }
}

/// Read every sheet of a workbook.
/// With `as_text`, every cell is kept as its display string.
pub fn read_all_sheets(path: &Path, as_text: bool) -> Result<Vec<(String, Table)>> {
    read_sheets(path, as_text, false)
}

fn read_sheets(path: &Path, as_text: bool, first_only: bool) -> Result<Vec<(String, Table)>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let mut names = workbook.sheet_names();
    if names.is_empty() {
        anyhow::bail!("Workbook has no sheets: {}", path.display());
    }
    if first_only {
        names.truncate(1);
    }

    let mut sheets = Vec::new();
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            sheets.push((name, Table::default()));
            continue;
        };

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, c)| match convert(c) {
                Cell::Empty => format!("Unnamed: {}", i),
                other => other.to_string(),
            })
            .collect();

        let mut table = Table::new(columns);
        for row in rows {
            let cells: Vec<Cell> = row
                .iter()
                .map(|c| {
                    let cell = convert(c);
                    if as_text && !matches!(cell, Cell::Empty) {
                        Cell::Text(cell.to_string())
                    } else {
                        cell
                    }
                })
                .collect();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            table.push_row(cells);
        }

        log::debug!("Read sheet '{}' with {} rows", name, table.len());
        sheets.push((name, table));
    }

    Ok(sheets)
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_datetime(s).map(Cell::Date).unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Parse CSV text with a header row, inferring numeric cells
pub fn read_csv_str(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("CSV has no header row")?.clone();
    let mut table = Table::new(headers.iter());

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at data row {}", line + 1))?;
        let cells: Vec<Cell> = record.iter().map(infer).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_infers_numbers() {
        let table = read_csv_str("DESIGN NO,WT,DATE\nCM101,12.5,2024-01-03\n,,\nFR7,3,\n").unwrap();
        assert_eq!(table.columns, vec!["DESIGN NO", "WT", "DATE"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Number(12.5));
        assert_eq!(table.rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_read_csv_pads_short_rows() {
        let table = read_csv_str("a,b,c\n1\n").unwrap();
        assert_eq!(table.rows[0], vec![Cell::Number(1.0), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_table(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }
}
