//! Write tables to CSV and xlsx

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::FileKind;
use crate::table::{Cell, Table};

/// Write a table to `path`, choosing CSV or xlsx from the extension
pub fn write_table(table: &Table, path: &Path, sheet_name: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    match FileKind::from_path(path)? {
        FileKind::Csv => {
            let text = table_to_csv(table)?;
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))
        }
        FileKind::Spreadsheet => write_workbook(&[(sheet_name, table)], path),
    }
}

/// Write several tables as named sheets of one xlsx workbook
fn write_workbook(sheets: &[(&str, &Table)], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(sheets)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    log::info!("Wrote {} sheet(s) to {}", sheets.len(), path.display());
    Ok(())
}

/// Render several tables as an in-memory xlsx workbook
pub fn workbook_bytes(sheets: &[(&str, &Table)]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(sheets)?;
    workbook
        .save_to_buffer()
        .context("Failed to render Excel workbook")
}

/// Render a table as CSV text
pub fn table_to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn build_workbook(sheets: &[(&str, &Table)]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_sheet(worksheet, table, &header_format)?;
    }

    Ok(workbook)
}

fn write_sheet(ws: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    for (col, name) in table.columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, name, header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(ws, row_num, col as u16, cell)?;
        }
    }
    Ok(())
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => { /* Leave cell empty */ }
        Cell::Text(s) => { ws.write_string(row, col, s)?; }
        Cell::Number(n) => { ws.write_number(row, col, *n)?; }
        Cell::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        Cell::Date(_) => { ws.write_string(row, col, cell.to_string())?; }
    }
    Ok(())
}
