//! Spreadsheet and CSV import/export for tables

mod reader;
mod writer;

pub use reader::{read_all_sheets, read_csv_str, read_table};
pub use writer::{table_to_csv, workbook_bytes, write_table};

use std::path::Path;

/// File kinds understood by the readers and writers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Pick the kind from a path extension
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileKind::Spreadsheet),
            _ => anyhow::bail!(
                "Unsupported file type '{}': expected .csv, .xlsx, .xls or .ods",
                path.display()
            ),
        }
    }
}
