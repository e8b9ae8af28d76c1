//! Extraction ledger: merge with the weight sheet and the cumulative xlsx

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::schema::{Field, require};
use crate::table::{Cell, Table, io};

pub const PARTY_COLUMN: &str = "Party Name";
pub const CODE_COLUMN: &str = "Code";

/// Outcome of merging extracted codes with weights
#[derive(Debug)]
pub enum MergeOutcome {
    Merged(Table),
    /// Weight sheet lacked required columns; the extraction is returned as-is
    Unmerged { table: Table, reason: String },
}

impl MergeOutcome {
    pub fn into_table(self) -> Table {
        match self {
            MergeOutcome::Merged(t) => t,
            MergeOutcome::Unmerged { table, .. } => table,
        }
    }
}

/// Build the `(Party Name, Code)` table from extracted pairs
pub fn extraction_table(pairs: &[(String, String)]) -> Table {
    let mut table = Table::new([PARTY_COLUMN, CODE_COLUMN]);
    for (party, code) in pairs {
        table.push_row(vec![Cell::text(party), Cell::text(code)]);
    }
    table
}

/// Left-join extracted codes onto the weight sheet's `Code, Category, Weight`
pub fn merge_with_weights(extracted: &Table, weights: &Table) -> Result<MergeOutcome> {
    let mut weights = weights.clone();
    weights.trim_headers();

    let [code, category, weight] = match require(
        &weights,
        [Field::Code, Field::Category, Field::Weight],
        "Weight sheet",
    ) {
        Ok(cols) => cols,
        Err(e) => {
            return Ok(MergeOutcome::Unmerged {
                table: extracted.clone(),
                reason: e.to_string(),
            });
        }
    };

    // Join on the extraction's own header names
    let mut lookup = Table::new([CODE_COLUMN, "Category", "Weight"]);
    for row in &weights.rows {
        lookup.push_row(vec![row[code].clone(), row[category].clone(), row[weight].clone()]);
    }
    let extra: Vec<usize> = (0..weights.columns.len())
        .filter(|c| ![code, category, weight].contains(c))
        .filter(|&c| {
            let name = &weights.columns[c];
            let clashes = lookup.columns.iter().any(|k| k.eq_ignore_ascii_case(name));
            if clashes {
                log::warn!("Weight sheet column '{}' clashes with a merged column and is skipped", name);
            }
            !clashes
        })
        .collect();
    for &c in &extra {
        let values = weights.rows.iter().map(|r| r[c].clone()).collect();
        lookup.set_column(&weights.columns[c], values);
    }

    let merged = extracted
        .left_join(&lookup, CODE_COLUMN)
        .context("Failed to merge extracted codes with weights")?;
    Ok(MergeOutcome::Merged(merged))
}

/// The cumulative extraction workbook plus the last-run snapshot
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    recent_path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>, recent_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recent_path: recent_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Current ledger contents (`None` if nothing was extracted yet)
    pub fn load(&self) -> Result<Option<Table>> {
        if !self.path.exists() {
            return Ok(None);
        }
        io::read_table(&self.path).map(Some)
    }

    /// Most recent run (`None` if no run was recorded)
    pub fn load_recent(&self) -> Result<Option<Table>> {
        if !self.recent_path.exists() {
            return Ok(None);
        }
        io::read_table(&self.recent_path).map(Some)
    }

    /// Append rows, rewriting the whole ledger; returns the new row count
    pub fn append(&self, data: &Table) -> Result<usize> {
        let combined = match self.load()? {
            Some(existing) => existing.concat(data),
            None => data.clone(),
        };
        io::write_table(&combined, &self.path, "Sheet1")
            .with_context(|| format!("Failed to update ledger: {}", self.path.display()))?;
        io::write_table(data, &self.recent_path, "Sheet1")
            .with_context(|| format!("Failed to save recent extraction: {}", self.recent_path.display()))?;
        log::info!("Ledger {} now holds {} rows", self.path.display(), combined.len());
        Ok(combined.len())
    }

    /// Delete the ledger and the last-run snapshot; returns whether a ledger existed
    pub fn clear(&self) -> Result<bool> {
        let existed = self.path.exists();
        for path in [&self.path, &self.recent_path] {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(String, String)> {
        vec![
            ("Shree".to_string(), "CM10".to_string()),
            ("Shree".to_string(), "FR2".to_string()),
        ]
    }

    #[test]
    fn test_merge_uses_trimmed_headers() {
        let mut weights = Table::new([" Code ", "Category ", " Weight", "Karat"]);
        weights.push_row(vec!["CM10".into(), "Ring".into(), 3.2.into(), "18K".into()]);

        let merged = merge_with_weights(&extraction_table(&pairs()), &weights)
            .unwrap()
            .into_table();
        assert_eq!(merged.columns, vec!["Party Name", "Code", "Category", "Weight", "Karat"]);
        assert_eq!(merged.rows[0][3], Cell::Number(3.2));
        assert_eq!(merged.rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_merge_keeps_resolved_weight_when_headers_clash() {
        let mut weights = Table::new(["Code", "Category", "WT", "Weight", "Karat"]);
        weights.push_row(vec!["CM10".into(), "Ring".into(), 3.2.into(), 9.9.into(), "18K".into()]);

        let merged = merge_with_weights(&extraction_table(&pairs()), &weights)
            .unwrap()
            .into_table();
        assert_eq!(merged.columns, vec!["Party Name", "Code", "Category", "Weight", "Karat"]);
        assert_eq!(merged.rows[0][3], Cell::Number(3.2));
    }

    #[test]
    fn test_merge_with_bad_sheet_returns_extraction() {
        let weights = Table::new(["Code", "Weight"]);
        let outcome = merge_with_weights(&extraction_table(&pairs()), &weights).unwrap();
        match outcome {
            MergeOutcome::Unmerged { table, reason } => {
                assert_eq!(table.len(), 2);
                assert!(reason.contains("CATEGORY"));
            }
            MergeOutcome::Merged(_) => panic!("expected unmerged outcome"),
        }
    }

    #[test]
    fn test_numeric_codes_join_with_text_codes() {
        let extracted = extraction_table(&[("P".to_string(), "123".to_string())]);
        let mut weights = Table::new(["Code", "Category", "Weight"]);
        weights.push_row(vec![123.0.into(), "Chain".into(), 8.0.into()]);
        let merged = merge_with_weights(&extracted, &weights).unwrap().into_table();
        assert_eq!(merged.rows[0][2], Cell::text("Chain"));
    }

    #[test]
    fn test_ledger_appends_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("Extracted_Data.xlsx"), dir.path().join("Recent.xlsx"));
        assert!(ledger.load().unwrap().is_none());

        let batch = extraction_table(&pairs());
        assert_eq!(ledger.append(&batch).unwrap(), 2);
        assert_eq!(ledger.append(&batch.head(1)).unwrap(), 3);
        assert_eq!(ledger.load_recent().unwrap().unwrap().len(), 1);

        assert!(ledger.clear().unwrap());
        assert!(!ledger.exists());
        assert!(ledger.load_recent().unwrap().is_none());
        assert!(!ledger.clear().unwrap());
    }
}
