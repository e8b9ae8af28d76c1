//! PDF code extraction merged with the weight sheet

mod codes;
mod ledger;

pub use codes::{extract_codes, extract_pdf_text, party_name};
pub use ledger::{Ledger, MergeOutcome, extraction_table, merge_with_weights};

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::table::{Table, io};

/// What one extraction run found
#[derive(Debug)]
pub struct ExtractionRun {
    /// Per-PDF code counts, in input order
    pub per_file: Vec<(PathBuf, usize)>,
    /// Merged (or unmerged) rows for every code found
    pub outcome: Option<MergeOutcome>,
}

impl ExtractionRun {
    pub fn files_without_codes(&self) -> impl Iterator<Item = &Path> {
        self.per_file
            .iter()
            .filter(|(_, n)| *n == 0)
            .map(|(p, _)| p.as_path())
    }
}

/// Extract codes from every PDF and merge them with the weight workbook.
/// Nothing is written; the caller decides whether to append to the ledger.
pub fn extract_and_merge(pdfs: &[PathBuf], weights_path: &Path) -> Result<ExtractionRun> {
    let mut pairs = Vec::new();
    let mut per_file = Vec::new();

    for pdf in pdfs {
        log::info!("Processing {}", pdf.display());
        let text = extract_pdf_text(pdf)?;
        let codes = extract_codes(&text);
        let party = party_name(pdf);
        log::debug!("{}: {} codes for party '{}'", pdf.display(), codes.len(), party);
        per_file.push((pdf.clone(), codes.len()));
        pairs.extend(codes.into_iter().map(|code| (party.clone(), code)));
    }

    if pairs.is_empty() {
        return Ok(ExtractionRun {
            per_file,
            outcome: None,
        });
    }

    let extracted = extraction_table(&pairs);
    let weights: Table = io::read_table(weights_path)?;
    let outcome = merge_with_weights(&extracted, &weights)?;

    Ok(ExtractionRun {
        per_file,
        outcome: Some(outcome),
    })
}
