//! Image-code extraction from catalogue PDFs
//!
//! Catalogue PDFs list product photos by file name, e.g. `ITCM1042.JPG`.
//! The product code is the part between the `IT` prefix and the extension.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(IT[A-Z]+\d+)\.(?:JPG|jpg)").expect("image code pattern is valid"));

/// Codes referenced by image file names in `text`, in order of appearance
pub fn extract_codes(text: &str) -> Vec<String> {
    IMAGE_CODE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().strip_prefix("IT").unwrap_or(m.as_str()).to_string())
        .collect()
}

/// Concatenated text of every page of a PDF
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))
}

/// Party name for a PDF: its file name without extension
pub fn party_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_codes_and_strips_prefix() {
        let text = "Page 1 ITCM1042.JPG ring ITFRS77.jpg\nITGL5.JPG";
        assert_eq!(extract_codes(text), vec!["CM1042", "FRS77", "GL5"]);
    }

    #[test]
    fn test_ignores_other_extensions_and_lowercase_prefix() {
        let text = "ITCM1.png itCM2.JPG ITCM3.Jpg IT42.JPG";
        assert!(extract_codes(text).is_empty());
    }

    #[test]
    fn test_codes_in_concatenated_page_text() {
        // Page texts are joined without separators, so codes can touch
        let text = "photoITCL12.JPGITCN9.jpg";
        assert_eq!(extract_codes(text), vec!["CL12", "CN9"]);
    }

    #[test]
    fn test_party_name_is_file_stem() {
        assert_eq!(party_name(Path::new("/tmp/Shree Gold.pdf")), "Shree Gold");
    }
}
