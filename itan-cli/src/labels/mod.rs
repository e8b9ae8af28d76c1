//! Product labels: look a design up in a workbook, edit its fields, render
//! a label with a Code128 barcode of the machine code

pub mod barcode;
pub mod render;

use anyhow::Result;

use crate::schema::Field;
use crate::table::Table;

pub use render::render_svg;

pub const ORDER_NO: &str = "Order No";
pub const PARTY_CODE: &str = "Party Code";
pub const DEFAULT_ORDER_NO: &str = "Default_Order";
pub const DEFAULT_PARTY_CODE: &str = "Default_Party";

/// Fields not repeated in the label body
const HIDDEN_FIELDS: [&str; 3] = [ORDER_NO, PARTY_CODE, "DESIGN NO"];

/// Ordered field map of one product
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    fields: Vec<(String, String)>,
}

impl LabelData {
    /// Start from product fields; order and party codes get their defaults
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut label = Self { fields };
        for (key, default) in [(ORDER_NO, DEFAULT_ORDER_NO), (PARTY_CODE, DEFAULT_PARTY_CODE)] {
            if label.get(key).is_none() {
                label.fields.push((key.to_string(), default.to_string()));
            }
        }
        label
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace a field, or append it when new
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    /// Apply `KEY=VALUE` edits
    pub fn apply_edits(&mut self, edits: &[String]) -> Result<()> {
        for edit in edits {
            let Some((key, value)) = edit.split_once('=') else {
                anyhow::bail!("Invalid field edit '{}', expected KEY=VALUE", edit);
            };
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("Invalid field edit '{}': empty field name", edit);
            }
            self.set(key, value.trim());
        }
        Ok(())
    }

    /// Machine code the barcode encodes
    pub fn mach_code(&self) -> Result<&str> {
        let key = Field::MachCode.canonical();
        match self.get(key).map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => anyhow::bail!("Product has no {} to encode as a barcode", key),
        }
    }
}

/// First row whose `DESIGN NO` equals `code`, searching sheets in order
pub fn find_product(sheets: &[(String, Table)], code: &str) -> Option<(String, Vec<(String, String)>)> {
    let code = code.trim();
    sheets.iter().find_map(|(name, table)| {
        let design = table.column(Field::DesignNo.canonical())?;
        let row = table
            .rows
            .iter()
            .find(|row| row[design].to_string().trim() == code)?;
        let fields = table
            .columns
            .iter()
            .cloned()
            .zip(row.iter().map(|c| c.to_string()))
            .collect();
        Some((name.clone(), fields))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets() -> Vec<(String, Table)> {
        let mut first = Table::new(["CODE", "WT"]);
        first.push_row(vec!["CM1".into(), "3".into()]);

        let mut second = Table::new(["DESIGN NO", "MACH CODE", "WT"]);
        second.push_row(vec!["CM1".into(), "M-1".into(), "2.5".into()]);
        second.push_row(vec!["CM1".into(), "M-2".into(), "9".into()]);

        let mut third = Table::new(["DESIGN NO", "MACH CODE"]);
        third.push_row(vec!["FR7".into(), "M-7".into()]);
        vec![
            ("Codes".to_string(), first),
            ("Rings".to_string(), second),
            ("Fancy".to_string(), third),
        ]
    }

    #[test]
    fn test_find_first_matching_row_across_sheets() {
        let (sheet, fields) = find_product(&sheets(), "CM1").unwrap();
        assert_eq!(sheet, "Rings");
        assert_eq!(fields[1], ("MACH CODE".to_string(), "M-1".to_string()));

        let (sheet, _) = find_product(&sheets(), " FR7 ").unwrap();
        assert_eq!(sheet, "Fancy");
        assert!(find_product(&sheets(), "ZZ9").is_none());
    }

    #[test]
    fn test_defaults_and_edits() {
        let (_, fields) = find_product(&sheets(), "CM1").unwrap();
        let mut label = LabelData::from_fields(fields);
        assert_eq!(label.get(ORDER_NO), Some(DEFAULT_ORDER_NO));
        assert_eq!(label.get(PARTY_CODE), Some(DEFAULT_PARTY_CODE));

        label
            .apply_edits(&["Order No=ORD-42".to_string(), "WT = 2.6".to_string()])
            .unwrap();
        assert_eq!(label.get(ORDER_NO), Some("ORD-42"));
        assert_eq!(label.get("WT"), Some("2.6"));
        assert_eq!(label.mach_code().unwrap(), "M-1");

        assert!(label.apply_edits(&["no equals".to_string()]).is_err());
    }
}
