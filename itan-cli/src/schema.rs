//! The one schema shared by every tool
//!
//! Source sheets disagree on header spelling (`Code` vs `CODE`, `DESIGN NO`
//! vs `DESIGN`, `WT` vs `WEIGHT` vs `weight`). Tools never look columns up by
//! raw name; they resolve a [`Field`] and get a column index or a
//! [`SchemaError`] naming everything that is missing.

use crate::table::Table;

/// A logical column understood across all sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Party,
    DesignNo,
    Weight,
    Quantity,
    Size,
    Date,
    Category,
    CategoryCode,
    ItemType,
    Delivered,
    MachCode,
}

impl Field {
    /// Canonical header written by this tool
    pub fn canonical(self) -> &'static str {
        match self {
            Field::Code => "Code",
            Field::Party => "PARTY",
            Field::DesignNo => "DESIGN NO",
            Field::Weight => "WT",
            Field::Quantity => "QTY",
            Field::Size => "SIZE",
            Field::Date => "DATE",
            Field::Category => "CATEGORY",
            Field::CategoryCode => "CatCd",
            Field::ItemType => "TYPE",
            Field::Delivered => "DELIVERED",
            Field::MachCode => "MACH CODE",
        }
    }

    /// Other headers seen in the wild, most specific first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Code => &["CODE"],
            Field::Party => &["parName", "Party Name", "PARTY NAME"],
            Field::DesignNo => &["DESIGN", "Design No"],
            Field::Weight => &["WEIGHT", "weight", "Weight"],
            Field::Quantity => &["noPcs", "PCS", "Quantity"],
            Field::Size => &["Size"],
            Field::Date => &["DocDate", "Date"],
            Field::Category => &["Category"],
            Field::CategoryCode => &["CATCD"],
            Field::ItemType => &["type", "Type"],
            Field::Delivered => &["Delivered"],
            Field::MachCode => &["MACHCODE", "Mach Code"],
        }
    }

    /// Find this field's column: exact canonical name, then exact alias,
    /// then any of those ignoring case and surrounding whitespace
    pub fn resolve(self, table: &Table) -> Option<usize> {
        if let Some(i) = table.column(self.canonical()) {
            return Some(i);
        }
        for alias in self.aliases() {
            if let Some(i) = table.column(alias) {
                return Some(i);
            }
        }
        let names: Vec<&str> = std::iter::once(self.canonical())
            .chain(self.aliases().iter().copied())
            .collect();
        table
            .columns
            .iter()
            .position(|c| names.iter().any(|n| n.eq_ignore_ascii_case(c.trim())))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Schema violation for a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    MissingColumns {
        context: String,
        missing: Vec<Field>,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingColumns { context, missing } => {
                let names: Vec<String> = missing
                    .iter()
                    .map(|m| {
                        let mut all = vec![m.canonical()];
                        all.extend(m.aliases().iter().take(2));
                        all.join("/")
                    })
                    .collect();
                write!(f, "{} is missing required columns: {}", context, names.join(", "))
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Resolve every field or report all the missing ones at once
pub fn require<const N: usize>(
    table: &Table,
    fields: [Field; N],
    context: &str,
) -> Result<[usize; N], SchemaError> {
    let mut found = [0usize; N];
    let mut missing = Vec::new();
    for (slot, field) in fields.iter().enumerate() {
        match field.resolve(table) {
            Some(i) => found[slot] = i,
            None => missing.push(*field),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(SchemaError::MissingColumns {
            context: context.to_string(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_canonical_then_alias() {
        let table = Table::new(["Category", "CATEGORY", "weight"]);
        assert_eq!(Field::Category.resolve(&table), Some(1));
        assert_eq!(Field::Weight.resolve(&table), Some(2));
    }

    #[test]
    fn test_resolve_ignores_case_and_padding() {
        let table = Table::new([" design no ", "Wt"]);
        assert_eq!(Field::DesignNo.resolve(&table), Some(0));
        assert_eq!(Field::Weight.resolve(&table), Some(1));
    }

    #[test]
    fn test_design_and_code_spellings() {
        let table = Table::new(["DESIGN", "CODE"]);
        assert_eq!(Field::DesignNo.resolve(&table), Some(0));
        assert_eq!(Field::Code.resolve(&table), Some(1));
    }

    #[test]
    fn test_require_lists_every_missing_field() {
        let table = Table::new(["DocDate", "parName"]);
        let err = require(&table, [Field::Date, Field::Party, Field::Weight, Field::Quantity], "Monthly sales")
            .unwrap_err();
        let SchemaError::MissingColumns { missing, .. } = &err;
        assert_eq!(missing, &vec![Field::Weight, Field::Quantity]);
        assert!(err.to_string().starts_with("Monthly sales is missing required columns: WT/WEIGHT/weight"));
    }

    #[test]
    fn test_require_returns_indices_in_request_order() {
        let table = Table::new(["QTY", "DATE", "WEIGHT"]);
        let [w, d] = require(&table, [Field::Weight, Field::Date], "Export").unwrap();
        assert_eq!((w, d), (2, 1));
    }
}
