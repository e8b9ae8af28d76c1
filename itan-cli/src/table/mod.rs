//! In-memory tables of spreadsheet rows
//!
//! Every tool in this crate reads a sheet, reshapes it and writes or prints
//! the result. `Table` keeps column names in sheet order and rows as plain
//! vectors of [`Cell`]s; no schema is enforced here (see [`crate::schema`]).

mod aggregate;
mod cell;
pub mod io;

pub use aggregate::{GroupTotal, RankMethod, SortOrder, group_sum, rank, sort_by_total};
pub use cell::{Cell, excel_serial_to_datetime, infer, parse_datetime};

use serde_json::{Map, Value as JsonValue};

/// A sheet of rows with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the table width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact column lookup
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name)
    #[cfg(test)]
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over one column's cells
    pub fn values(&self, col: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |r| r.get(col).unwrap_or(&Cell::Empty))
    }

    /// Add a column, or replace its values if it already exists
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        let col = match self.column(name) {
            Some(col) => col,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(Cell::Empty);
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
    }

    /// Rewrite one column in place
    pub fn map_column(&mut self, col: usize, f: impl Fn(&Cell) -> Cell) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(col) {
                *cell = f(cell);
            }
        }
    }

    /// Strip surrounding whitespace from column names
    pub fn trim_headers(&mut self) {
        for col in &mut self.columns {
            *col = col.trim().to_string();
        }
    }

    /// Keep rows for which the predicate holds
    pub fn filter(&self, mut keep: impl FnMut(&[Cell]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project onto the named columns (unknown names are skipped)
    pub fn select(&self, names: &[&str]) -> Table {
        let picked: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|n| self.column(n).map(|i| (i, *n)))
            .collect();
        Table {
            columns: picked.iter().map(|(_, n)| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| picked.iter().map(|(i, _)| r[*i].clone()).collect())
                .collect(),
        }
    }

    /// Stack two tables; the result has the union of both column sets
    pub fn concat(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        for col in &other.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }

        let mut out = Table::new(columns);
        for part in [self, other] {
            let mapping: Vec<usize> = part
                .columns
                .iter()
                .map(|c| out.column(c).unwrap_or_default())
                .collect();
            for row in &part.rows {
                let mut new_row = vec![Cell::Empty; out.columns.len()];
                for (src, dst) in mapping.iter().enumerate() {
                    new_row[*dst] = row.get(src).cloned().unwrap_or_default();
                }
                out.rows.push(new_row);
            }
        }
        out
    }

    /// Left join on a shared key column.
    ///
    /// Every left row is kept. A left row with several matching right rows is
    /// repeated once per match; a left row with no match gets `Empty` for every
    /// right column. Non-key columns present on both sides are suffixed with
    /// `_x` (left) and `_y` (right).
    pub fn left_join(&self, right: &Table, key: &str) -> anyhow::Result<Table> {
        let left_key = self
            .column(key)
            .ok_or_else(|| anyhow::anyhow!("Left table has no '{}' column", key))?;
        let right_key = right
            .column(key)
            .ok_or_else(|| anyhow::anyhow!("Right table has no '{}' column", key))?;

        let right_cols: Vec<usize> = (0..right.columns.len()).filter(|c| *c != right_key).collect();

        let mut columns: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i != left_key && right.column(c).is_some() {
                    format!("{}_x", c)
                } else {
                    c.clone()
                }
            })
            .collect();
        for &c in &right_cols {
            let name = &right.columns[c];
            if self.column(name).is_some() {
                columns.push(format!("{}_y", name));
            } else {
                columns.push(name.clone());
            }
        }

        let mut index: std::collections::HashMap<String, Vec<usize>> = std::collections::HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            if let Some(k) = row[right_key].key() {
                index.entry(k).or_default().push(i);
            }
        }

        let mut out = Table::new(columns);
        for row in &self.rows {
            let matches = row[left_key].key().and_then(|k| index.get(&k));
            match matches {
                Some(hits) => {
                    for &hit in hits {
                        let mut new_row = row.clone();
                        new_row.extend(right_cols.iter().map(|&c| right.rows[hit][c].clone()));
                        out.rows.push(new_row);
                    }
                }
                None => {
                    let mut new_row = row.clone();
                    new_row.extend(std::iter::repeat_n(Cell::Empty, right_cols.len()));
                    out.rows.push(new_row);
                }
            }
        }
        Ok(out)
    }

    /// Rows where any cell contains `query`, ignoring case.
    /// An empty query matches every row.
    pub fn search(&self, query: &str) -> Table {
        let needle = query.to_lowercase();
        self.filter(|row| row.iter().any(|c| c.to_string().to_lowercase().contains(&needle)))
    }

    /// Distinct non-empty values of a column, in first-seen order
    pub fn unique(&self, col: usize) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.values(col)
            .filter_map(Cell::key)
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json(&self) -> JsonValue {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (name, cell) in self.columns.iter().zip(row) {
                    obj.insert(
                        name.clone(),
                        serde_json::to_value(cell).unwrap_or(JsonValue::Null),
                    );
                }
                JsonValue::Object(obj)
            })
            .collect();
        JsonValue::Array(records)
    }
}
