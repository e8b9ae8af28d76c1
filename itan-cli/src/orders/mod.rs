//! Order register kept in `order_data.xlsx`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::table::{Cell, Table, io};

pub const COLUMNS: [&str; 7] = [
    "Order No",
    "Party Name",
    "Party Code",
    "Weight",
    "Size",
    "Rhodium",
    "Remark",
];

#[derive(Debug, Clone, Default)]
pub struct Order {
    pub order_no: String,
    pub party_name: String,
    pub party_code: String,
    pub weight: String,
    pub size: String,
    pub rhodium: String,
    pub remark: String,
}

impl Order {
    fn cells(&self) -> Vec<Cell> {
        [
            &self.order_no,
            &self.party_name,
            &self.party_code,
            &self.weight,
            &self.size,
            &self.rhodium,
            &self.remark,
        ]
        .into_iter()
        .map(|v| match v.trim() {
            "" => Cell::Empty,
            s => Cell::text(s),
        })
        .collect()
    }
}

pub struct OrderRegister {
    path: PathBuf,
}

impl OrderRegister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every recorded order; empty when nothing was recorded yet
    pub fn list(&self) -> Result<Table> {
        if !self.path.exists() {
            return Ok(Table::new(COLUMNS));
        }
        io::read_table(&self.path)
            .with_context(|| format!("Failed to read order register: {}", self.path.display()))
    }

    /// Append an order, rewriting the register; returns the new order count
    pub fn add(&self, order: &Order) -> Result<usize> {
        if order.order_no.trim().is_empty() {
            anyhow::bail!("Please enter an order number");
        }

        let mut new_row = Table::new(COLUMNS);
        new_row.push_row(order.cells());
        let table = self.list()?.concat(&new_row);

        io::write_table(&table, &self.path, "Orders")
            .with_context(|| format!("Failed to update order register: {}", self.path.display()))?;
        log::info!("Recorded order {} in {}", order.order_no.trim(), self.path.display());
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(no: &str) -> Order {
        Order {
            order_no: no.to_string(),
            party_name: "Shree Jewels".to_string(),
            party_code: "SJ01".to_string(),
            weight: "12.40".to_string(),
            size: "2.6".to_string(),
            rhodium: "Yes".to_string(),
            remark: String::new(),
        }
    }

    #[test]
    fn test_add_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let register = OrderRegister::new(dir.path().join("order_data.xlsx"));
        assert!(register.list().unwrap().is_empty());

        assert_eq!(register.add(&order("101")).unwrap(), 1);
        assert_eq!(register.add(&order("102")).unwrap(), 2);

        let table = register.list().unwrap();
        assert_eq!(table.columns, COLUMNS.to_vec());
        assert_eq!(table.get(1, "Order No").unwrap().to_string(), "102");
        // text is preserved, not coerced to a number
        assert_eq!(table.get(0, "Weight").unwrap().to_string(), "12.40");
        assert!(table.get(0, "Remark").unwrap().is_empty());
    }

    #[test]
    fn test_order_number_required() {
        let dir = tempfile::tempdir().unwrap();
        let register = OrderRegister::new(dir.path().join("order_data.xlsx"));
        assert!(register.add(&order("  ")).is_err());
        assert!(!register.path().exists());
    }
}
