//! Salesperson and factory stock: cleaning, aged stock, dashboard figures

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use super::category::extract_category;
use super::source::SheetSource;
use crate::analytics::forecast::{Forecast, MAX_FORECAST_DAYS, forecast};
use crate::analytics::{DatedTotal, totals_by_date};
use crate::schema::{Field, require};
use crate::table::{Cell, GroupTotal, Table, group_sum, io};

pub const CATEGORY_COLUMN: &str = "CATEGORY";
pub const AGE_COLUMN: &str = "AGE";
pub const SOURCE_COLUMN: &str = "STOCK";

/// Category of salesperson-held stock
pub const SALESPERSON_CATEGORY: &str = "SP";

/// Which sheets a search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchScope {
    Sales,
    Factory,
    Both,
}

/// Which rows an export contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportScope {
    /// The whole sales sheet
    Overall,
    /// Sales stock in the salesperson (`SP`) category
    Salesperson,
    Factory,
}

/// Normalise a raw stock sheet: parse dates (unparseable → empty), drop
/// delivered (`out`) rows and derive `CATEGORY` from the design number
pub fn prepare(mut raw: Table) -> Table {
    if let Some(date) = Field::Date.resolve(&raw) {
        raw.map_column(date, |c| c.to_date_cell());
    }

    let mut table = match Field::Delivered.resolve(&raw) {
        Some(delivered) => raw.filter(|row| !row[delivered].to_string().trim().eq_ignore_ascii_case("out")),
        None => raw,
    };

    match Field::DesignNo.resolve(&table) {
        Some(design) => {
            let categories = table
                .values(design)
                .map(|c| Cell::text(extract_category(&c.to_string())))
                .collect();
            table.set_column(CATEGORY_COLUMN, categories);
        }
        None => log::warn!("Stock sheet has no design number column; categories not derived"),
    }
    table
}

/// Both stock sheets after preparation
#[derive(Debug, Clone)]
pub struct Inventory {
    pub sales: Table,
    pub factory: Table,
}

impl Inventory {
    /// Fetch both sheets concurrently and prepare them
    pub async fn load(sales: &dyn SheetSource, factory: &dyn SheetSource) -> Result<Self> {
        let (sales_raw, factory_raw) = tokio::try_join!(sales.fetch(), factory.fetch())?;
        log::info!(
            "Loaded {} sales rows from {} and {} factory rows from {}",
            sales_raw.len(),
            sales.describe(),
            factory_raw.len(),
            factory.describe()
        );
        Ok(Self {
            sales: prepare(sales_raw),
            factory: prepare(factory_raw),
        })
    }

    /// Sales rows followed by factory rows, tagged with their sheet
    pub fn combined(&self) -> Table {
        let tag = |table: &Table, name: &str| {
            let mut t = table.clone();
            t.set_column(SOURCE_COLUMN, vec![Cell::text(name); t.len()]);
            t
        };
        tag(&self.sales, "Sales").concat(&tag(&self.factory, "Factory"))
    }

    /// Items in stock for more than `threshold_days` whole days as of `now`,
    /// with an `AGE` column. Undated items are never aged.
    pub fn aged(&self, now: NaiveDateTime, threshold_days: i64) -> Table {
        let mut combined = self.combined();
        let Some(date) = Field::Date.resolve(&combined) else {
            log::warn!("Stock sheets have no date column; nothing can be aged");
            return combined.head(0);
        };

        let ages: Vec<Cell> = combined
            .values(date)
            .map(|c| match c.as_date() {
                Some(dt) => Cell::Number((now - dt).num_days() as f64),
                None => Cell::Empty,
            })
            .collect();
        combined.set_column(AGE_COLUMN, ages);

        let age = combined.column(AGE_COLUMN).unwrap_or_default();
        combined.filter(|row| row[age].as_f64().is_some_and(|a| a > threshold_days as f64))
    }

    /// Rows containing `query` in any column
    pub fn search(&self, query: &str, scope: SearchScope) -> Table {
        match scope {
            SearchScope::Sales => self.sales.search(query),
            SearchScope::Factory => self.factory.search(query),
            SearchScope::Both => self.combined().search(query),
        }
    }

    /// Rows for an export
    pub fn export(&self, scope: ExportScope) -> Table {
        match scope {
            ExportScope::Overall => self.sales.clone(),
            ExportScope::Salesperson => match self.sales.column(CATEGORY_COLUMN) {
                Some(cat) => self
                    .sales
                    .filter(|row| row[cat].to_string() == SALESPERSON_CATEGORY),
                None => self.sales.head(0),
            },
            ExportScope::Factory => self.factory.clone(),
        }
    }

    /// Weight forecast from the sales sheet
    pub fn forecast(&self, horizon: u32) -> Result<Forecast> {
        if !(1..=MAX_FORECAST_DAYS).contains(&horizon) {
            anyhow::bail!("Forecast horizon must be between 1 and {} days, got {}", MAX_FORECAST_DAYS, horizon);
        }
        let [date, weight] = require(&self.sales, [Field::Date, Field::Weight], "Sales sheet")?;
        let observations: Vec<(NaiveDateTime, f64)> = self
            .sales
            .rows
            .iter()
            .filter_map(|r| Some((r[date].as_date()?, r[weight].as_f64()?)))
            .collect();
        if observations.len() < self.sales.len() {
            log::info!(
                "Forecast skips {} rows without a date or weight",
                self.sales.len() - observations.len()
            );
        }
        forecast(&observations, horizon)
            .ok_or_else(|| anyhow::anyhow!("Sales sheet has no dated rows with a weight to forecast from"))
    }

    /// Workbook with sales, factory and aged sheets, for mailing
    pub fn report_workbook(&self, now: NaiveDateTime, threshold_days: i64) -> Result<Vec<u8>> {
        let aged = self.aged(now, threshold_days);
        io::workbook_bytes(&[
            ("Sales", &self.sales),
            ("Factory", &self.factory),
            ("Aged Stock", &aged),
        ])
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        let [sales_weight] = require(&self.sales, [Field::Weight], "Sales sheet")?;
        let [factory_weight] = require(&self.factory, [Field::Weight], "Factory sheet")?;

        let sum = |t: &Table, col: usize| t.values(col).filter_map(Cell::as_f64).sum::<f64>();
        let sales_wt = sum(&self.sales, sales_weight);
        let factory_wt = sum(&self.factory, factory_weight);

        let sales_pcs_col = Field::Quantity.resolve(&self.sales);
        let factory_pcs_col = Field::Quantity.resolve(&self.factory);
        let sales_pieces = sales_pcs_col.map(|c| sum(&self.sales, c));
        let factory_pieces = factory_pcs_col.map(|c| sum(&self.factory, c));

        let sales_by_category = match self.sales.column(CATEGORY_COLUMN) {
            Some(cat) => group_sum(&self.sales, cat, &[sales_weight]),
            None => Vec::new(),
        };

        let pieces_by_category = match (
            sales_pcs_col,
            factory_pcs_col,
            self.sales.column(CATEGORY_COLUMN),
            self.factory.column(CATEGORY_COLUMN),
        ) {
            (Some(sp), Some(fp), Some(sc), Some(fc)) => {
                merge_pieces(&group_sum(&self.sales, sc, &[sp]), &group_sum(&self.factory, fc, &[fp]))
            }
            _ => Vec::new(),
        };

        let sales_trend = match Field::Date.resolve(&self.sales) {
            Some(date) => totals_by_date(&self.sales, date, &[sales_weight]),
            None => Vec::new(),
        };

        let combined = self.combined();
        let pieces_over_time = match (Field::Date.resolve(&combined), Field::Quantity.resolve(&combined)) {
            (Some(date), Some(pcs)) => totals_by_date(&combined, date, &[pcs]),
            _ => Vec::new(),
        };

        Ok(Dashboard {
            sales_weight: sales_wt,
            factory_weight: factory_wt,
            overall_weight: sales_wt + factory_wt,
            sales_pieces,
            factory_pieces,
            overall_pieces: sales_pieces.zip(factory_pieces).map(|(a, b)| a + b),
            sales_by_category,
            pieces_by_category,
            sales_trend,
            pieces_over_time,
        })
    }
}

/// Pieces per category on each side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPieces {
    pub category: String,
    pub sales: f64,
    pub factory: f64,
}

fn merge_pieces(sales: &[GroupTotal], factory: &[GroupTotal]) -> Vec<CategoryPieces> {
    let mut merged: std::collections::BTreeMap<String, CategoryPieces> = std::collections::BTreeMap::new();
    for g in sales {
        merged
            .entry(g.key.clone())
            .or_insert_with(|| CategoryPieces {
                category: g.key.clone(),
                sales: 0.0,
                factory: 0.0,
            })
            .sales += g.primary();
    }
    for g in factory {
        merged
            .entry(g.key.clone())
            .or_insert_with(|| CategoryPieces {
                category: g.key.clone(),
                sales: 0.0,
                factory: 0.0,
            })
            .factory += g.primary();
    }
    merged.into_values().collect()
}

/// Headline inventory figures
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub sales_weight: f64,
    pub factory_weight: f64,
    pub overall_weight: f64,
    pub sales_pieces: Option<f64>,
    pub factory_pieces: Option<f64>,
    pub overall_pieces: Option<f64>,
    pub sales_by_category: Vec<GroupTotal>,
    pub pieces_by_category: Vec<CategoryPieces>,
    pub sales_trend: Vec<DatedTotal>,
    pub pieces_over_time: Vec<DatedTotal>,
}
