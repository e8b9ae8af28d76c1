//! Export sale analysis over a date range

use chrono::NaiveDate;
use serde::Serialize;

use super::stats::{Describe, describe, pearson};
use super::{DatedTotal, totals_by_date};
use crate::schema::{Field, SchemaError, require};
use crate::table::{GroupTotal, SortOrder, Table, group_sum, sort_by_total};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
    pub top_parties: usize,
    pub bottom_parties: usize,
    pub top_designs: usize,
}

impl ExportOptions {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from,
            to,
            top_parties: 10,
            bottom_parties: 5,
            top_designs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UniqueCounts {
    pub parties: usize,
    pub types: usize,
    pub sizes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub rows_read: usize,
    pub rows_in_range: usize,
    /// Weight and quantity per day
    pub over_time: Vec<DatedTotal>,
    pub top_parties: Vec<GroupTotal>,
    pub bottom_parties: Vec<GroupTotal>,
    /// Weight and quantity per item type
    pub by_type: Vec<GroupTotal>,
    pub by_size: Vec<GroupTotal>,
    pub top_designs: Vec<GroupTotal>,
    pub weight_stats: Option<Describe>,
    pub quantity_stats: Option<Describe>,
    pub unique: UniqueCounts,
    /// Pearson correlation between weight and quantity
    pub weight_quantity_correlation: Option<f64>,
    /// Rows inside the date range, dates normalised
    #[serde(skip)]
    pub filtered: Table,
}

/// Run the export sale analysis
pub fn analyse(data: &Table, options: &ExportOptions) -> Result<ExportReport, SchemaError> {
    let [date, party, weight, qty, item_type, size, design] = require(
        data,
        [
            Field::Date,
            Field::Party,
            Field::Weight,
            Field::Quantity,
            Field::ItemType,
            Field::Size,
            Field::DesignNo,
        ],
        "Export sales sheet",
    )?;

    let mut normalised = data.clone();
    normalised.map_column(date, |c| c.to_date_cell());

    let bounded = options.from.is_some() || options.to.is_some();
    let filtered = normalised.filter(|row| {
        let Some(dt) = row[date].as_date() else {
            return !bounded;
        };
        let day = dt.date();
        options.from.is_none_or(|from| day >= from) && options.to.is_none_or(|to| day <= to)
    });

    let parties = group_sum(&filtered, party, &[weight]);
    let top_parties = sort_by_total(&parties, SortOrder::Descending)
        .into_iter()
        .take(options.top_parties)
        .collect();
    let bottom_parties = sort_by_total(&parties, SortOrder::Ascending)
        .into_iter()
        .take(options.bottom_parties)
        .collect();

    let designs = group_sum(&filtered, design, &[weight]);
    let top_designs = sort_by_total(&designs, SortOrder::Descending)
        .into_iter()
        .take(options.top_designs)
        .collect();

    let weights: Vec<f64> = filtered.values(weight).filter_map(|c| c.as_f64()).collect();
    let quantities: Vec<f64> = filtered.values(qty).filter_map(|c| c.as_f64()).collect();
    let pairs: Vec<(f64, f64)> = filtered
        .rows
        .iter()
        .filter_map(|r| Some((r[weight].as_f64()?, r[qty].as_f64()?)))
        .collect();

    Ok(ExportReport {
        rows_read: data.len(),
        rows_in_range: filtered.len(),
        over_time: totals_by_date(&filtered, date, &[weight, qty]),
        top_parties,
        bottom_parties,
        by_type: group_sum(&filtered, item_type, &[weight, qty]),
        by_size: group_sum(&filtered, size, &[weight]),
        top_designs,
        weight_stats: describe(&weights),
        quantity_stats: describe(&quantities),
        unique: UniqueCounts {
            parties: filtered.unique(party).len(),
            types: filtered.unique(item_type).len(),
            sizes: filtered.unique(size).len(),
        },
        weight_quantity_correlation: pearson(&pairs),
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn orders() -> Table {
        let mut t = Table::new(["DATE", "PARTY", "WEIGHT", "QTY", "TYPE", "SIZE", "DESIGN NO"]);
        let rows: &[(&str, &str, f64, f64, &str, &str, &str)] = &[
            ("2024-01-15", "Dubai Gold", 120.0, 12.0, "BANGLE", "2.4", "BG101"),
            ("2024-02-10", "Dubai Gold", 80.0, 8.0, "RING", "12", "RG7"),
            ("2024-02-11", "London Bullion", 60.0, 5.0, "BANGLE", "2.6", "BG101"),
            ("2024-03-01", "Singapore Fine", 30.0, 2.0, "RING", "14", "RG9"),
            ("not a date", "Ghost Party", 999.0, 99.0, "RING", "14", "RG9"),
        ];
        for (date, party, wt, qty, kind, size, design) in rows {
            t.push_row(vec![
                (*date).into(),
                (*party).into(),
                Cell::Number(*wt),
                Cell::Number(*qty),
                (*kind).into(),
                (*size).into(),
                (*design).into(),
            ]);
        }
        t
    }

    #[test]
    fn test_inclusive_date_range_drops_undated_rows() {
        let from = NaiveDate::from_ymd_opt(2024, 2, 10);
        let to = NaiveDate::from_ymd_opt(2024, 3, 1);
        let report = analyse(&orders(), &ExportOptions::new(from, to)).unwrap();
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_in_range, 3);
        assert_eq!(report.unique.parties, 3);
    }

    #[test]
    fn test_unbounded_range_keeps_everything() {
        let report = analyse(&orders(), &ExportOptions::new(None, None)).unwrap();
        assert_eq!(report.rows_in_range, 5);
        // the undated row has no day to be grouped under
        assert_eq!(report.over_time.len(), 4);
    }

    #[test]
    fn test_party_type_and_design_summaries() {
        let to = NaiveDate::from_ymd_opt(2024, 12, 31);
        let report = analyse(&orders(), &ExportOptions::new(None, to)).unwrap();
        assert_eq!(report.top_parties[0].key, "Dubai Gold");
        assert_eq!(report.top_parties[0].primary(), 200.0);
        assert_eq!(report.bottom_parties[0].key, "Singapore Fine");

        let bangle = report.by_type.iter().find(|g| g.key == "BANGLE").unwrap();
        assert_eq!(bangle.totals, vec![180.0, 17.0]);
        assert_eq!(report.top_designs[0].key, "BG101");
        assert_eq!(report.by_size.len(), 4);
    }

    #[test]
    fn test_statistics_and_correlation() {
        let to = NaiveDate::from_ymd_opt(2024, 12, 31);
        let report = analyse(&orders(), &ExportOptions::new(None, to)).unwrap();
        let w = report.weight_stats.unwrap();
        assert_eq!(w.count, 4);
        assert_eq!(w.max, 120.0);
        assert!(report.weight_quantity_correlation.unwrap() > 0.9);
    }

    #[test]
    fn test_dates_are_normalised_in_filtered_rows() {
        let report = analyse(&orders(), &ExportOptions::new(None, None)).unwrap();
        assert!(matches!(report.filtered.rows[0][0], Cell::Date(_)));
        assert_eq!(report.filtered.rows[4][0], Cell::Empty);
    }
}
