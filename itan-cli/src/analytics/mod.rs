//! Sales analytics: monthly sale rankings, export sale breakdowns, forecasts

pub mod export_sale;
pub mod forecast;
pub mod monthly;
pub mod stats;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::table::{GroupTotal, RankMethod, Table, rank};

/// A group with its rank by weight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub rank: usize,
    pub key: String,
    pub weight: f64,
}

/// Rank groups by weight, heaviest first (ties keep key order)
pub fn ranked(groups: &[GroupTotal], method: RankMethod) -> Vec<RankedGroup> {
    let ranks = rank(groups, method);
    let mut out: Vec<RankedGroup> = groups
        .iter()
        .zip(ranks)
        .map(|(g, rank)| RankedGroup {
            rank,
            key: g.key.clone(),
            weight: g.primary(),
        })
        .collect();
    out.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    out
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedTotal {
    pub date: NaiveDate,
    pub totals: Vec<f64>,
}

/// Sum value columns per day of `date_col`; rows without a date are skipped
pub fn totals_by_date(table: &Table, date_col: usize, value_cols: &[usize]) -> Vec<DatedTotal> {
    let mut days: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let Some(dt) = row.get(date_col).and_then(|c| c.as_date()) else {
            continue;
        };
        let entry = days
            .entry(dt.date())
            .or_insert_with(|| vec![0.0; value_cols.len()]);
        for (slot, &col) in value_cols.iter().enumerate() {
            if let Some(v) = row.get(col).and_then(|c| c.as_f64()) {
                entry[slot] += v;
            }
        }
    }
    days.into_iter()
        .map(|(date, totals)| DatedTotal { date, totals })
        .collect()
}
