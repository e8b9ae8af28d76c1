//! Group-by totals, ordering and ranking

use std::collections::BTreeMap;

use serde::Serialize;

use super::Table;

/// Summed values for one group key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    /// One total per requested value column, in request order
    pub totals: Vec<f64>,
    /// Number of rows in the group
    pub count: usize,
}

impl GroupTotal {
    /// The first (primary) total, usually weight
    pub fn primary(&self) -> f64 {
        self.totals.first().copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// How ties share a rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RankMethod {
    /// Ties share the lowest rank; the next distinct total skips ahead (1, 1, 3)
    #[default]
    Min,
    /// Ties share a rank; the next distinct total follows on (1, 1, 2)
    Dense,
}

/// Sum `value_cols` per distinct `key_col` value.
///
/// Groups come back ordered by key. Rows with an empty key are dropped and
/// non-numeric values count as zero.
pub fn group_sum(table: &Table, key_col: usize, value_cols: &[usize]) -> Vec<GroupTotal> {
    let mut groups: BTreeMap<String, (Vec<f64>, usize)> = BTreeMap::new();

    for row in &table.rows {
        let Some(key) = row.get(key_col).and_then(|c| c.key()) else {
            continue;
        };
        let entry = groups
            .entry(key)
            .or_insert_with(|| (vec![0.0; value_cols.len()], 0));
        for (slot, &col) in value_cols.iter().enumerate() {
            if let Some(v) = row.get(col).and_then(|c| c.as_f64()) {
                entry.0[slot] += v;
            }
        }
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (totals, count))| GroupTotal { key, totals, count })
        .collect()
}

/// Stable sort of groups by their primary total
pub fn sort_by_total(groups: &[GroupTotal], order: SortOrder) -> Vec<GroupTotal> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| {
        let cmp = a.primary().total_cmp(&b.primary());
        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
    sorted
}

/// Rank each group by descending primary total (1 = heaviest).
/// The returned ranks are parallel to `groups`.
pub fn rank(groups: &[GroupTotal], method: RankMethod) -> Vec<usize> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| groups[b].primary().total_cmp(&groups[a].primary()));

    let mut ranks = vec![0; groups.len()];
    let mut dense = 0;
    let mut previous: Option<f64> = None;
    let mut current_min = 0;

    for (position, &idx) in order.iter().enumerate() {
        let total = groups[idx].primary();
        if previous != Some(total) {
            dense += 1;
            current_min = position + 1;
            previous = Some(total);
        }
        ranks[idx] = match method {
            RankMethod::Min => current_min,
            RankMethod::Dense => dense,
        };
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn sales() -> Table {
        let mut t = Table::new(["parName", "weight", "noPcs"]);
        t.push_row(vec!["B".into(), 10.0.into(), 2.0.into()]);
        t.push_row(vec!["A".into(), 5.0.into(), 1.0.into()]);
        t.push_row(vec!["B".into(), 2.5.into(), 1.0.into()]);
        t.push_row(vec![Cell::Empty, 99.0.into(), 1.0.into()]);
        t.push_row(vec!["C".into(), "bad".into(), 4.0.into()]);
        t
    }

    #[test]
    fn test_group_sum_orders_by_key_and_drops_empty_keys() {
        let groups = group_sum(&sales(), 0, &[1, 2]);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(groups[1].totals, vec![12.5, 3.0]);
        assert_eq!(groups[1].count, 2);
        assert_eq!(groups[2].totals, vec![0.0, 4.0]);
    }

    #[test]
    fn test_sort_by_total() {
        let groups = group_sum(&sales(), 0, &[1]);
        let desc = sort_by_total(&groups, SortOrder::Descending);
        assert_eq!(desc[0].key, "B");
        let asc = sort_by_total(&groups, SortOrder::Ascending);
        assert_eq!(asc[0].key, "C");
    }

    #[test]
    fn test_rank_methods_handle_ties() {
        let groups: Vec<GroupTotal> = [("a", 10.0), ("b", 7.0), ("c", 10.0), ("d", 3.0)]
            .iter()
            .map(|(k, w)| GroupTotal {
                key: k.to_string(),
                totals: vec![*w],
                count: 1,
            })
            .collect();
        assert_eq!(rank(&groups, RankMethod::Min), vec![1, 3, 1, 4]);
        assert_eq!(rank(&groups, RankMethod::Dense), vec![1, 2, 1, 3]);
    }
}
