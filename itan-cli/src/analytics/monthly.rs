//! Monthly sale analysis: party and category rankings by weight

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use super::{DatedTotal, RankedGroup, ranked, totals_by_date};
use crate::schema::{Field, SchemaError, require};
use crate::table::{GroupTotal, RankMethod, SortOrder, Table, group_sum, sort_by_total};

/// Categories that are process material rather than sold goods
pub const EXCLUDED_CATEGORIES: &[&str] = &[
    "ST",
    "LOOSE PCS",
    "PARA BIDS",
    "Langadi",
    "PROCESS LOSS",
    "SCRAP PCC",
    "BALL CHAIN",
    "SIGNING TAR",
    "Fine",
];

#[derive(Debug, Clone)]
pub struct MonthlyOptions {
    pub rank_method: RankMethod,
    pub top: usize,
    pub bottom: usize,
    /// Categories shown in the weight-share breakdown
    pub share_top: usize,
}

impl Default for MonthlyOptions {
    fn default() -> Self {
        Self {
            rank_method: RankMethod::Min,
            top: 10,
            bottom: 5,
            share_top: 15,
        }
    }
}

/// One slice of the category weight share
#[derive(Debug, Clone, Serialize)]
pub struct ShareSlice {
    pub category: String,
    pub weight: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub rows_read: usize,
    pub rows_analysed: usize,
    pub categories_before: Vec<String>,
    pub categories_after: Vec<String>,
    /// Every party, heaviest first
    pub party_ranking: Vec<RankedGroup>,
    pub top_parties: Vec<RankedGroup>,
    /// Lightest parties, lightest first
    pub bottom_parties: Vec<RankedGroup>,
    /// Weight and pieces per category, by category name
    pub category_summary: Vec<GroupTotal>,
    pub top_categories: Vec<GroupTotal>,
    pub bottom_categories: Vec<GroupTotal>,
    pub category_share: Vec<ShareSlice>,
    /// Ranking by category code, when the sheet has a `CatCd` column
    pub category_code_ranking: Option<Vec<RankedGroup>>,
    pub weight_over_time: Vec<DatedTotal>,
}

impl MonthlyReport {
    /// Look a party up: exact, then ignoring case, then best fuzzy match
    pub fn find_party(&self, query: &str) -> Option<&RankedGroup> {
        let query = query.trim();
        if let Some(hit) = self.party_ranking.iter().find(|p| p.key == query) {
            return Some(hit);
        }
        if let Some(hit) = self
            .party_ranking
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(query))
        {
            return Some(hit);
        }

        let matcher = SkimMatcherV2::default();
        self.party_ranking
            .iter()
            .filter_map(|p| matcher.fuzzy_match(&p.key, query).map(|score| (score, p)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, p)| p)
    }
}

/// Run the monthly sale analysis over a sales register
pub fn analyse(data: &Table, options: &MonthlyOptions) -> Result<MonthlyReport, SchemaError> {
    let [date, _item_type, party, category, weight, pieces] = require(
        data,
        [
            Field::Date,
            Field::ItemType,
            Field::Party,
            Field::Category,
            Field::Weight,
            Field::Quantity,
        ],
        "Monthly sales sheet",
    )?;

    let categories_before = data.unique(category);
    let df = data.filter(|row| {
        let cat = row[category].key().unwrap_or_default();
        !EXCLUDED_CATEGORIES.contains(&cat.as_str())
    });
    let categories_after = df.unique(category);

    let parties = group_sum(&df, party, &[weight]);
    let party_ranking = ranked(&parties, options.rank_method);
    let top_parties = party_ranking.iter().take(options.top).cloned().collect();
    let mut bottom_parties: Vec<RankedGroup> = party_ranking.clone();
    bottom_parties.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    bottom_parties.truncate(options.bottom);

    let category_summary = group_sum(&df, category, &[weight, pieces]);
    let top_categories = sort_by_total(&category_summary, SortOrder::Descending)
        .into_iter()
        .take(options.top)
        .collect();
    let bottom_categories = sort_by_total(&category_summary, SortOrder::Ascending)
        .into_iter()
        .take(options.bottom)
        .collect();
    let category_share = share(&category_summary, options.share_top);

    let category_code_ranking = Field::CategoryCode
        .resolve(&df)
        .map(|code| ranked(&group_sum(&df, code, &[weight]), options.rank_method));

    let weight_over_time = totals_by_date(&df, date, &[weight]);

    Ok(MonthlyReport {
        rows_read: data.len(),
        rows_analysed: df.len(),
        categories_before,
        categories_after,
        party_ranking,
        top_parties,
        bottom_parties,
        category_summary,
        top_categories,
        bottom_categories,
        category_share,
        category_code_ranking,
        weight_over_time,
    })
}

/// Weight share of the heaviest `n` categories, as percentages of those `n`
fn share(groups: &[GroupTotal], n: usize) -> Vec<ShareSlice> {
    let top: Vec<GroupTotal> = sort_by_total(groups, SortOrder::Descending)
        .into_iter()
        .take(n)
        .collect();
    let total: f64 = top.iter().map(GroupTotal::primary).sum();
    top.into_iter()
        .map(|g| ShareSlice {
            percent: if total == 0.0 { 0.0 } else { g.primary() / total * 100.0 },
            weight: g.primary(),
            category: g.key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn register() -> Table {
        let mut t = Table::new(["DocDate", "type", "parName", "CATEGORY", "CatCd", "weight", "noPcs"]);
        let rows: &[(&str, &str, &str, &str, f64, f64)] = &[
            ("2024-04-01", "Shree Jewels", "RING", "R1", 40.0, 4.0),
            ("2024-04-01", "Kiran Gold", "BANGLE", "B1", 25.0, 2.0),
            ("2024-04-02", "Shree Jewels", "BANGLE", "B1", 10.0, 1.0),
            ("2024-04-02", "Mehta & Sons", "SCRAP PCC", "S1", 500.0, 9.0),
            ("2024-04-03", "Anand", "CHAIN", "C1", 25.0, 3.0),
            ("2024-04-03", "Patel", "RING", "R1", 5.0, 1.0),
        ];
        for (date, party, cat, code, wt, pcs) in rows {
            t.push_row(vec![
                (*date).into(),
                "Sale".into(),
                (*party).into(),
                (*cat).into(),
                (*code).into(),
                Cell::Number(*wt),
                Cell::Number(*pcs),
            ]);
        }
        t
    }

    #[test]
    fn test_excluded_categories_are_dropped() {
        let report = analyse(&register(), &MonthlyOptions::default()).unwrap();
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.rows_analysed, 5);
        assert!(report.categories_before.contains(&"SCRAP PCC".to_string()));
        assert!(!report.categories_after.contains(&"SCRAP PCC".to_string()));
        assert!(report.party_ranking.iter().all(|p| p.key != "Mehta & Sons"));
    }

    #[test]
    fn test_party_ranking_and_ties() {
        let report = analyse(&register(), &MonthlyOptions::default()).unwrap();
        let keys: Vec<(&str, usize)> = report
            .party_ranking
            .iter()
            .map(|p| (p.key.as_str(), p.rank))
            .collect();
        assert_eq!(keys, vec![("Shree Jewels", 1), ("Anand", 2), ("Kiran Gold", 2), ("Patel", 4)]);

        let dense = MonthlyOptions {
            rank_method: RankMethod::Dense,
            ..MonthlyOptions::default()
        };
        let report = analyse(&register(), &dense).unwrap();
        assert_eq!(report.party_ranking[3].rank, 3);
    }

    #[test]
    fn test_bottom_parties_lightest_first() {
        let options = MonthlyOptions {
            bottom: 2,
            ..MonthlyOptions::default()
        };
        let report = analyse(&register(), &options).unwrap();
        assert_eq!(report.bottom_parties.len(), 2);
        assert_eq!(report.bottom_parties[0].key, "Patel");
    }

    #[test]
    fn test_category_summary_and_share() {
        let report = analyse(&register(), &MonthlyOptions::default()).unwrap();
        let bangle = report.category_summary.iter().find(|g| g.key == "BANGLE").unwrap();
        assert_eq!(bangle.totals, vec![35.0, 3.0]);
        assert_eq!(report.top_categories[0].key, "RING");
        let total: f64 = report.category_share.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(report.category_code_ranking.is_some());
    }

    #[test]
    fn test_weight_over_time_by_day() {
        let report = analyse(&register(), &MonthlyOptions::default()).unwrap();
        let totals: Vec<f64> = report.weight_over_time.iter().map(|d| d.totals[0]).collect();
        assert_eq!(totals, vec![65.0, 10.0, 30.0]);
    }

    #[test]
    fn test_find_party_exact_case_and_fuzzy() {
        let report = analyse(&register(), &MonthlyOptions::default()).unwrap();
        assert_eq!(report.find_party("Patel").unwrap().key, "Patel");
        assert_eq!(report.find_party("kiran gold").unwrap().key, "Kiran Gold");
        assert_eq!(report.find_party("shree").unwrap().key, "Shree Jewels");
        assert!(report.find_party("zzzz").is_none());
    }

    #[test]
    fn test_missing_columns() {
        let t = Table::new(["DocDate", "parName"]);
        let err = analyse(&t, &MonthlyOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Monthly sales sheet"));
    }
}
