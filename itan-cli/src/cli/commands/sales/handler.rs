//! Sales command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use super::SalesCommands;
use crate::analytics::export_sale::{self, ExportOptions, ExportReport};
use crate::analytics::monthly::{self, MonthlyOptions, MonthlyReport};
use crate::analytics::stats::Describe;
use crate::analytics::{DatedTotal, RankedGroup};
use crate::config::Config;
use crate::output::{self, OutputFormat, Section, groups_table};
use crate::table::{Cell, Table, io};

pub async fn handle_sales_command(args: SalesCommands, _config: &Config) -> Result<()> {
    match args {
        SalesCommands::Monthly {
            file,
            rank,
            party,
            top,
            bottom,
            format,
        } => {
            let data = read_input(&file)?;
            let options = MonthlyOptions {
                rank_method: rank,
                top,
                bottom,
                ..MonthlyOptions::default()
            };
            let report = monthly::analyse(&data, &options)?;
            output::emit(format, &monthly_sections(&report), &report)?;

            if let Some(query) = party {
                match report.find_party(&query) {
                    Some(hit) => {
                        let line = format!(
                            "{} ranks {} with {} total weight",
                            hit.key.bold(),
                            hit.rank.to_string().green().bold(),
                            output::format_number(hit.weight)
                        );
                        // JSON and CSV documents own stdout
                        if format == OutputFormat::Table {
                            println!("{}", line);
                        } else {
                            eprintln!("{}", line);
                        }
                    }
                    None => output::warning(&format!("No party matching '{}'", query)),
                }
            }
        }
        SalesCommands::Export {
            file,
            from,
            to,
            csv,
            format,
        } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    anyhow::bail!("--from {} is after --to {}", from, to);
                }
            }

            let data = read_input(&file)?;
            let report = export_sale::analyse(&data, &ExportOptions::new(from, to))?;
            if report.rows_in_range == 0 {
                output::warning("No rows fall inside the selected date range");
            }
            output::emit(format, &export_sections(&report), &report)?;

            if let Some(out) = csv {
                io::write_table(&report.filtered, &out, "Filtered")?;
                output::success(&format!(
                    "Saved {} filtered rows to {}",
                    report.filtered.len(),
                    out.display().to_string().cyan()
                ));
            }
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<Table> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    io::read_table(path).with_context(|| format!("Failed to load sales data from {}", path.display()))
}

fn monthly_sections(report: &MonthlyReport) -> Vec<Section> {
    let mut sections = vec![
        Section::new(
            format!("Categories before filtering ({} rows)", report.rows_read),
            list_table("Category", &report.categories_before),
        ),
        Section::new(
            format!("Categories after filtering ({} rows)", report.rows_analysed),
            list_table("Category", &report.categories_after),
        ),
        Section::new("Party ranking", ranked_table("Party", &report.party_ranking)),
        Section::new("Top parties by weight", ranked_table("Party", &report.top_parties)).with_chart(2),
        Section::new("Bottom parties by weight", ranked_table("Party", &report.bottom_parties)).with_chart(2),
        Section::new(
            "Category summary",
            groups_table(&report.category_summary, "Category", &["Weight", "Pieces"]),
        ),
        Section::new(
            "Top categories by weight",
            groups_table(&report.top_categories, "Category", &["Weight", "Pieces"]),
        )
        .with_chart(1),
        Section::new(
            "Bottom categories by weight",
            groups_table(&report.bottom_categories, "Category", &["Weight", "Pieces"]),
        )
        .with_chart(1),
    ];

    let mut share = Table::new(["Category", "Weight", "Share %"]);
    for slice in &report.category_share {
        share.push_row(vec![
            Cell::text(slice.category.clone()),
            Cell::Number(output::round(slice.weight)),
            Cell::Number((slice.percent * 100.0).round() / 100.0),
        ]);
    }
    sections.push(Section::new("Category weight share", share).with_chart(2));

    if let Some(codes) = &report.category_code_ranking {
        sections.push(Section::new("Category code ranking", ranked_table("CatCd", codes)));
    }
    sections.push(Section::new("Weight over time", dated_table(&report.weight_over_time, &["Weight"])).with_chart(1));
    sections
}

fn export_sections(report: &ExportReport) -> Vec<Section> {
    let mut summary = Table::new(["Metric", "Value"]);
    let mut metric = |name: &str, value: Cell| summary.push_row(vec![Cell::text(name), value]);
    metric("Rows read", Cell::Number(report.rows_read as f64));
    metric("Rows in range", Cell::Number(report.rows_in_range as f64));
    metric("Unique parties", Cell::Number(report.unique.parties as f64));
    metric("Unique types", Cell::Number(report.unique.types as f64));
    metric("Unique sizes", Cell::Number(report.unique.sizes as f64));
    metric(
        "Weight/quantity correlation",
        report
            .weight_quantity_correlation
            .map(|r| Cell::Number(output::round(r)))
            .unwrap_or_default(),
    );

    vec![
        Section::new("Summary", summary),
        Section::new("Weight and quantity over time", dated_table(&report.over_time, &["Weight", "Qty"])).with_chart(1),
        Section::new("Top parties by weight", groups_table(&report.top_parties, "Party", &["Weight"])).with_chart(1),
        Section::new("Bottom parties by weight", groups_table(&report.bottom_parties, "Party", &["Weight"])).with_chart(1),
        Section::new("Weight and quantity by type", groups_table(&report.by_type, "Type", &["Weight", "Qty"])).with_chart(1),
        Section::new("Weight by size", groups_table(&report.by_size, "Size", &["Weight"])).with_chart(1),
        Section::new("Top designs by weight", groups_table(&report.top_designs, "Design No", &["Weight"])).with_chart(1),
        Section::new(
            "Statistics",
            describe_table(&[("Weight", &report.weight_stats), ("Qty", &report.quantity_stats)]),
        ),
    ]
}

fn ranked_table(key: &str, groups: &[RankedGroup]) -> Table {
    let mut table = Table::new(["Rank", key, "Weight"]);
    for g in groups {
        table.push_row(vec![
            Cell::Number(g.rank as f64),
            Cell::text(g.key.clone()),
            Cell::Number(output::round(g.weight)),
        ]);
    }
    // chart labels come from the first column
    table.select(&[key, "Rank", "Weight"])
}

fn dated_table(days: &[DatedTotal], values: &[&str]) -> Table {
    let mut table = Table::new(std::iter::once("Date").chain(values.iter().copied()));
    for day in days {
        let mut row = vec![Cell::text(day.date.format("%Y-%m-%d").to_string())];
        row.extend(day.totals.iter().map(|v| Cell::Number(output::round(*v))));
        table.push_row(row);
    }
    table
}

fn list_table(header: &str, values: &[String]) -> Table {
    let mut table = Table::new([header]);
    for v in values {
        table.push_row(vec![Cell::text(v.clone())]);
    }
    table
}

fn describe_table(columns: &[(&str, &Option<Describe>)]) -> Table {
    let mut table = Table::new(std::iter::once("Statistic").chain(columns.iter().map(|(name, _)| *name)));
    for name in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
        let mut row = vec![Cell::text(name)];
        row.extend(columns.iter().map(|(_, d)| {
            d.as_ref()
                .and_then(|d| statistic(d, name))
                .map(|v| Cell::Number(output::round(v)))
                .unwrap_or_default()
        }));
        table.push_row(row);
    }
    table
}

fn statistic(d: &Describe, name: &str) -> Option<f64> {
    match name {
        "count" => Some(d.count as f64),
        "mean" => Some(d.mean),
        "std" => d.std,
        "min" => Some(d.min),
        "25%" => Some(d.q25),
        "50%" => Some(d.median),
        "75%" => Some(d.q75),
        "max" => Some(d.max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::stats::describe;

    #[test]
    fn test_ranked_table_puts_key_first_for_charts() {
        let groups = vec![RankedGroup {
            rank: 1,
            key: "Shree".to_string(),
            weight: 12.3456,
        }];
        let t = ranked_table("Party", &groups);
        assert_eq!(t.columns, vec!["Party", "Rank", "Weight"]);
        assert_eq!(t.rows[0][2], Cell::Number(12.346));
    }

    #[test]
    fn test_describe_table_layout() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
        let t = describe_table(&[("Weight", &stats), ("Qty", &None)]);
        assert_eq!(t.len(), 8);
        assert_eq!(t.rows[0][1], Cell::Number(4.0));
        assert_eq!(t.rows[5][1], Cell::Number(2.5));
        assert_eq!(t.rows[0][2], Cell::Empty);
    }
}
