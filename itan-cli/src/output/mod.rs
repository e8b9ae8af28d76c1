//! Terminal rendering: aligned tables, text bar charts, JSON and CSV

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::table::{Cell, GroupTotal, Table, io};

/// Output format for reporting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns with text charts
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// CSV, one block per section
    Csv,
}

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';
/// Longest cell shown in a terminal table
const MAX_CELL_WIDTH: usize = 40;

/// One titled block of a report
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub table: Table,
    /// Column drawn as a bar chart below the table
    pub chart: Option<usize>,
}

impl Section {
    pub fn new(title: impl Into<String>, table: Table) -> Self {
        Self {
            title: title.into(),
            table,
            chart: None,
        }
    }

    pub fn with_chart(mut self, column: usize) -> Self {
        self.chart = Some(column);
        self
    }
}

/// Print report sections, or `json` for `--format json`
pub fn emit<T: Serialize>(format: OutputFormat, sections: &[Section], json: &T) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(json).context("Failed to format JSON output")?;
            println!("{}", text);
        }
        OutputFormat::Csv => {
            for (i, section) in sections.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("# {}", section.title);
                print!("{}", io::table_to_csv(&section.table)?);
            }
        }
        OutputFormat::Table => {
            for section in sections {
                println!("{}", section.title.bold().underline());
                if section.table.is_empty() {
                    println!("{}", "  (no rows)".dimmed());
                } else {
                    print!("{}", render_table(&section.table));
                    if let Some(col) = section.chart {
                        print!("{}", bar_chart(&chart_points(&section.table, col)));
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

/// Print a single table in the requested format
pub fn print_table(table: &Table, format: OutputFormat) -> Result<()> {
    print!("{}", render_rows(table, format)?);
    Ok(())
}

/// Print a result table; an empty one is reported on stderr and still
/// written out for JSON and CSV so pipelines get a parseable document.
pub fn print_rows(table: &Table, format: OutputFormat, empty_message: &str) -> Result<()> {
    if table.is_empty() {
        warning(empty_message);
    }
    if prints_rows(table, format) {
        print_table(table, format)?;
    }
    Ok(())
}

fn prints_rows(table: &Table, format: OutputFormat) -> bool {
    !table.is_empty() || format != OutputFormat::Table
}

/// A single table in the requested format
pub fn render_rows(table: &Table, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&table.to_json()).context("Failed to format JSON output")?;
            format!("{}\n", text)
        }
        OutputFormat::Csv => io::table_to_csv(table)?,
        OutputFormat::Table => render_table(table),
    })
}

/// Aligned table with coloured headers
pub fn render_table(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| clip(&display(c))).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|r| r.get(i))
                .map(|s| s.width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad(name, *w).bold().cyan().to_string())
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("  ").dimmed().to_string());
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Horizontal bars scaled to the largest value
pub fn bar_chart(points: &[(String, f64)]) -> String {
    let max = points.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let label_width = points.iter().map(|(l, _)| l.width()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in points {
        let len = if max > 0.0 {
            (value.abs() / max * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat_n(BAR_CHAR, len).collect();
        out.push_str(&format!(
            "{}  {} {}\n",
            pad(label, label_width),
            bar.green(),
            format_number(*value)
        ));
    }
    out
}

/// Label/value pairs from the first column and `value_col`
pub fn chart_points(table: &Table, value_col: usize) -> Vec<(String, f64)> {
    table
        .rows
        .iter()
        .filter_map(|r| Some((r.first()?.to_string(), r.get(value_col)?.as_f64()?)))
        .collect()
}

/// Group totals as a table with the given key and value headers
pub fn groups_table(groups: &[GroupTotal], key: &str, values: &[&str]) -> Table {
    let mut table = Table::new(std::iter::once(key).chain(values.iter().copied()));
    for g in groups {
        let mut row = vec![Cell::text(g.key.clone())];
        row.extend(g.totals.iter().map(|v| Cell::Number(round(*v))));
        table.push_row(row);
    }
    table
}

/// Round to three decimals for display
pub fn round(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn format_number(value: f64) -> String {
    Cell::Number(round(value)).to_string()
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

fn display(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

fn clip(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.width() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 1 >= MAX_CELL_WIDTH {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_table_aligns_wide_characters() {
        plain();
        let mut t = Table::new(["Party", "WT"]);
        t.push_row(vec!["Śrī".into(), Cell::Number(1.23456)]);
        t.push_row(vec!["Kiran Gold".into(), Cell::Number(20.0)]);
        let text = render_table(&t);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Party       WT");
        assert_eq!(lines[2], "Śrī         1.235");
        assert_eq!(lines[3], "Kiran Gold  20");
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        plain();
        let chart = bar_chart(&[("A".to_string(), 10.0), ("BB".to_string(), 5.0)]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0].matches(BAR_CHAR).count(), BAR_WIDTH);
        assert_eq!(lines[1].matches(BAR_CHAR).count(), BAR_WIDTH / 2);
        assert!(lines[1].starts_with("BB  "));
    }

    #[test]
    fn test_groups_table_rounds_totals() {
        let groups = vec![GroupTotal {
            key: "RING".to_string(),
            totals: vec![1.0 / 3.0, 2.0],
            count: 1,
        }];
        let t = groups_table(&groups, "Category", &["WT", "PCS"]);
        assert_eq!(t.columns, vec!["Category", "WT", "PCS"]);
        assert_eq!(t.rows[0][1], Cell::Number(0.333));
        assert_eq!(chart_points(&t, 2), vec![("RING".to_string(), 2.0)]);
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(100);
        let clipped = clip(&long);
        assert_eq!(clipped.width(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_empty_results_stay_machine_readable() {
        let empty = Table::new(["Code", "WT"]);
        assert_eq!(render_rows(&empty, OutputFormat::Json).unwrap(), "[]\n");
        assert_eq!(render_rows(&empty, OutputFormat::Csv).unwrap(), "Code,WT\n");
        assert!(prints_rows(&empty, OutputFormat::Json));
        assert!(prints_rows(&empty, OutputFormat::Csv));
        assert!(!prints_rows(&empty, OutputFormat::Table));
    }
}
