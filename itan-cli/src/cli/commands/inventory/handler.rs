//! Inventory command handler

use anyhow::Result;
use chrono::Local;
use colored::*;

use super::{InventoryArgs, InventoryCommands, ReportCommands};
use crate::analytics::DatedTotal;
use crate::config::Config;
use crate::inventory::{Dashboard, load_inventory};
use crate::output::{self, OutputFormat, Section, groups_table};
use crate::report::{ReportMail, WeeklySchedule, run_weekly, send_report};
use crate::table::{Cell, Table, io};

const REPORT_FILE_NAME: &str = "stock_report.xlsx";

pub async fn handle_inventory_command(args: InventoryArgs, config: &Config) -> Result<()> {
    let sales = args.sales.as_deref();
    let factory = args.factory.as_deref();

    match args.command {
        InventoryCommands::Dashboard { format } => {
            let inventory = load_inventory(&config.inventory, sales, factory).await?;
            let dashboard = inventory.dashboard()?;
            output::emit(format, &dashboard_sections(&dashboard), &dashboard)?;
        }
        InventoryCommands::Aged { days, out, format } => {
            let threshold = days.unwrap_or(config.inventory.aged_after_days);
            if threshold < 0 {
                anyhow::bail!("--days cannot be negative");
            }
            let inventory = load_inventory(&config.inventory, sales, factory).await?;
            let aged = inventory.aged(Local::now().naive_local(), threshold);

            if format == OutputFormat::Table && !aged.is_empty() {
                println!(
                    "{} items in stock for more than {} days",
                    aged.len().to_string().yellow().bold(),
                    threshold
                );
            }
            output::print_rows(&aged, format, &format!("No items older than {} days", threshold))?;

            if let Some(out) = out {
                io::write_table(&aged, &out, "Aged Stock")?;
                output::success(&format!("Saved aged stock to {}", out.display().to_string().cyan()));
            }
        }
        InventoryCommands::Search { query, scope, format } => {
            let inventory = load_inventory(&config.inventory, sales, factory).await?;
            let found = inventory.search(&query, scope);
            output::print_rows(&found, format, &format!("No rows match '{}'", query))?;
        }
        InventoryCommands::Export { scope, out } => {
            let inventory = load_inventory(&config.inventory, sales, factory).await?;
            let rows = inventory.export(scope);
            io::write_table(&rows, &out, "Stock")?;
            output::success(&format!(
                "Saved {} rows to {}",
                rows.len(),
                out.display().to_string().cyan()
            ));
        }
        InventoryCommands::Forecast { days, format } => {
            let horizon = days.unwrap_or(config.inventory.forecast_days);
            let inventory = load_inventory(&config.inventory, sales, factory).await?;
            let forecast = inventory.forecast(horizon)?;

            let mut table = Table::new(["Date", "Day", "Predicted weight"]);
            for point in &forecast.points {
                let date = forecast.origin.date() + chrono::Duration::days(point.day);
                table.push_row(vec![
                    Cell::text(date.format("%Y-%m-%d").to_string()),
                    Cell::Number(point.day as f64),
                    Cell::Number(output::round(point.predicted_weight)),
                ]);
            }
            let title = format!(
                "{}-day forecast from {} observations (weight = {} + {} x day)",
                horizon,
                forecast.observations,
                output::format_number(forecast.fit.intercept),
                output::format_number(forecast.fit.slope)
            );
            output::emit(format, &[Section::new(title, table).with_chart(2)], &forecast)?;
        }
        InventoryCommands::Report(ReportCommands::Send { to }) => {
            let recipient = recipient(to, config)?;
            send_stock_report(config, &recipient, sales, factory).await?;
            output::success(&format!("Report sent to {}", recipient.cyan()));
        }
        InventoryCommands::Report(ReportCommands::Schedule { to }) => {
            let recipient = recipient(to, config)?;
            // Fail before waiting a week if the password is missing
            config.smtp_password()?;
            let schedule = WeeklySchedule::from_config(&config.schedule)?;
            println!(
                "Sending the stock report to {} {}. Press Ctrl-C to stop.",
                recipient.cyan(),
                schedule.to_string().bold()
            );

            let recipient = recipient.as_str();
            run_weekly(
                schedule,
                move || send_stock_report(config, recipient, sales, factory),
                async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                },
            )
            .await?;
        }
    }

    Ok(())
}

fn recipient(to: Option<String>, config: &Config) -> Result<String> {
    let recipient = to.unwrap_or_else(|| config.mail.recipient.clone());
    if recipient.trim().is_empty() {
        anyhow::bail!("No recipient: pass --to or set mail.recipient in the config");
    }
    Ok(recipient.trim().to_string())
}

async fn send_stock_report(config: &Config, recipient: &str, sales: Option<&str>, factory: Option<&str>) -> Result<()> {
    let password = config.smtp_password()?;
    let inventory = load_inventory(&config.inventory, sales, factory).await?;
    let workbook = inventory.report_workbook(Local::now().naive_local(), config.inventory.aged_after_days)?;
    let mail = ReportMail::stock_report(&config.mail.subject, workbook, REPORT_FILE_NAME.to_string());
    send_report(&config.mail, &password, recipient, &mail).await
}

fn dashboard_sections(d: &Dashboard) -> Vec<Section> {
    let mut totals = Table::new(["Stock", "Weight", "Pieces"]);
    for (name, weight, pieces) in [
        ("Sales", d.sales_weight, d.sales_pieces),
        ("Factory", d.factory_weight, d.factory_pieces),
        ("Overall", d.overall_weight, d.overall_pieces),
    ] {
        totals.push_row(vec![
            Cell::text(name),
            Cell::Number(output::round(weight)),
            pieces.map(Cell::Number).unwrap_or_default(),
        ]);
    }

    let mut pieces = Table::new(["Category", "Salesperson", "Factory"]);
    for p in &d.pieces_by_category {
        pieces.push_row(vec![
            Cell::text(p.category.clone()),
            Cell::Number(p.sales),
            Cell::Number(p.factory),
        ]);
    }

    vec![
        Section::new("Stock totals", totals),
        Section::new(
            "Sales weight by category",
            groups_table(&d.sales_by_category, "Category", &["Weight"]),
        )
        .with_chart(1),
        Section::new("Pieces by category", pieces),
        Section::new("Sales weight trend", dated("Weight", &d.sales_trend)).with_chart(1),
        Section::new("Pieces over time", dated("Pieces", &d.pieces_over_time)).with_chart(1),
    ]
}

fn dated(value: &str, days: &[DatedTotal]) -> Table {
    let mut table = Table::new(["Date", value]);
    for day in days {
        table.push_row(vec![
            Cell::text(day.date.format("%Y-%m-%d").to_string()),
            Cell::Number(output::round(day.totals.first().copied().unwrap_or(0.0))),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_falls_back_to_config() {
        let mut config = Config::default();
        assert!(recipient(None, &config).is_err());

        config.mail.recipient = "owner@example.com".to_string();
        assert_eq!(recipient(None, &config).unwrap(), "owner@example.com");
        assert_eq!(
            recipient(Some(" shop@example.com ".to_string()), &config).unwrap(),
            "shop@example.com"
        );
    }
}
