//! `itan inventory`: salesperson and factory stock

pub mod handler;

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::inventory::{ExportScope, SearchScope};
use crate::output::OutputFormat;

pub use handler::handle_inventory_command;

#[derive(Args)]
pub struct InventoryArgs {
    /// Sales sheet URL or file (overrides the config)
    #[arg(long, global = true, value_name = "URL|PATH")]
    pub sales: Option<String>,

    /// Factory sheet URL or file (overrides the config)
    #[arg(long, global = true, value_name = "URL|PATH")]
    pub factory: Option<String>,

    #[command(subcommand)]
    pub command: InventoryCommands,
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Weight and piece totals with category and trend breakdowns
    Dashboard {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Items held longer than the aged-stock threshold
    Aged {
        /// Threshold in days (defaults to the config)
        #[arg(long)]
        days: Option<i64>,

        /// Also save the aged items (.xlsx or .csv)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Rows containing the query in any column
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = SearchScope::Both)]
        scope: SearchScope,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Save stock rows to a file
    Export {
        #[arg(long, value_enum, default_value_t = ExportScope::Overall)]
        scope: ExportScope,

        /// Output file (.xlsx or .csv)
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Linear weight forecast from the sales sheet
    Forecast {
        /// Days to predict, 1 to 366 (defaults to the config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=366))]
        days: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// E-mail the stock report
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Send the report now
    Send {
        /// Recipient (defaults to the configured recipient)
        #[arg(long)]
        to: Option<String>,
    },
    /// Send the report every week at the configured day and time until Ctrl-C
    Schedule {
        #[arg(long)]
        to: Option<String>,
    },
}
