//! `itan sales`: monthly and export sale analysis

pub mod handler;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::cli::parse_date;
use crate::output::OutputFormat;
use crate::table::RankMethod;

pub use handler::handle_sales_command;

#[derive(Subcommand)]
pub enum SalesCommands {
    /// Party and category rankings from a monthly sales register
    Monthly {
        /// Sales register (.xlsx, .xls, .ods or .csv)
        file: PathBuf,

        /// How tied weights share a rank
        #[arg(long, value_enum, default_value_t = RankMethod::Min)]
        rank: RankMethod,

        /// Look up one party's rank and total weight
        #[arg(long)]
        party: Option<String>,

        #[arg(long, default_value_t = 10)]
        top: usize,

        #[arg(long, default_value_t = 5)]
        bottom: usize,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Export sale breakdowns over an optional date range
    Export {
        /// Export sales sheet (.xlsx, .xls, .ods or .csv)
        file: PathBuf,

        /// First day included (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Last day included (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Write the rows inside the range to this CSV file
        #[arg(long, value_name = "OUT")]
        csv: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}
