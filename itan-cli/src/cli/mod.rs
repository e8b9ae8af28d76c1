//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    codes::CodesCommands, helpers::HelpersCommands, inventory::InventoryArgs, label::LabelArgs,
    orders::OrdersCommands, price::PriceArgs, sales::SalesCommands,
};

#[derive(Parser)]
#[command(name = "itan")]
#[command(about = "Back-office reporting tools for the jewelry workshop")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract design codes from order PDFs and merge them with weights
    #[command(subcommand)]
    Codes(CodesCommands),
    /// Monthly and export sale analysis
    #[command(subcommand)]
    Sales(SalesCommands),
    /// Salesperson and factory stock tracker
    Inventory(InventoryArgs),
    /// House-helper registry
    #[command(subcommand)]
    Helpers(HelpersCommands),
    /// Product label with barcode
    Label(LabelArgs),
    /// Order register
    #[command(subcommand)]
    Orders(OrdersCommands),
    /// Gold vs silver price calculator
    Price(PriceArgs),
}

impl Cli {
    /// Log level for the `-v` count
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Parse a `YYYY-MM-DD` (or any accepted date format) argument
pub fn parse_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    crate::table::parse_datetime(raw)
        .map(|dt| dt.date())
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}
