//! `itan price`: gold vs silver price comparison

pub mod handler;

use clap::{Args, Subcommand};

use crate::output::OutputFormat;
use crate::pricing::Tier;

pub use handler::handle_price_command;

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct PriceArgs {
    #[command(subcommand)]
    pub command: Option<PriceCommands>,

    /// Jewelry category, e.g. "Bangle"
    #[arg(long)]
    pub category: Option<String>,

    /// Weight in grams
    #[arg(long)]
    pub weight: Option<f64>,

    /// Gold price per gram (defaults to the config)
    #[arg(long)]
    pub gold_price: Option<f64>,

    /// Silver price per gram (defaults to the config)
    #[arg(long)]
    pub silver_price: Option<f64>,

    /// Custom profit percentage (0-100); overrides --tier
    #[arg(long, conflicts_with = "tier")]
    pub profit: Option<f64>,

    #[arg(long, value_enum, default_value_t = Tier::Standard)]
    pub tier: Tier,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum PriceCommands {
    /// List categories with gold and silver making charges
    Categories {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}
