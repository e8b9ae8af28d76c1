//! `itan codes`: PDF code extraction and the cumulative ledger

pub mod handler;

use std::path::PathBuf;

use clap::Subcommand;

use crate::output::OutputFormat;

pub use handler::handle_codes_command;

#[derive(Subcommand)]
pub enum CodesCommands {
    /// Extract codes from PDFs, merge with the weight sheet and append to the ledger
    Extract {
        /// Order PDFs; each file name is taken as the party name
        #[arg(required = true)]
        pdfs: Vec<PathBuf>,

        /// Weight workbook or CSV with Code, Category and Weight columns
        #[arg(short, long)]
        weights: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the ledger
    Show {
        /// Show only the most recent extraction
        #[arg(long)]
        recent: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Save the ledger (or the most recent extraction) as xlsx or CSV
    Download {
        #[arg(short, long)]
        out: PathBuf,

        #[arg(long)]
        recent: bool,
    },
    /// Delete the ledger
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
