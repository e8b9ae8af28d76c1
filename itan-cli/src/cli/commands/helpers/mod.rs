//! `itan helpers`: house-helper registry

pub mod handler;

use std::path::PathBuf;

use clap::Subcommand;

use crate::helpers::Gender;
use crate::output::OutputFormat;

pub use handler::handle_helpers_command;

#[derive(Subcommand)]
pub enum HelpersCommands {
    /// Register a new helper
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: u32,

        #[arg(long, value_enum)]
        gender: Gender,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long)]
        contact: String,

        /// Years of experience
        #[arg(long, default_value_t = 0)]
        experience: u32,

        /// Rate per hour
        #[arg(long, default_value_t = 0.0)]
        rate: f64,

        /// Photo to store with the record (jpg, jpeg or png)
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Helpers whose rate is at most the given maximum
    Search {
        #[arg(long, default_value_t = 0.0)]
        max_rate: f64,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Save the registry as CSV
    Export {
        #[arg(short, long, default_value = "house_helps.csv")]
        out: PathBuf,
    },
}
