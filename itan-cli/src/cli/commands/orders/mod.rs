//! `itan orders`: order register

pub mod handler;

use clap::Subcommand;

use crate::output::OutputFormat;

pub use handler::handle_orders_command;

#[derive(Subcommand)]
pub enum OrdersCommands {
    /// Record an order
    Add {
        #[arg(long)]
        order_no: String,

        #[arg(long, default_value = "")]
        party_name: String,

        #[arg(long, default_value = "")]
        party_code: String,

        #[arg(long, default_value = "")]
        weight: String,

        #[arg(long, default_value = "")]
        size: String,

        #[arg(long, default_value = "")]
        rhodium: String,

        #[arg(long, default_value = "")]
        remark: String,
    },
    /// Show recorded orders
    List {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}
