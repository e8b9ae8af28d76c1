mod analytics;
mod cli;
mod config;
mod extraction;
mod helpers;
mod inventory;
mod labels;
mod orders;
mod output;
mod pricing;
mod report;
mod schema;
mod table;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::commands::{
    codes::handle_codes_command, helpers::handle_helpers_command, inventory::handle_inventory_command,
    label::handle_label_command, orders::handle_orders_command, price::handle_price_command,
    sales::handle_sales_command,
};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e.to_string().red());
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "Caused by:".yellow(), cause);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Codes(args) => handle_codes_command(args, &config).await,
        Commands::Sales(args) => handle_sales_command(args, &config).await,
        Commands::Inventory(args) => handle_inventory_command(args, &config).await,
        Commands::Helpers(args) => handle_helpers_command(args, &config).await,
        Commands::Label(args) => handle_label_command(args, &config).await,
        Commands::Orders(args) => handle_orders_command(args, &config).await,
        Commands::Price(args) => handle_price_command(args, &config).await,
    }
}
