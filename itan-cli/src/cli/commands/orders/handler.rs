//! Orders command handler

use anyhow::Result;
use colored::*;

use super::OrdersCommands;
use crate::config::Config;
use crate::orders::{Order, OrderRegister};
use crate::output;

pub async fn handle_orders_command(args: OrdersCommands, config: &Config) -> Result<()> {
    let register = OrderRegister::new(config.storage.orders_path());

    match args {
        OrdersCommands::Add {
            order_no,
            party_name,
            party_code,
            weight,
            size,
            rhodium,
            remark,
        } => {
            let order = Order {
                order_no,
                party_name,
                party_code,
                weight,
                size,
                rhodium,
                remark,
            };
            let count = register.add(&order)?;
            output::success(&format!(
                "Recorded order {} ({} orders in {})",
                order.order_no.trim().bold(),
                count,
                register.path().display().to_string().cyan()
            ));
        }
        OrdersCommands::List { format } => {
            let orders = register.list()?;
            output::print_rows(&orders, format, "No orders recorded yet")?;
        }
    }

    Ok(())
}
