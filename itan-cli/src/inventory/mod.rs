//! Stock inventory kept in two published spreadsheets

pub mod category;
pub mod source;
pub mod stock;

pub use source::source_for;
pub use stock::{Dashboard, ExportScope, Inventory, SearchScope};

use std::time::Duration;

use anyhow::Result;

use crate::config::InventoryConfig;

/// Load both sheets from the configured (or overridden) locations
pub async fn load_inventory(
    config: &InventoryConfig,
    sales_override: Option<&str>,
    factory_override: Option<&str>,
) -> Result<Inventory> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let sales = source_for(sales_override.unwrap_or(&config.sales_source), timeout)?;
    let factory = source_for(factory_override.unwrap_or(&config.factory_source), timeout)?;
    Inventory::load(sales.as_ref(), factory.as_ref()).await
}
