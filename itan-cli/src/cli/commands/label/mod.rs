//! `itan label`: product label with a Code128 barcode

pub mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_label_command;

#[derive(Args)]
pub struct LabelArgs {
    /// Workbook whose sheets list products by DESIGN NO
    pub workbook: PathBuf,

    /// Product code (DESIGN NO) to look up
    pub code: String,

    #[arg(long, default_value = crate::labels::DEFAULT_ORDER_NO)]
    pub order_no: String,

    #[arg(long, default_value = crate::labels::DEFAULT_PARTY_CODE)]
    pub party_code: String,

    /// Override or add a field, e.g. --set "WT=12.5" (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub edits: Vec<String>,

    /// Label output (SVG)
    #[arg(short, long, default_value = "label.svg")]
    pub out: PathBuf,

    /// Also write the bare barcode as PNG
    #[arg(long, value_name = "PATH")]
    pub barcode_png: Option<PathBuf>,
}
