//! Label command handler

use anyhow::{Context, Result};
use colored::*;

use super::LabelArgs;
use crate::config::Config;
use crate::labels::{LabelData, ORDER_NO, PARTY_CODE, barcode, find_product, render_svg};
use crate::output;
use crate::table::io;

/// Barcode PNG height in pixels
const BARCODE_PNG_HEIGHT: u32 = 80;

pub async fn handle_label_command(args: LabelArgs, _config: &Config) -> Result<()> {
    if !args.workbook.exists() {
        anyhow::bail!("Workbook does not exist: {}", args.workbook.display());
    }

    let sheets = io::read_all_sheets(&args.workbook, true)?;
    let Some((sheet, fields)) = find_product(&sheets, &args.code) else {
        anyhow::bail!("Product code '{}' not found in any sheet", args.code.trim());
    };
    log::info!("Found {} in sheet '{}'", args.code.trim(), sheet);

    let mut label = LabelData::from_fields(fields);
    label.set(ORDER_NO, args.order_no.trim());
    label.set(PARTY_CODE, args.party_code.trim());
    label.apply_edits(&args.edits)?;

    let svg = render_svg(&label)?;
    std::fs::write(&args.out, svg).with_context(|| format!("Failed to write label: {}", args.out.display()))?;
    output::success(&format!("Label saved to {}", args.out.display().to_string().cyan()));

    if let Some(png_path) = &args.barcode_png {
        let png = barcode::png(label.mach_code()?, BARCODE_PNG_HEIGHT)?;
        std::fs::write(png_path, png)
            .with_context(|| format!("Failed to write barcode: {}", png_path.display()))?;
        output::success(&format!("Barcode saved to {}", png_path.display().to_string().cyan()));
    }

    Ok(())
}
