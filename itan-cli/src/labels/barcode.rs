//! Code128 barcodes

use anyhow::Result;
use barcoders::generators::image::Image;
use barcoders::sym::code128::Code128;

/// Code set B prefix understood by the encoder
const CODE_SET_B: char = 'Ɓ';

/// Encode `data` as Code128 modules (1 = bar, 0 = space)
pub fn encode(data: &str) -> Result<Vec<u8>> {
    let data = data.trim();
    if data.is_empty() {
        anyhow::bail!("Cannot encode an empty barcode");
    }
    let barcode = Code128::new(format!("{}{}", CODE_SET_B, data))
        .map_err(|e| anyhow::anyhow!("Cannot encode '{}' as Code128: {}", data, e))?;
    Ok(barcode.encode())
}

/// Runs of consecutive bars as `(first module, width in modules)`
pub fn bar_runs(modules: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &m) in modules.iter().enumerate() {
        match (m == 1, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }
    runs
}

/// Render `data` as a PNG barcode of the given pixel height
pub fn png(data: &str, height: u32) -> Result<Vec<u8>> {
    let modules = encode(data)?;
    Image::png(height)
        .generate(&modules[..])
        .map_err(|e| anyhow::anyhow!("Failed to render barcode image: {}", e))
}
