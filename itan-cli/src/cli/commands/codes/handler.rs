//! Codes command handler

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use super::CodesCommands;
use crate::config::Config;
use crate::extraction::{Ledger, MergeOutcome, extract_and_merge, extraction_table};
use crate::output::{self, OutputFormat};
use crate::table::io;

pub async fn handle_codes_command(args: CodesCommands, config: &Config) -> Result<()> {
    let ledger = Ledger::new(config.storage.ledger_path(), config.storage.recent_path());

    match args {
        CodesCommands::Extract { pdfs, weights, format } => {
            for pdf in &pdfs {
                if !pdf.exists() {
                    anyhow::bail!("PDF file does not exist: {}", pdf.display());
                }
            }
            if !weights.exists() {
                anyhow::bail!("Weight file does not exist: {}", weights.display());
            }

            // PDF parsing is CPU-bound
            let run = tokio::task::spawn_blocking(move || extract_and_merge(&pdfs, &weights))
                .await
                .context("Extraction task failed")??;

            for pdf in run.files_without_codes() {
                output::warning(&format!("No codes found in {}", pdf.display()));
            }

            let Some(outcome) = run.outcome else {
                output::print_rows(
                    &extraction_table(&[]),
                    format,
                    "No codes were found in any PDF; the ledger was not changed",
                )?;
                return Ok(());
            };

            if let MergeOutcome::Unmerged { reason, .. } = &outcome {
                output::warning(&format!("{}; saving codes without weights", reason));
            }
            let table = outcome.into_table();
            let total = ledger.append(&table)?;

            output::print_table(&table, format)?;
            if format == OutputFormat::Table {
                println!();
                output::success(&format!(
                    "Added {} codes; ledger {} now holds {} rows",
                    table.len(),
                    ledger.path().display().to_string().cyan(),
                    total
                ));
            }
        }
        CodesCommands::Show { recent, format } => {
            let (table, what) = if recent {
                (ledger.load_recent()?, "recent extraction")
            } else {
                (ledger.load()?, "ledger")
            };
            let table = table.unwrap_or_else(|| extraction_table(&[]));
            output::print_rows(&table, format, &format!("No {} found", what))?;
        }
        CodesCommands::Download { out, recent } => {
            let table = if recent { ledger.load_recent()? } else { ledger.load()? };
            let Some(table) = table else {
                anyhow::bail!("Nothing to download: no codes have been extracted yet");
            };
            io::write_table(&table, &out, "Extracted")?;
            output::success(&format!(
                "Saved {} rows to {}",
                table.len(),
                out.display().to_string().cyan()
            ));
        }
        CodesCommands::Clear { yes } => {
            if !ledger.exists() {
                output::warning("No ledger to clear");
                return Ok(());
            }
            if !yes {
                if !std::io::stdin().is_terminal() {
                    anyhow::bail!("Refusing to clear the ledger without --yes in a non-interactive session");
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {}?", ledger.path().display()))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            ledger.clear()?;
            output::success("Ledger cleared");
        }
    }

    Ok(())
}
