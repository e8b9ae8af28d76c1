//! Helpers command handler

use anyhow::Result;
use chrono::Local;
use colored::*;

use super::HelpersCommands;
use crate::config::Config;
use crate::helpers::{HelperRegistry, NewHelper, Registration};
use crate::output;

pub async fn handle_helpers_command(args: HelpersCommands, config: &Config) -> Result<()> {
    let registry = HelperRegistry::new(config.storage.helpers_path(), config.storage.uploads_path());

    match args {
        HelpersCommands::Register {
            name,
            age,
            gender,
            address,
            contact,
            experience,
            rate,
            photo,
        } => {
            if let Some(photo) = &photo {
                if !photo.exists() {
                    anyhow::bail!("Photo does not exist: {}", photo.display());
                }
            }
            let helper = NewHelper {
                name,
                age,
                gender,
                address,
                contact,
                experience,
                rate,
                photo,
            };
            match registry.register(&helper, Local::now().naive_local())? {
                Registration::Registered { photo_path } => {
                    output::success(&format!(
                        "Registered {} in {}",
                        helper.name.trim().bold(),
                        registry.path().display().to_string().cyan()
                    ));
                    println!("Photo: {}", photo_path.dimmed());
                }
                Registration::DuplicateContact => {
                    output::warning("A helper with this contact number already exists!");
                }
            }
        }
        HelpersCommands::Search { max_rate, format } => {
            if max_rate < 0.0 {
                anyhow::bail!("--max-rate cannot be negative");
            }
            let found = registry.search(max_rate)?;
            output::print_rows(&found, format, "No helpers found with the given criteria.")?;
        }
        HelpersCommands::Export { out } => {
            let count = registry.export(&out)?;
            output::success(&format!(
                "Saved {} helpers to {}",
                count,
                out.display().to_string().cyan()
            ));
        }
    }

    Ok(())
}
