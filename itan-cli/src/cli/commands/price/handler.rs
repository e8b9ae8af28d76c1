//! Price command handler

use anyhow::Result;
use colored::*;

use super::{PriceArgs, PriceCommands};
use crate::config::Config;
use crate::output::{self, OutputFormat, Section};
use crate::pricing::{self, Comparison, GOLD_MAKING_CHARGES, Margin};
use crate::table::{Cell, Table};

pub async fn handle_price_command(args: PriceArgs, config: &Config) -> Result<()> {
    if let Some(PriceCommands::Categories { format }) = args.command {
        let mut table = Table::new(["Category", "Gold making %", "Silver making %"]);
        for (category, gold) in GOLD_MAKING_CHARGES {
            table.push_row(vec![
                Cell::text(*category),
                Cell::Number(*gold),
                Cell::Number(pricing::silver_making_charge(category)),
            ]);
        }
        return output::print_table(&table, format);
    }

    let Some(category) = args.category else {
        anyhow::bail!("Provide --category and --weight, or use 'price categories'");
    };
    let Some(weight) = args.weight else {
        anyhow::bail!("Provide --weight in grams");
    };
    if !pricing::is_known_category(&category) {
        output::warning(&format!(
            "Unknown category '{}'; using default making charges",
            category
        ));
    }

    let margin = match args.profit {
        Some(p) => Margin::custom(p)?,
        None => Margin::Tier(args.tier),
    };
    let comparison = pricing::compare(
        &category,
        weight,
        args.gold_price.unwrap_or(config.pricing.gold_price),
        args.silver_price.unwrap_or(config.pricing.silver_price),
        margin,
    )?;

    if args.format == OutputFormat::Table {
        println!(
            "{} {} g, {}",
            comparison.category.bold(),
            output::format_number(comparison.weight),
            comparison.margin
        );
    }
    output::emit(args.format, &[Section::new("Price comparison", comparison_table(&comparison))], &comparison)?;
    Ok(())
}

fn comparison_table(c: &Comparison) -> Table {
    let mut table = Table::new(["", "Gold", "Silver"]);
    let rows: [(&str, f64, f64); 5] = [
        ("Making charge %", c.gold.making_charge_percent, c.silver.making_charge_percent),
        ("Material cost", c.gold.material_cost, c.silver.material_cost),
        ("Making charge", c.gold.making_charge, c.silver.making_charge),
        ("Base price", c.gold.base_price, c.silver.base_price),
        ("Selling price", c.gold.selling_price, c.silver.selling_price),
    ];
    for (name, gold, silver) in rows {
        table.push_row(vec![
            Cell::text(name),
            Cell::Number((gold * 100.0).round() / 100.0),
            Cell::Number((silver * 100.0).round() / 100.0),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Tier;

    #[test]
    fn test_comparison_table_rows() {
        let c = pricing::compare("Bangle", 10.0, 5000.0, 75.0, Margin::Tier(Tier::Minimal)).unwrap();
        let t = comparison_table(&c);
        assert_eq!(t.len(), 5);
        assert_eq!(t.rows[0][1], Cell::Number(4.5));
        assert_eq!(t.rows[3][1], Cell::Number(52250.0));
        assert_eq!(t.rows[4][1], Cell::Number(57475.0));
    }
}
