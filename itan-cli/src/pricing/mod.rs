//! Gold vs silver price calculator

use std::fmt;

use serde::Serialize;

/// Gold making charges, percent of material cost
pub const GOLD_MAKING_CHARGES: &[(&str, f64)] = &[
    ("Plain Band Ring", 6.0),
    ("Fancy/Broad Ring", 6.0),
    ("Kada", 6.0),
    ("Bangle", 4.5),
    ("Fancy Bangle", 6.0),
    ("Bracelets", 10.0),
    ("Pendant", 4.0),
    ("Studs", 3.0),
    ("Necklace", 10.0),
    ("Chain", 7.0),
    ("Nose Ring", 3.0),
];

const FALLBACK_GOLD_CHARGE: f64 = 10.0;
const FALLBACK_SILVER_CHARGE: f64 = 8.0;
/// Silver making charge is the gold charge less this many points
const SILVER_DISCOUNT: f64 = 2.0;
pub const MIN_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    WeightTooLow(f64),
    ProfitOutOfRange(f64),
    InvalidPrice { metal: &'static str, price: f64 },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::WeightTooLow(w) => {
                write!(f, "Weight must be at least {} g, got {}", MIN_WEIGHT, w)
            }
            PricingError::ProfitOutOfRange(p) => {
                write!(f, "Profit must be between 0 and 100 percent, got {}", p)
            }
            PricingError::InvalidPrice { metal, price } => {
                write!(f, "{} price must be a non-negative number, got {}", metal, price)
            }
        }
    }
}

impl std::error::Error for PricingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize)]
pub enum Tier {
    Minimal,
    #[default]
    Standard,
    Premium,
}

impl Tier {
    pub fn multiplier(self) -> f64 {
        match self {
            Tier::Minimal => 1.1,
            Tier::Standard => 1.5,
            Tier::Premium => 1.8,
        }
    }
}

/// How the selling price is derived from the base price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Margin {
    /// Custom profit percentage; zero is a valid custom margin
    Custom(f64),
    Tier(Tier),
}

impl Margin {
    pub fn custom(percent: f64) -> Result<Self, PricingError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(PricingError::ProfitOutOfRange(percent));
        }
        Ok(Margin::Custom(percent))
    }

    pub fn apply(self, base: f64) -> f64 {
        match self {
            Margin::Custom(p) => base * (1.0 + p / 100.0),
            Margin::Tier(t) => base * t.multiplier(),
        }
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Margin::Custom(p) => write!(f, "custom profit {}%", p),
            Margin::Tier(t) => write!(f, "{:?} tier (x{})", t, t.multiplier()),
        }
    }
}

/// Gold making charge for a category
pub fn gold_making_charge(category: &str) -> f64 {
    lookup(category).unwrap_or(FALLBACK_GOLD_CHARGE)
}

/// Silver making charge: two points below gold, never negative
pub fn silver_making_charge(category: &str) -> f64 {
    lookup(category)
        .map(|g| (g - SILVER_DISCOUNT).max(0.0))
        .unwrap_or(FALLBACK_SILVER_CHARGE)
}

pub fn is_known_category(category: &str) -> bool {
    lookup(category).is_some()
}

fn lookup(category: &str) -> Option<f64> {
    let category = category.trim();
    GOLD_MAKING_CHARGES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, pct)| *pct)
}

/// Price breakdown for one metal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub metal: &'static str,
    pub making_charge_percent: f64,
    pub material_cost: f64,
    pub making_charge: f64,
    pub base_price: f64,
    pub selling_price: f64,
}

/// Returns (material cost, making charge, base price)
pub fn calculate_price(metal_price: f64, weight: f64, making_charge_percent: f64) -> (f64, f64, f64) {
    let material = metal_price * weight;
    let making = making_charge_percent / 100.0 * material;
    (material, making, material + making)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub category: String,
    pub weight: f64,
    pub margin: Margin,
    pub gold: Quote,
    pub silver: Quote,
}

/// Quote a piece of `weight` grams in both metals
pub fn compare(
    category: &str,
    weight: f64,
    gold_price: f64,
    silver_price: f64,
    margin: Margin,
) -> Result<Comparison, PricingError> {
    if !weight.is_finite() || weight < MIN_WEIGHT {
        return Err(PricingError::WeightTooLow(weight));
    }
    for (metal, price) in [("Gold", gold_price), ("Silver", silver_price)] {
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::InvalidPrice { metal, price });
        }
    }

    let quote = |metal: &'static str, price: f64, pct: f64| {
        let (material_cost, making_charge, base_price) = calculate_price(price, weight, pct);
        Quote {
            metal,
            making_charge_percent: pct,
            material_cost,
            making_charge,
            base_price,
            selling_price: margin.apply(base_price),
        }
    };

    Ok(Comparison {
        category: category.trim().to_string(),
        weight,
        margin,
        gold: quote("Gold", gold_price, gold_making_charge(category)),
        silver: quote("Silver", silver_price, silver_making_charge(category)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_making_charges() {
        assert_eq!(gold_making_charge("Bangle"), 4.5);
        assert_eq!(silver_making_charge("Bangle"), 2.5);
        assert_eq!(silver_making_charge("studs"), 1.0);
        assert_eq!(gold_making_charge("Anklet"), 10.0);
        assert_eq!(silver_making_charge("Anklet"), 8.0);
        assert!(GOLD_MAKING_CHARGES.iter().all(|(c, _)| silver_making_charge(c) >= 0.0));
    }

    #[test]
    fn test_price_breakdown() {
        let (material, making, base) = calculate_price(5000.0, 10.0, 6.0);
        assert!(close(material, 50000.0));
        assert!(close(making, 3000.0));
        assert!(close(base, 53000.0));
    }

    #[test]
    fn test_margins() {
        assert!(close(Margin::Tier(Tier::Minimal).apply(100.0), 110.0));
        assert!(close(Margin::Tier(Tier::Standard).apply(100.0), 150.0));
        assert!(close(Margin::Tier(Tier::Premium).apply(100.0), 180.0));
        assert!(close(Margin::custom(25.0).unwrap().apply(100.0), 125.0));
        // zero profit is honoured rather than falling back to a tier
        assert!(close(Margin::custom(0.0).unwrap().apply(100.0), 100.0));
        assert_eq!(Margin::custom(120.0), Err(PricingError::ProfitOutOfRange(120.0)));
    }

    #[test]
    fn test_compare_gold_and_silver() {
        let cmp = compare("Chain", 2.0, 5000.0, 75.0, Margin::Tier(Tier::Standard)).unwrap();
        assert!(close(cmp.gold.base_price, 10700.0));
        assert!(close(cmp.gold.selling_price, 16050.0));
        assert_eq!(cmp.silver.making_charge_percent, 5.0);
        assert!(close(cmp.silver.base_price, 157.5));
    }

    #[test]
    fn test_weight_and_price_validation() {
        let tier = Margin::Tier(Tier::Standard);
        assert_eq!(compare("Kada", 0.05, 5000.0, 75.0, tier), Err(PricingError::WeightTooLow(0.05)));
        assert!(matches!(
            compare("Kada", 1.0, -1.0, 75.0, tier),
            Err(PricingError::InvalidPrice { metal: "Gold", .. })
        ));
    }
}
