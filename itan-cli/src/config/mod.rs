//! User configuration (~/.config/itan/config.toml)
//!
//! Every section has defaults matching the workshop's existing setup, so a
//! missing file is not an error. Secrets never live in the file: the SMTP
//! password comes from `ITAN_SMTP_PASSWORD` (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "itan";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable holding the SMTP password
pub const SMTP_PASSWORD_ENV: &str = "ITAN_SMTP_PASSWORD";

const SHEET_EXPORT_BASE: &str =
    "https://docs.google.com/spreadsheets/d/1Jwx4TntDxlwghFn_eC_NgooXlpvR6WTDdvWy4PO0zgk/export?format=csv&gid=";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub inventory: InventoryConfig,
    pub mail: MailConfig,
    pub schedule: ScheduleConfig,
    pub pricing: PricingConfig,
}

/// Where the flat-file "databases" live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for every file below (relative to the working directory)
    pub data_dir: PathBuf,
    /// Cumulative PDF extraction ledger
    pub ledger_file: String,
    /// Result of the most recent extraction run
    pub recent_file: String,
    /// House-helper registry
    pub helpers_file: String,
    /// Directory for helper photos
    pub uploads_dir: String,
    /// Order register
    pub orders_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            ledger_file: "Extracted_Data.xlsx".to_string(),
            recent_file: "Recent_Extraction.xlsx".to_string(),
            helpers_file: "house_helps.xlsx".to_string(),
            uploads_dir: "uploads".to_string(),
            orders_file: "order_data.xlsx".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn recent_path(&self) -> PathBuf {
        self.data_dir.join(&self.recent_file)
    }

    pub fn helpers_path(&self) -> PathBuf {
        self.data_dir.join(&self.helpers_file)
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.data_dir.join(&self.uploads_dir)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Salesperson stock sheet: CSV export URL or local path
    pub sales_source: String,
    /// Factory stock sheet: CSV export URL or local path
    pub factory_source: String,
    /// Items older than this many days are aged stock
    pub aged_after_days: i64,
    /// Days predicted by the forecast
    pub forecast_days: u32,
    /// HTTP timeout for remote sheets
    pub timeout_secs: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            sales_source: format!("{}2076018430", SHEET_EXPORT_BASE),
            factory_source: format!("{}0", SHEET_EXPORT_BASE),
            aged_after_days: 10,
            forecast_days: 30,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Login user; defaults to the sender address when empty
    pub username: String,
    pub sender: String,
    /// Recipient for scheduled reports
    pub recipient: String,
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            sender: String::new(),
            recipient: String::new(),
            subject: "Stock Report".to_string(),
        }
    }
}

impl MailConfig {
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.sender
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Day of the week, e.g. "monday"
    pub weekday: String,
    /// Local time, "HH:MM"
    pub time: String,
    /// IANA timezone name
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekday: "monday".to_string(),
            time: "08:00".to_string(),
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn parsed_weekday(&self) -> Result<Weekday> {
        self.weekday
            .parse::<Weekday>()
            .map_err(|_| anyhow::anyhow!("Invalid schedule weekday: '{}'", self.weekday))
    }

    pub fn parsed_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .with_context(|| format!("Invalid schedule time '{}', expected HH:MM", self.time))
    }

    pub fn parsed_timezone(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid schedule timezone '{}': {}", self.timezone, e))
    }
}

/// Default metal prices (per gram) for the calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub gold_price: f64,
    pub silver_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            gold_price: 5000.0,
            silver_price: 75.0,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

impl Config {
    /// Load from an explicit path, or from the default location if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file does not exist: {}", p.display());
                }
                p.to_path_buf()
            }
            None => {
                let p = default_config_path();
                if !p.exists() {
                    log::debug!("No config at {}, using defaults", p.display());
                    return Ok(Config::default());
                }
                p
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// SMTP password from the environment
    pub fn smtp_password(&self) -> Result<String> {
        std::env::var(SMTP_PASSWORD_ENV)
            .with_context(|| format!("{} is not set", SMTP_PASSWORD_ENV))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_dir = "/srv/itan"

            [inventory]
            aged_after_days = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.ledger_path(), PathBuf::from("/srv/itan/Extracted_Data.xlsx"));
        assert_eq!(config.inventory.aged_after_days, 15);
        assert_eq!(config.inventory.forecast_days, 30);
        assert_eq!(config.mail.smtp_port, 587);
    }

    #[test]
    fn test_schedule_parsing() {
        let schedule = ScheduleConfig::default();
        assert_eq!(schedule.parsed_weekday().unwrap(), Weekday::Mon);
        assert_eq!(schedule.parsed_time().unwrap(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(schedule.parsed_timezone().unwrap(), chrono_tz::Asia::Kolkata);

        let bad = ScheduleConfig {
            time: "8am".to_string(),
            ..ScheduleConfig::default()
        };
        assert!(bad.parsed_time().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_login_falls_back_to_sender() {
        let mail = MailConfig {
            sender: "shop@example.com".to_string(),
            ..MailConfig::default()
        };
        assert_eq!(mail.login(), "shop@example.com");
    }
}
