//! House-helper registry kept in a single xlsx workbook

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::table::{Cell, Table, io};

pub const COLUMNS: [&str; 9] = [
    "name",
    "age",
    "gender",
    "address",
    "contact",
    "experience",
    "photo_path",
    "rate",
    "registration_date",
];

/// Columns shown by a rate search
pub const SEARCH_COLUMNS: [&str; 4] = ["name", "age", "gender", "rate"];

pub const NO_PHOTO: &str = "No photo uploaded";

const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// A helper to be registered
#[derive(Debug, Clone)]
pub struct NewHelper {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    pub contact: String,
    /// Years of experience
    pub experience: u32,
    /// Rate per hour
    pub rate: f64,
    pub photo: Option<PathBuf>,
}

impl NewHelper {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Helper name cannot be empty");
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            anyhow::bail!("Age must be between {} and {}, got {}", MIN_AGE, MAX_AGE, self.age);
        }
        if !self.rate.is_finite() || self.rate < 0.0 {
            anyhow::bail!("Rate cannot be negative, got {}", self.rate);
        }
        if self.contact.trim().is_empty() {
            anyhow::bail!("Contact number cannot be empty");
        }
        if let Some(photo) = &self.photo {
            let ext = photo
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();
            if !PHOTO_EXTENSIONS.contains(&ext.as_str()) {
                anyhow::bail!("Photo must be a jpg, jpeg or png file: {}", photo.display());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Registered { photo_path: String },
    /// A helper with this contact number already exists; nothing was written
    DuplicateContact,
}

pub struct HelperRegistry {
    path: PathBuf,
    uploads: PathBuf,
}

impl HelperRegistry {
    pub fn new(path: impl Into<PathBuf>, uploads: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            uploads: uploads.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the workbook with headers and the uploads directory if missing
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.uploads)
            .with_context(|| format!("Failed to create uploads directory: {}", self.uploads.display()))?;
        if !self.path.exists() {
            log::info!("Creating helper registry {}", self.path.display());
            io::write_table(&Table::new(COLUMNS), &self.path, "Sheet1")?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Table> {
        self.ensure()?;
        let mut table = io::read_table(&self.path)
            .with_context(|| format!("Failed to read helper registry: {}", self.path.display()))?;
        for column in COLUMNS {
            if table.column(column).is_none() {
                table.set_column(column, vec![Cell::Empty; table.len()]);
            }
        }
        Ok(table)
    }

    /// Register a helper, stamped with `now`
    pub fn register(&self, helper: &NewHelper, now: NaiveDateTime) -> Result<Registration> {
        helper.validate()?;
        let mut table = self.load()?;

        let contact = helper.contact.trim();
        let contact_col = table.column("contact").unwrap_or_default();
        if table.values(contact_col).any(|c| c.to_string().trim() == contact) {
            log::warn!("Helper with contact {} already registered", contact);
            return Ok(Registration::DuplicateContact);
        }

        let photo_path = match &helper.photo {
            Some(photo) => self.store_photo(photo, now)?,
            None => NO_PHOTO.to_string(),
        };

        let record: Vec<(&str, Cell)> = vec![
            ("name", Cell::text(helper.name.trim())),
            ("age", Cell::Number(helper.age as f64)),
            ("gender", Cell::text(helper.gender.to_string())),
            ("address", Cell::text(helper.address.trim())),
            ("contact", Cell::text(contact)),
            ("experience", Cell::Number(helper.experience as f64)),
            ("photo_path", Cell::text(photo_path.clone())),
            ("rate", Cell::Number(helper.rate)),
            ("registration_date", Cell::text(now.format("%Y-%m-%d %H:%M:%S").to_string())),
        ];
        let row = table
            .columns
            .iter()
            .map(|col| {
                record
                    .iter()
                    .find(|(name, _)| name == col)
                    .map(|(_, cell)| cell.clone())
                    .unwrap_or_default()
            })
            .collect();
        table.push_row(row);

        io::write_table(&table, &self.path, "Sheet1")
            .with_context(|| format!("Failed to update helper registry: {}", self.path.display()))?;
        log::info!("Registered helper {}", helper.name.trim());
        Ok(Registration::Registered { photo_path })
    }

    fn store_photo(&self, photo: &Path, now: NaiveDateTime) -> Result<String> {
        let file_name = photo
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid photo path: {}", photo.display()))?;
        let target = self
            .uploads
            .join(format!("{}_{}", now.format("%Y%m%d_%H%M%S"), file_name));
        std::fs::copy(photo, &target)
            .with_context(|| format!("Failed to copy photo {} to {}", photo.display(), target.display()))?;
        Ok(target.display().to_string())
    }

    /// Helpers charging at most `max_rate`, showing name, age, gender and rate
    pub fn search(&self, max_rate: f64) -> Result<Table> {
        let table = self.load()?;
        let rate = table.column("rate").unwrap_or_default();
        Ok(table
            .filter(|row| row[rate].as_f64().is_some_and(|r| r <= max_rate))
            .select(&SEARCH_COLUMNS))
    }

    /// Write the whole registry as CSV
    pub fn export(&self, out: &Path) -> Result<usize> {
        if !self.path.exists() {
            anyhow::bail!("Helper registry not found: {}", self.path.display());
        }
        let table = self.load()?;
        let text = io::table_to_csv(&table)?;
        std::fs::write(out, text).with_context(|| format!("Failed to write {}", out.display()))?;
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn helper(name: &str, contact: &str, rate: f64) -> NewHelper {
        NewHelper {
            name: name.to_string(),
            age: 35,
            gender: Gender::Female,
            address: "12 MG Road".to_string(),
            contact: contact.to_string(),
            experience: 4,
            rate,
            photo: None,
        }
    }

    fn registry(dir: &Path) -> HelperRegistry {
        HelperRegistry::new(dir.join("house_helps.xlsx"), dir.join("uploads"))
    }

    #[test]
    fn test_creates_registry_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        let table = reg.load().unwrap();
        assert!(reg.path().exists());
        assert_eq!(table.columns, COLUMNS.to_vec());
        assert!(table.is_empty());
    }

    #[test]
    fn test_register_and_reject_duplicate_contact() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());

        let first = reg.register(&helper("Sunita", "9876543210", 120.0), now()).unwrap();
        assert_eq!(
            first,
            Registration::Registered {
                photo_path: NO_PHOTO.to_string()
            }
        );
        let again = reg.register(&helper("Someone", " 9876543210 ", 90.0), now()).unwrap();
        assert_eq!(again, Registration::DuplicateContact);

        let table = reg.load().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "registration_date").unwrap().to_string(), "2024-05-06 09:30:15");
        assert_eq!(table.get(0, "gender").unwrap().to_string(), "Female");
    }

    #[test]
    fn test_validation() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());

        let mut young = helper("A", "1", 10.0);
        young.age = 17;
        assert!(reg.register(&young, now()).is_err());

        assert!(reg.register(&helper("B", "2", -1.0), now()).is_err());

        let mut bad_photo = helper("C", "3", 10.0);
        bad_photo.photo = Some(PathBuf::from("notes.txt"));
        assert!(reg.register(&bad_photo, now()).is_err());
    }

    #[test]
    fn test_photo_is_copied_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("face.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();

        let reg = registry(dir.path());
        let mut h = helper("Asha", "555", 80.0);
        h.photo = Some(photo);
        let Registration::Registered { photo_path } = reg.register(&h, now()).unwrap() else {
            panic!("expected registration");
        };
        assert!(photo_path.ends_with("20240506_093015_face.jpg"));
        assert!(Path::new(&photo_path).exists());
    }

    #[test]
    fn test_search_by_max_rate_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        reg.register(&helper("Cheap", "1", 50.0), now()).unwrap();
        reg.register(&helper("Exact", "2", 100.0), now()).unwrap();
        reg.register(&helper("Pricey", "3", 150.0), now()).unwrap();

        let found = reg.search(100.0).unwrap();
        assert_eq!(found.columns, SEARCH_COLUMNS.to_vec());
        assert_eq!(found.len(), 2);
        assert!(reg.search(10.0).unwrap().is_empty());

        let out = dir.path().join("house_helps.csv");
        assert_eq!(reg.export(&out).unwrap(), 3);
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.starts_with("name,age,gender"));
    }
}
