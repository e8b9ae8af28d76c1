//! Where stock sheets come from: a published Google Sheet or a local file

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::table::{Table, io};

/// A stock sheet that can be (re)fetched
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human-readable location for logs and errors
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Table>;
}

/// CSV export of a published spreadsheet
pub struct RemoteCsv {
    url: String,
    client: reqwest::Client,
}

impl RemoteCsv {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl SheetSource for RemoteCsv {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Table> {
        log::info!("Fetching sheet {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch sheet: {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Sheet request was rejected: {}", self.url))?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read sheet body: {}", self.url))?;
        io::read_csv_str(&body).with_context(|| format!("Sheet is not valid CSV: {}", self.url))
    }
}

/// CSV or spreadsheet on disk
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for LocalFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Table> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || io::read_table(&path))
            .await
            .context("Sheet reader task failed")?
    }
}

/// Build a source from a URL (`http://`, `https://`) or a file path
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn SheetSource>> {
    let location = location.trim();
    if location.is_empty() {
        anyhow::bail!("Sheet location is empty");
    }
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(RemoteCsv::new(location, timeout)?))
    } else {
        Ok(Box::new(LocalFile::new(location)))
    }
}
