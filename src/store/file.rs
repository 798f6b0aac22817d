use super::DriverStore;
use crate::standings::Driver;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const STORE_VERSION: u32 = 1;

/// On-disk layout of the driver set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

impl StoreFile {
    pub fn new(drivers: Vec<Driver>) -> Self {
        Self {
            version: STORE_VERSION,
            saved_at: Some(Utc::now()),
            drivers,
        }
    }
}

/// Get the default data file path (~/.config/rc-leaderboard/drivers.json)
pub fn get_data_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("drivers.json"))
}

/// Driver set persisted as a versioned JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DriverStore for JsonFileStore {
    /// If the file doesn't exist, the event has no drivers yet.
    /// If the file exists but has an unsupported version, returns an error.
    fn load(&self) -> Result<Vec<Driver>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open data file at {}", self.path.display()))?;

        let state: StoreFile = serde_json::from_reader(file)
            .with_context(|| format!("Failed to load drivers from {}", self.path.display()))?;

        check_version(&state)?;
        Ok(state.drivers)
    }

    /// Save atomically so an interrupted write never leaves a truncated file.
    fn save(&mut self, drivers: &[Driver]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory at {}", parent.display())
                })?;
            }
        }

        let mut file = AtomicWriteFile::open(&self.path).with_context(|| {
            format!("Failed to open atomic write file at {}", self.path.display())
        })?;

        let state = StoreFile::new(drivers.to_vec());
        serde_json::to_writer_pretty(&mut file, &state).context("Failed to serialize drivers")?;

        file.commit().context("Failed to save drivers")?;

        Ok(())
    }
}

fn check_version(state: &StoreFile) -> Result<()> {
    if state.version != STORE_VERSION {
        anyhow::bail!("Unsupported data file version: {}", state.version);
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Bare(Vec<Driver>),
    Store(StoreFile),
}

/// Read drivers to import.
///
/// Accepts either a bare JSON array of drivers (the value the browser
/// version kept under its `racing-drivers` storage key) or a data file
/// written by this tool.
pub fn read_import(path: &Path) -> Result<Vec<Driver>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file at {}", path.display()))?;

    let parsed: ImportFile = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse {}: expected a JSON array of drivers or a leaderboard data file",
            path.display()
        )
    })?;

    match parsed {
        ImportFile::Bare(drivers) => Ok(drivers),
        ImportFile::Store(state) => {
            check_version(&state)?;
            Ok(state.drivers)
        }
    }
}
