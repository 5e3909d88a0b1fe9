//! Persistence adapter
//!
//! The core only produces `EmissionRecord`s; where they end up is the
//! `EmissionStore`'s business. Two stores ship with the crate:
//! - `MemoryStore`: vector-backed, for tests and short-lived sessions
//! - `JsonLinesStore`: append-only file with one JSON record per line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::estimate::{Category, EmissionEstimate};

/// Stored form of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Assigned by the store, 0 until saved
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub subtype: String,
    pub activity: String,
    pub quantity: f64,
    pub co2e_kg: f64,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl EmissionRecord {
    pub fn from_estimate(estimate: &EmissionEstimate, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            timestamp,
            category: estimate.category,
            subtype: estimate.subcategory.clone(),
            activity: estimate.activity.clone(),
            quantity: estimate.quantity,
            co2e_kg: estimate.co2e_kg,
            details: estimate.details.clone(),
        }
    }

    /// Record stamped with the current time
    pub fn now(estimate: &EmissionEstimate) -> Self {
        Self::from_estimate(estimate, Utc::now())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record on line {line} of {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("refusing to store record with non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// JSON has no encoding for NaN or infinity, so such records never reach a store
fn ensure_storable(record: &EmissionRecord) -> Result<(), StoreError> {
    for (field, value) in [("quantity", record.quantity), ("co2e_kg", record.co2e_kg)] {
        if !value.is_finite() {
            return Err(StoreError::NonFinite { field, value });
        }
    }
    Ok(())
}

/// Destination for computed records
pub trait EmissionStore {
    /// Persist a record and return the id it was stored under
    fn save(&mut self, record: EmissionRecord) -> Result<u64, StoreError>;

    /// All stored records in insertion order
    fn records(&self) -> Result<Vec<EmissionRecord>, StoreError>;

    /// Convenience: stamp an estimate with the current time and save it
    fn save_estimate(&mut self, estimate: &EmissionEstimate) -> Result<u64, StoreError> {
        self.save(EmissionRecord::now(estimate))
    }

    /// Summed kg CO2e per category across stored records
    fn totals_by_category(&self) -> Result<Vec<(Category, f64)>, StoreError> {
        let records = self.records()?;
        Ok(Category::ALL
            .iter()
            .map(|&c| {
                let total: f64 = records
                    .iter()
                    .filter(|r| r.category == c)
                    .map(|r| r.co2e_kg)
                    .sum();
                (c, total)
            })
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<EmissionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EmissionStore for MemoryStore {
    fn save(&mut self, mut record: EmissionRecord) -> Result<u64, StoreError> {
        ensure_storable(&record)?;
        record.id = self.records.len() as u64 + 1;
        let id = record.id;
        self.records.push(record);
        Ok(id)
    }

    fn records(&self) -> Result<Vec<EmissionRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

/// Append-only JSON-lines file
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    next_id: u64,
}

impl JsonLinesStore {
    /// Open (or create) the file at `path`, continuing ids after the last stored record
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut store = Self { path, next_id: 1 };
        if store.path.exists() {
            let last = store.records()?.iter().map(|r| r.id).max().unwrap_or(0);
            store.next_id = last + 1;
        }

        tracing::debug!("Opened record store {:?} (next id {})", store.path, store.next_id);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl EmissionStore for JsonLinesStore {
    fn save(&mut self, mut record: EmissionRecord) -> Result<u64, StoreError> {
        ensure_storable(&record)?;
        record.id = self.next_id;
        let line = serde_json::to_string(&record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        writeln!(file, "{}", line).map_err(|e| self.io_error(e))?;

        self.next_id += 1;
        Ok(record.id)
    }

    fn records(&self) -> Result<Vec<EmissionRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut records = Vec::new();

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                line: idx + 1,
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }
}
