//! Named scenario storage backed by a JSON file
//!
//! Mutations only touch the in-memory map; call `persist` to write the file.

use crate::params::SimulationParameters;
use crate::projection::TimelineResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::fs;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current on-disk format version
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario name must not be empty")]
    InvalidName,

    #[error("A scenario named '{0}' already exists")]
    AlreadyExists(String),

    #[error("Scenario '{0}' not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved payload: the inputs and, optionally, the projection they produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub parameters: SimulationParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TimelineResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub data: ScenarioData,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    scenarios: BTreeMap<String, ScenarioRecord>,
}

/// Named scenarios keyed by name
#[derive(Debug, Clone, Default)]
pub struct ScenarioStore {
    path: Option<PathBuf>,
    scenarios: BTreeMap<String, ScenarioRecord>,
}

impl ScenarioStore {
    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`; a missing file yields an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref().to_path_buf();

        let scenarios = match File::open(&path) {
            Ok(file) => {
                let stored: StoreFile = serde_json::from_reader(BufReader::new(file))?;
                stored.scenarios
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        log::debug!("Opened scenario store {} ({} scenarios)", path.display(), scenarios.len());
        Ok(Self {
            path: Some(path),
            scenarios,
        })
    }

    /// Write the store to its file (no-op for in-memory stores)
    ///
    /// The file is replaced atomically: a failed write leaves the previous
    /// contents in place.
    pub fn persist(&self) -> Result<(), ScenarioError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let stored = StoreFile {
            version: STORE_FORMAT_VERSION,
            scenarios: self.scenarios.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        write_atomic(path, json.as_bytes())?;

        log::info!("Saved {} scenarios to {}", self.scenarios.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Save a scenario; an existing name is only replaced when `overwrite` is set
    pub fn save(&mut self, name: &str, data: ScenarioData, overwrite: bool) -> Result<(), ScenarioError> {
        self.save_at(name, data, overwrite, Utc::now())
    }

    fn save_at(&mut self, name: &str, data: ScenarioData, overwrite: bool, now: DateTime<Utc>) -> Result<(), ScenarioError> {
        let name = validated_name(name)?;

        let created_at = match self.scenarios.get(name) {
            Some(_) if !overwrite => return Err(ScenarioError::AlreadyExists(name.to_string())),
            Some(existing) => existing.created_at,
            None => now,
        };

        self.scenarios.insert(
            name.to_string(),
            ScenarioRecord {
                created_at,
                modified_at: now,
                data,
            },
        );
        Ok(())
    }

    pub fn load(&self, name: &str) -> Option<&ScenarioRecord> {
        self.scenarios.get(name)
    }

    /// All scenarios, most recently modified first
    pub fn list(&self) -> Vec<(&str, &ScenarioRecord)> {
        let mut entries: Vec<_> = self
            .scenarios
            .iter()
            .map(|(name, record)| (name.as_str(), record))
            .collect();
        entries.sort_by(|a, b| b.1.modified_at.cmp(&a.1.modified_at).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Remove a scenario, returning whether it existed
    pub fn delete(&mut self, name: &str) -> bool {
        self.scenarios.remove(name).is_some()
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), ScenarioError> {
        self.rename_at(old_name, new_name, Utc::now())
    }

    fn rename_at(&mut self, old_name: &str, new_name: &str, now: DateTime<Utc>) -> Result<(), ScenarioError> {
        let old_name = validated_name(old_name)?;
        let new_name = validated_name(new_name)?;

        if !self.scenarios.contains_key(old_name) {
            return Err(ScenarioError::NotFound(old_name.to_string()));
        }
        if self.scenarios.contains_key(new_name) {
            return Err(ScenarioError::AlreadyExists(new_name.to_string()));
        }

        if let Some(mut record) = self.scenarios.remove(old_name) {
            record.modified_at = now;
            self.scenarios.insert(new_name.to_string(), record);
        }
        Ok(())
    }

    /// Copy of every stored scenario
    pub fn export_all(&self) -> BTreeMap<String, ScenarioRecord> {
        self.scenarios.clone()
    }

    /// Merge scenarios into the store
    ///
    /// Colliding names get a `_<millis>` suffix. Every imported record is
    /// stamped as modified now. Returns the names the records were stored under.
    pub fn import(&mut self, records: BTreeMap<String, ScenarioRecord>) -> Vec<String> {
        self.import_at(records, Utc::now())
    }

    fn import_at(&mut self, records: BTreeMap<String, ScenarioRecord>, now: DateTime<Utc>) -> Vec<String> {
        let mut stored_names = Vec::with_capacity(records.len());

        for (name, mut record) in records {
            let mut candidate = name.clone();
            let mut attempt = 0u32;
            while self.scenarios.contains_key(&candidate) {
                candidate = match attempt {
                    0 => format!("{}_{}", name, now.timestamp_millis()),
                    n => format!("{}_{}_{}", name, now.timestamp_millis(), n),
                };
                attempt += 1;
            }

            record.modified_at = now;
            self.scenarios.insert(candidate.clone(), record);
            stored_names.push(candidate);
        }

        stored_names
    }

    /// Remove every scenario
    pub fn clear(&mut self) {
        self.scenarios.clear();
    }
}

/// Write to a sibling temp file, then rename it over `path`
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

fn validated_name(name: &str) -> Result<&str, ScenarioError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ScenarioError::InvalidName)
    } else {
        Ok(trimmed)
    }
}
