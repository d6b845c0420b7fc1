//! Mutable user-submitted dataset with write-through JSON persistence.
//!
//! Submissions live in memory behind a lock and are persisted to the
//! backing file on every change, so a restart picks up where the last
//! session left off. Resetting clears memory and removes the file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::{debug, info};

use dilution_core::error::StoreError;
use dilution_core::types::{DilutionRecord, StepIndex};

/// The user-submitted dataset.
#[derive(Debug)]
pub struct CustomDataset {
    records: RwLock<BTreeMap<StepIndex, DilutionRecord>>,
    path: PathBuf,
}

impl CustomDataset {
    /// Open the custom dataset, reloading any previously persisted file.
    /// A missing file simply means no submissions yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records: BTreeMap<StepIndex, DilutionRecord> = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?
        } else {
            BTreeMap::new()
        };
        if !records.is_empty() {
            info!(path = %path.display(), records = records.len(), "custom dataset reloaded");
        }
        Ok(Self {
            records: RwLock::new(records),
            path,
        })
    }

    /// Insert or replace one step's record and persist.
    pub fn submit(&self, step: StepIndex, record: DilutionRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        records.insert(step, record);
        self.persist(&records)?;
        debug!(step, records = records.len(), "custom record submitted");
        Ok(())
    }

    /// Drop every submitted record and remove the backing file.
    pub fn reset(&self) -> Result<(), StoreError> {
        let mut records = self.records.write();
        records.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))?;
        }
        info!("custom dataset reset");
        Ok(())
    }

    /// The record for one step.
    pub fn get(&self, step: StepIndex) -> Result<DilutionRecord, StoreError> {
        self.records
            .read()
            .get(&step)
            .copied()
            .ok_or(StoreError::StepNotFound(step))
    }

    /// Every submitted record, ordered by step index.
    pub fn all(&self) -> BTreeMap<StepIndex, DilutionRecord> {
        self.records.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    fn persist(&self, records: &BTreeMap<StepIndex, DilutionRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("{}: {e}", parent.display()))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dilution_core::types::Measurement;

    fn record(m0: f64, m1: f64, m2: f64) -> DilutionRecord {
        let m = |value| Measurement {
            value,
            uncertainty: 0.1,
        };
        DilutionRecord {
            m0: m(m0),
            m1: m(m1),
            m2: m(m2),
        }
    }

    #[test]
    fn starts_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CustomDataset::open(dir.path().join("custom.json")).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.get(1), Err(StoreError::StepNotFound(1)));
    }

    #[test]
    fn submit_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CustomDataset::open(dir.path().join("custom.json")).unwrap();
        dataset.submit(1, record(10.0, 15.0, 20.0)).unwrap();
        assert_eq!(dataset.get(1).unwrap().m1.value, 15.0);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn submit_replaces_existing_step() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CustomDataset::open(dir.path().join("custom.json")).unwrap();
        dataset.submit(1, record(10.0, 15.0, 20.0)).unwrap();
        dataset.submit(1, record(10.0, 12.0, 30.0)).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get(1).unwrap().m1.value, 12.0);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        {
            let dataset = CustomDataset::open(&path).unwrap();
            dataset.submit(1, record(10.0, 15.0, 20.0)).unwrap();
            dataset.submit(2, record(5.0, 9.0, 25.0)).unwrap();
        }
        let reopened = CustomDataset::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(2).unwrap().m1.value, 9.0);
    }

    #[test]
    fn reset_clears_memory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let dataset = CustomDataset::open(&path).unwrap();
        dataset.submit(1, record(10.0, 15.0, 20.0)).unwrap();
        assert!(path.exists());

        dataset.reset().unwrap();
        assert!(dataset.is_empty());
        assert!(!path.exists());

        let reopened = CustomDataset::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn reset_on_empty_dataset_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CustomDataset::open(dir.path().join("custom.json")).unwrap();
        assert!(dataset.reset().is_ok());
    }

    #[test]
    fn creates_parent_directories_on_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("custom.json");
        let dataset = CustomDataset::open(&path).unwrap();
        dataset.submit(1, record(10.0, 15.0, 20.0)).unwrap();
        assert!(path.exists());
    }
}
