//! Read-only reference dataset backed by the fixed JSON file.
//!
//! The file is an object keyed by step index as a decimal string:
//!
//! ```json
//! {"1": {"m0": {"value": 10.0, "uncertainty": 0.1}, "m1": …, "m2": …}}
//! ```
//!
//! Records are kept as raw JSON and decoded per fetch, so one malformed
//! record fails closed as not-found for that step without poisoning the
//! rest of the file.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use dilution_core::error::StoreError;
use dilution_core::types::{DilutionRecord, StepIndex};

/// The fixed reference dataset, parsed once at startup.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    records: BTreeMap<StepIndex, Value>,
}

impl ReferenceDataset {
    /// Load the reference file. Fails if the file is missing or is not a
    /// step-indexed JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        let records: BTreeMap<StepIndex, Value> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), records = records.len(), "reference dataset loaded");
        Ok(Self { records })
    }

    /// The record for one step.
    pub fn get(&self, step: StepIndex) -> Result<DilutionRecord, StoreError> {
        let value = self
            .records
            .get(&step)
            .ok_or(StoreError::StepNotFound(step))?;
        decode_record(step, value)
    }

    /// Every record, ordered by step index.
    pub fn all(&self) -> Result<BTreeMap<StepIndex, DilutionRecord>, StoreError> {
        self.records
            .iter()
            .map(|(&step, value)| Ok((step, decode_record(step, value)?)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode one raw record. A missing or mistyped field fails closed as
/// [`StoreError::MalformedRecord`].
fn decode_record(step: StepIndex, value: &Value) -> Result<DilutionRecord, StoreError> {
    serde_json::from_value(value.clone()).map_err(|_| StoreError::MalformedRecord(step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dataset(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dilution_data.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    const TWO_STEPS: &str = r#"{
        "1": {"m0": {"value": 10.0, "uncertainty": 0.1},
              "m1": {"value": 15.0, "uncertainty": 0.1},
              "m2": {"value": 20.0, "uncertainty": 0.1}},
        "2": {"m0": {"value": 5.0, "uncertainty": 0.05},
              "m1": {"value": 9.0, "uncertainty": 0.05},
              "m2": {"value": 25.0, "uncertainty": 0.05}}
    }"#;

    #[test]
    fn loads_and_fetches_by_step() {
        let (_dir, path) = write_dataset(TWO_STEPS);
        let dataset = ReferenceDataset::open(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().m1.value, 15.0);
        assert_eq!(dataset.get(2).unwrap().m2.uncertainty, 0.05);
    }

    #[test]
    fn missing_step_is_not_found() {
        let (_dir, path) = write_dataset(TWO_STEPS);
        let dataset = ReferenceDataset::open(&path).unwrap();
        assert_eq!(dataset.get(3), Err(StoreError::StepNotFound(3)));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReferenceDataset::open(dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn malformed_record_fails_closed() {
        // Step 2 lacks the m1 uncertainty; step 1 must stay readable.
        let (_dir, path) = write_dataset(
            r#"{
            "1": {"m0": {"value": 10.0, "uncertainty": 0.1},
                  "m1": {"value": 15.0, "uncertainty": 0.1},
                  "m2": {"value": 20.0, "uncertainty": 0.1}},
            "2": {"m0": {"value": 5.0, "uncertainty": 0.05},
                  "m1": {"value": 9.0},
                  "m2": {"value": 25.0, "uncertainty": 0.05}}
        }"#,
        );
        let dataset = ReferenceDataset::open(&path).unwrap();
        assert!(dataset.get(1).is_ok());
        assert_eq!(dataset.get(2), Err(StoreError::MalformedRecord(2)));
        assert_eq!(dataset.all(), Err(StoreError::MalformedRecord(2)));
    }

    #[test]
    fn all_preserves_step_order() {
        let (_dir, path) = write_dataset(TWO_STEPS);
        let dataset = ReferenceDataset::open(&path).unwrap();
        let steps: Vec<_> = dataset.all().unwrap().into_keys().collect();
        assert_eq!(steps, vec![1, 2]);
    }
}
