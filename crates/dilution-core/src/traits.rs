//! Trait interfaces between the calculator and its data collaborators.
//!
//! - [`MeasurementStore`] — per-step mass measurements (dilution-store implements)
//! - [`TracerRegistry`] — tracer activity reference data (dilution-store implements)
//!
//! In-memory doubles for tests live here as well, next to the traits
//! they stand in for.

use std::collections::BTreeMap;

use crate::error::{RegistryError, StoreError};
use crate::types::{DilutionRecord, SourceKind, StepIndex, TracerRecord};

/// Read access to the per-step mass measurements.
///
/// Implementations decide which dataset (reference or custom) answers a
/// fetch; callers resolve nothing themselves and never cache records
/// across calls.
pub trait MeasurementStore: Send + Sync {
    /// Fetch the record for one step. `StepNotFound` if absent,
    /// `MalformedRecord` if present but undecodable.
    fn fetch(&self, step: StepIndex) -> Result<DilutionRecord, StoreError>;

    /// Every record of the active source, ordered by step index.
    fn fetch_all(&self) -> Result<BTreeMap<StepIndex, DilutionRecord>, StoreError>;

    /// Which dataset currently answers fetches.
    ///
    /// Can change between calls as records are submitted or reset.
    fn active_source(&self) -> SourceKind;
}

/// Read-only lookup of tracer reference data.
pub trait TracerRegistry: Send + Sync {
    /// Look up a tracer by title, case-insensitively.
    fn find_by_title(&self, title: &str) -> Result<TracerRecord, RegistryError>;

    /// Look up a tracer by its exact source identifier.
    fn find_by_source_id(&self, source_id: &str) -> Result<TracerRecord, RegistryError>;

    /// Titles of every known tracer, in registry order.
    fn titles(&self) -> Result<Vec<String>, RegistryError>;
}

/// In-memory [`MeasurementStore`] for tests. Reports itself as the
/// default source.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<StepIndex, DilutionRecord>,
}

impl MemoryStore {
    pub fn new(records: BTreeMap<StepIndex, DilutionRecord>) -> Self {
        Self { records }
    }
}

impl MeasurementStore for MemoryStore {
    fn fetch(&self, step: StepIndex) -> Result<DilutionRecord, StoreError> {
        self.records
            .get(&step)
            .copied()
            .ok_or(StoreError::StepNotFound(step))
    }

    fn fetch_all(&self) -> Result<BTreeMap<StepIndex, DilutionRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn active_source(&self) -> SourceKind {
        SourceKind::Default
    }
}

/// In-memory [`TracerRegistry`] for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    tracers: Vec<TracerRecord>,
}

impl MemoryRegistry {
    pub fn new(tracers: Vec<TracerRecord>) -> Self {
        Self { tracers }
    }
}

impl TracerRegistry for MemoryRegistry {
    fn find_by_title(&self, title: &str) -> Result<TracerRecord, RegistryError> {
        self.tracers
            .iter()
            .find(|t| t.title.eq_ignore_ascii_case(title))
            .cloned()
            .ok_or_else(|| RegistryError::TracerNotFound(title.to_string()))
    }

    fn find_by_source_id(&self, source_id: &str) -> Result<TracerRecord, RegistryError> {
        self.tracers
            .iter()
            .find(|t| t.source_id == source_id)
            .cloned()
            .ok_or_else(|| RegistryError::TracerNotFound(source_id.to_string()))
    }

    fn titles(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.tracers.iter().map(|t| t.title.clone()).collect())
    }
}
