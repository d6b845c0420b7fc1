//! Tracer registry backed by a JSON array of tracer records.
//!
//! Reference data only; parsed strictly at startup (a malformed entry is
//! a startup error, not a per-request one).

use std::path::Path;

use tracing::info;

use dilution_core::error::RegistryError;
use dilution_core::traits::TracerRegistry;
use dilution_core::types::TracerRecord;

/// Tracer reference data loaded from the tracer info file.
#[derive(Debug, Clone)]
pub struct JsonTracerRegistry {
    tracers: Vec<TracerRecord>,
}

impl JsonTracerRegistry {
    /// Load and parse the tracer file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Unavailable(format!("{}: {e}", path.display())))?;
        let tracers: Vec<TracerRecord> = serde_json::from_str(&raw)
            .map_err(|e| RegistryError::Unavailable(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), tracers = tracers.len(), "tracer registry loaded");
        Ok(Self { tracers })
    }

    pub fn len(&self) -> usize {
        self.tracers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty()
    }
}

impl TracerRegistry for JsonTracerRegistry {
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
