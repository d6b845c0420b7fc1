//! Active-source selection over the reference and custom datasets.
//!
//! The custom dataset answers fetches whenever it holds at least one
//! record; otherwise the reference dataset does. The choice is resolved
//! to an explicit [`SourceKind`] once per call and dispatched on — never
//! cached across calls, since submissions and resets change it.

use std::collections::BTreeMap;

use dilution_core::error::StoreError;
use dilution_core::traits::MeasurementStore;
use dilution_core::types::{DilutionRecord, SourceKind, StepIndex};

use crate::custom::CustomDataset;
use crate::reference::ReferenceDataset;

/// The two measurement datasets behind one [`MeasurementStore`] facade.
#[derive(Debug)]
pub struct DataSources {
    reference: ReferenceDataset,
    custom: CustomDataset,
}

impl DataSources {
    pub fn new(reference: ReferenceDataset, custom: CustomDataset) -> Self {
        Self { reference, custom }
    }

    /// The mutable custom dataset; submissions and resets go here.
    pub fn custom(&self) -> &CustomDataset {
        &self.custom
    }

    /// Resolve which dataset answers the current call.
    fn resolve(&self) -> SourceKind {
        if self.custom.is_empty() {
            SourceKind::Default
        } else {
            SourceKind::Custom
        }
    }
}

impl MeasurementStore for DataSources {
    fn fetch(&self, step: StepIndex) -> Result<DilutionRecord, StoreError> {
        match self.resolve() {
            SourceKind::Default => self.reference.get(step),
            SourceKind::Custom => self.custom.get(step),
        }
    }

    fn fetch_all(&self) -> Result<BTreeMap<StepIndex, DilutionRecord>, StoreError> {
        match self.resolve() {
            SourceKind::Default => self.reference.all(),
            SourceKind::Custom => Ok(self.custom.all()),
        }
    }

    fn active_source(&self) -> SourceKind {
        self.resolve()
    }
}
