//! Error types for the dilution service.
use thiserror::Error;

use crate::types::StepIndex;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("dilution record not found for step {0}")] StepNotFound(StepIndex),
    #[error("malformed dilution record for step {0}")] MalformedRecord(StepIndex),
    #[error("measurement data unavailable: {0}")] Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tracer not found: {0}")] TracerNotFound(String),
    #[error("tracer data unavailable: {0}")] Unavailable(String),
}

/// Errors of the calculation pipeline.
///
/// Collaborator failures pass through transparently; the remaining
/// variants are domain errors where the requested quantity is undefined
/// for the stored data. Those are raised explicitly instead of letting a
/// division produce Inf or NaN.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("undefined dilution factor at step {step}: diluted mass equals initial mass")]
    DegenerateDilution { step: StepIndex },
    #[error("dilution factor is zero at step {step}")]
    ZeroDilutionFactor { step: StepIndex },
    #[error("tracer {0} has zero activity")]
    ZeroTracerActivity(String),
    #[error(transparent)] Store(#[from] StoreError),
    #[error(transparent)] Registry(#[from] RegistryError),
}
