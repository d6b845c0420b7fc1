//! Core data model: mass measurements, dilution records, tracers, and
//! derived quantities.
//!
//! All masses and activities are `f64`. Every measured or derived number
//! carries its absolute uncertainty alongside the value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a dilution step. Steps are numbered from 1 with no gaps.
pub type StepIndex = u32;

/// One weighed mass with its instrument uncertainty.
///
/// Immutable once recorded; the calculator never writes measurements.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Measured value.
    pub value: f64,
    /// Absolute uncertainty of the measurement.
    pub uncertainty: f64,
}

/// The three mass measurements recorded for one dilution step.
///
/// `m0` is the initial mass, `m1` the mass after the tracer spike was
/// added, `m2` the mass after the diluent was added. A record with
/// `m2.value == m0.value` has an undefined dilution factor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DilutionRecord {
    pub m0: Measurement,
    pub m1: Measurement,
    pub m2: Measurement,
}

/// A derived value with its propagated absolute uncertainty.
///
/// The uniform output shape of every calculation: net spike, net
/// dilutant, dilution factor, and chained activity.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub uncertainty: f64,
}

/// Reference data for one tracer solution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TracerRecord {
    /// Human-readable tracer title, matched case-insensitively.
    pub title: String,
    /// Identifier of the tracer source, matched exactly.
    pub source_id: String,
    /// Certified activity of the tracer.
    pub activity: f64,
    /// Absolute uncertainty of the activity.
    pub uncertainty: f64,
}

/// One entry of a chained tracer-dilution result.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ChainEntry {
    /// Step index, 1-based and strictly increasing along the chain.
    pub dilution_step: StepIndex,
    /// Tracer activity after this dilution step.
    pub value: f64,
    /// Propagated absolute uncertainty of the activity.
    pub uncertainty: f64,
}

/// Which measurement dataset answers fetches.
///
/// Resolved fresh for every calculation call: the custom dataset wins
/// whenever it holds at least one record.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The fixed reference dataset.
    #[default]
    Default,
    /// The user-submitted dataset.
    Custom,
}

impl SourceKind {
    /// The wire name of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
