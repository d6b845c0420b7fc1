//! The dilution calculator: net masses, dilution factors, and chained
//! tracer-dilution activities with first-order Gaussian error
//! propagation.
//!
//! Every operation is a pure read over the collaborators. The calculator
//! holds no state of its own; the active data source is whatever the
//! store resolves at call time.

use tracing::debug;

use crate::error::{CalcError, StoreError};
use crate::traits::{MeasurementStore, TracerRegistry};
use crate::types::{ChainEntry, DilutionRecord, Quantity, StepIndex};
use crate::uncertainty::{combine, relative};

/// Net spike mass of one record: `m1 − m0`, uncertainties combined in
/// quadrature.
pub fn net_spike(record: &DilutionRecord) -> Quantity {
    Quantity {
        value: record.m1.value - record.m0.value,
        uncertainty: combine(record.m1.uncertainty, record.m0.uncertainty),
    }
}

/// Net dilutant mass of one record: `m2 − m0`, uncertainties combined in
/// quadrature.
pub fn net_dilutant(record: &DilutionRecord) -> Quantity {
    Quantity {
        value: record.m2.value - record.m0.value,
        uncertainty: combine(record.m2.uncertainty, record.m0.uncertainty),
    }
}

/// Dilution factor of one record: `(m1 − m0) / (m2 − m0)`.
///
/// The uncertainty is first-order Gaussian propagation over the three
/// masses. With `f = (m1 − m0) / (m2 − m0)`:
///
/// - `∂f/∂m0 = (m1 − m2) / (m2 − m0)²`
/// - `∂f/∂m1 = 1 / (m2 − m0)`
/// - `∂f/∂m2 = −(m1 − m0) / (m2 − m0)²`
///
/// and the propagated uncertainty is the quadrature sum of each partial
/// weighted by its mass uncertainty. `m2 == m0` makes the factor
/// undefined and fails with [`CalcError::DegenerateDilution`] instead of
/// dividing by zero.
pub fn dilution_factor(record: &DilutionRecord, step: StepIndex) -> Result<Quantity, CalcError> {
    let spike = net_spike(record);
    let dilutant = net_dilutant(record);
    if dilutant.value == 0.0 {
        return Err(CalcError::DegenerateDilution { step });
    }

    let m0 = record.m0.value;
    let m1 = record.m1.value;
    let m2 = record.m2.value;
    let denom = m2 - m0;

    let df_dm0 = (m1 - m2) / (denom * denom);
    let df_dm1 = 1.0 / denom;
    let df_dm2 = -(m1 - m0) / (denom * denom);

    let uncertainty = ((df_dm0 * record.m0.uncertainty).powi(2)
        + (df_dm1 * record.m1.uncertainty).powi(2)
        + (df_dm2 * record.m2.uncertainty).powi(2))
    .sqrt();

    Ok(Quantity {
        value: spike.value / dilutant.value,
        uncertainty,
    })
}

/// Calculator over a measurement store and a tracer registry.
///
/// Cheap to construct; borrow one per call. It never caches collaborator
/// state, so source toggles between calls are always observed.
pub struct Calculator<'a> {
    store: &'a dyn MeasurementStore,
    registry: &'a dyn TracerRegistry,
}

impl<'a> Calculator<'a> {
    pub fn new(store: &'a dyn MeasurementStore, registry: &'a dyn TracerRegistry) -> Self {
        Self { store, registry }
    }

    /// Net spike mass for one step.
    pub fn net_spike(&self, step: StepIndex) -> Result<Quantity, CalcError> {
        let record = self.store.fetch(step)?;
        Ok(net_spike(&record))
    }

    /// Net dilutant mass for one step.
    pub fn net_dilutant(&self, step: StepIndex) -> Result<Quantity, CalcError> {
        let record = self.store.fetch(step)?;
        Ok(net_dilutant(&record))
    }

    /// Dilution factor for one step.
    pub fn dilution_factor(&self, step: StepIndex) -> Result<Quantity, CalcError> {
        let record = self.store.fetch(step)?;
        dilution_factor(&record, step)
    }

    /// Tracer activity through the whole dilution chain.
    ///
    /// Walks steps `1..=N`, where N is the number of records in the
    /// active source, multiplying the activity by each step's dilution
    /// factor. A single running relative uncertainty is seeded from the
    /// tracer and recombined in quadrature with each factor's relative
    /// uncertainty; the combined value from step i feeds step i+1. Any
    /// missing step fails the whole call — no partial chains.
    pub fn tracer_dilution_chain(&self, title: &str) -> Result<Vec<ChainEntry>, CalcError> {
        let tracer = self.registry.find_by_title(title)?;
        if tracer.activity == 0.0 {
            return Err(CalcError::ZeroTracerActivity(tracer.title));
        }

        // One snapshot per call; the source resolution must not change
        // under a chain in flight.
        let records = self.store.fetch_all()?;
        debug!(
            tracer = %tracer.title,
            steps = records.len(),
            source = %self.store.active_source(),
            "computing tracer dilution chain"
        );

        let mut activity = tracer.activity;
        let mut running_rel = relative(tracer.activity, tracer.uncertainty);

        let mut chain = Vec::with_capacity(records.len());
        for step in 1..=records.len() as StepIndex {
            let record = records
                .get(&step)
                .copied()
                .ok_or(StoreError::StepNotFound(step))?;
            let factor = dilution_factor(&record, step)?;
            if factor.value == 0.0 {
                return Err(CalcError::ZeroDilutionFactor { step });
            }

            activity *= factor.value;
            running_rel = combine(running_rel, relative(factor.value, factor.uncertainty));
            chain.push(ChainEntry {
                dilution_step: step,
                value: activity,
                uncertainty: activity * running_rel,
            });
        }

        Ok(chain)
    }
}
