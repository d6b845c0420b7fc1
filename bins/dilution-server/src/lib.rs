//! dilution-server — HTTP API for serial-dilution factor and
//! uncertainty-propagation calculations.
//!
//! Serves a JSON REST API under `/api` over a fixed reference dataset
//! and a mutable user-submitted dataset, with tracer reference data for
//! chained dilution queries. The binary entrypoint lives in `main.rs`;
//! this library half exists so the router can be driven in tests.

use std::sync::Arc;

use dilution_store::{DataSources, JsonTracerRegistry};

pub mod config;
pub mod routes;

/// Shared application state passed to every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Measurement datasets behind the active-source selector.
    pub sources: Arc<DataSources>,
    /// Read-only tracer reference data.
    pub registry: Arc<JsonTracerRegistry>,
}
