//! Axum router and HTTP handlers.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use dilution_core::calculator::Calculator;
use dilution_core::error::{CalcError, RegistryError, StoreError};
use dilution_core::traits::{MeasurementStore, TracerRegistry};
use dilution_core::types::{ChainEntry, DilutionRecord, Quantity, StepIndex};

use crate::AppState;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Calculation and data errors rendered as JSON with the right status.
///
/// Absent or malformed data fails closed as 404; domain errors (the
/// record exists but the math is undefined) are 422; storage failures
/// are 500.
struct ApiError(CalcError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CalcError::Store(StoreError::StepNotFound(_))
            | CalcError::Store(StoreError::MalformedRecord(_))
            | CalcError::Registry(RegistryError::TracerNotFound(_)) => StatusCode::NOT_FOUND,
            CalcError::Store(StoreError::Unavailable(_))
            | CalcError::Registry(RegistryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CalcError::DegenerateDilution { .. }
            | CalcError::ZeroDilutionFactor { .. }
            | CalcError::ZeroTracerActivity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<CalcError> for ApiError {
    fn from(e: CalcError) -> Self {
        Self(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(CalcError::Store(e))
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self(CalcError::Registry(e))
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/tracers", get(list_tracers))
        .route("/api/tracers/{title}", get(tracer_by_title))
        .route("/api/tracers/source/{source_id}", get(tracer_by_source_id))
        .route("/api/dilutions", get(list_dilutions))
        .route("/api/dilutions/{step}", post(submit_dilution))
        .route("/api/dilutions/reset", post(reset_custom))
        .route("/api/source", get(active_source))
        .route("/api/net-spike/{step}", get(net_spike))
        .route("/api/net-spikes", get(net_spikes))
        .route("/api/net-dilutant/{step}", get(net_dilutant))
        .route("/api/net-dilutants", get(net_dilutants))
        .route("/api/dilution-factor/{step}", get(dilution_factor))
        .route("/api/dilution-factors", get(dilution_factors))
        .route("/api/tracer-dilution/{title}", get(tracer_dilution))
        .with_state(state)
        .layer(cors)
}

// ---------------------------------------------------------------------------
// Tracer handlers
// ---------------------------------------------------------------------------

/// `GET /api/tracers` — all tracer titles.
async fn list_tracers(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(state.registry.titles()?))
}

/// `GET /api/tracers/{title}` — tracer activity by title, case-insensitive.
async fn tracer_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Value> {
    let tracer = state.registry.find_by_title(&title)?;
    Ok(Json(json!({
        "source_id": tracer.source_id,
        "activity": tracer.activity,
        "uncertainty": tracer.uncertainty,
    })))
}

/// `GET /api/tracers/source/{source_id}` — tracer activity by source id.
async fn tracer_by_source_id(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> ApiResult<Value> {
    let tracer = state.registry.find_by_source_id(&source_id)?;
    Ok(Json(json!({
        "title": tracer.title,
        "activity": tracer.activity,
        "uncertainty": tracer.uncertainty,
    })))
}

// ---------------------------------------------------------------------------
// Dataset handlers
// ---------------------------------------------------------------------------

/// `GET /api/dilutions` — every record of the active source, keyed by step.
async fn list_dilutions(
    State(state): State<AppState>,
) -> ApiResult<BTreeMap<StepIndex, DilutionRecord>> {
    Ok(Json(state.sources.fetch_all()?))
}

/// `POST /api/dilutions/{step}` — submit one record into the custom dataset.
async fn submit_dilution(
    State(state): State<AppState>,
    Path(step): Path<StepIndex>,
    Json(record): Json<DilutionRecord>,
) -> ApiResult<Value> {
    state.sources.custom().submit(step, record)?;
    info!(step, "custom dilution record submitted");
    Ok(Json(json!({
        "message": format!("Dilution {step} data submitted successfully")
    })))
}

/// `POST /api/dilutions/reset` — drop every submitted record; queries
/// fall back to the reference dataset.
async fn reset_custom(State(state): State<AppState>) -> ApiResult<Value> {
    state.sources.custom().reset()?;
    info!("custom dataset reset");
    Ok(Json(json!({ "message": "Custom data reset successfully" })))
}

/// `GET /api/source` — which dataset currently answers queries.
async fn active_source(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "active": state.sources.active_source() }))
}

// ---------------------------------------------------------------------------
// Calculation handlers
// ---------------------------------------------------------------------------

/// `GET /api/net-spike/{step}`.
async fn net_spike(State(state): State<AppState>, Path(step): Path<StepIndex>) -> ApiResult<Quantity> {
    debug!(step, "net spike requested");
    let calc = Calculator::new(state.sources.as_ref(), state.registry.as_ref());
    Ok(Json(calc.net_spike(step)?))
}

/// `GET /api/net-spikes` — net spike for every step of the active source.
async fn net_spikes(State(state): State<AppState>) -> ApiResult<Vec<ChainEntry>> {
    bulk(&state, |calc, step| calc.net_spike(step))
}

/// `GET /api/net-dilutant/{step}`.
async fn net_dilutant(
    State(state): State<AppState>,
    Path(step): Path<StepIndex>,
) -> ApiResult<Quantity> {
    debug!(step, "net dilutant requested");
    let calc = Calculator::new(state.sources.as_ref(), state.registry.as_ref());
    Ok(Json(calc.net_dilutant(step)?))
}

/// `GET /api/net-dilutants` — net dilutant for every step.
async fn net_dilutants(State(state): State<AppState>) -> ApiResult<Vec<ChainEntry>> {
    bulk(&state, |calc, step| calc.net_dilutant(step))
}

/// `GET /api/dilution-factor/{step}`.
async fn dilution_factor(
    State(state): State<AppState>,
    Path(step): Path<StepIndex>,
) -> ApiResult<Quantity> {
    debug!(step, "dilution factor requested");
    let calc = Calculator::new(state.sources.as_ref(), state.registry.as_ref());
    Ok(Json(calc.dilution_factor(step)?))
}

/// `GET /api/dilution-factors` — dilution factor for every step.
async fn dilution_factors(State(state): State<AppState>) -> ApiResult<Vec<ChainEntry>> {
    bulk(&state, |calc, step| calc.dilution_factor(step))
}

/// `GET /api/tracer-dilution/{title}` — chained activity series.
async fn tracer_dilution(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Vec<ChainEntry>> {
    debug!(%title, "tracer dilution chain requested");
    let calc = Calculator::new(state.sources.as_ref(), state.registry.as_ref());
    Ok(Json(calc.tracer_dilution_chain(&title)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply one per-step calculation to every step of the active source, in
/// step order. Aborts on the first error — no partial arrays.
fn bulk<F>(state: &AppState, f: F) -> ApiResult<Vec<ChainEntry>>
where
    F: Fn(&Calculator<'_>, StepIndex) -> Result<Quantity, CalcError>,
{
    let calc = Calculator::new(state.sources.as_ref(), state.registry.as_ref());
    let steps: Vec<StepIndex> = state.sources.fetch_all()?.into_keys().collect();

    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        let q = f(&calc, step)?;
        out.push(ChainEntry {
            dilution_step: step,
            value: q.value,
            uncertainty: q.uncertainty,
        });
    }
    Ok(Json(out))
}
