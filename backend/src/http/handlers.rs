//! HTTP handlers for the REST API.
//!
//! Each handler validates its input, then delegates to the service layer.
//! CPU-bound work (generation, filtering, rendering) runs on the blocking pool.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    ArchiveLightCurveResponse, ArchiveQuery, HealthResponse, RootResponse, SyntheticQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::Classification;
use crate::services::plot::{ARCHIVE_PLOT_SIZE, SYNTHETIC_PLOT_SIZE};
use crate::services::{
    classify, load_and_flatten, render_panels, synthetic_series, Panel, PipelineOutput,
    PipelineRequest, ScoreRequest, SeriesPair,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        ok: true,
        msg: "Mock backend up. See /health.".to_string(),
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// =============================================================================
// Synthetic (mock) endpoints
// =============================================================================

/// GET /plot-test
///
/// Render the synthetic light curve, raw on top and flattened below.
pub async fn plot_test(
    query: Result<Query<SyntheticQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let png = tokio::task::spawn_blocking(move || {
        let series = synthetic_series(query.period, query.depth_ppm, query.window_length as usize);
        let panels = [
            Panel::new(&series.time, &series.flux),
            Panel::new(&series.flat_time, &series.flat_flux).with_reference(1.0),
        ];
        let (width, height) = SYNTHETIC_PLOT_SIZE;
        render_panels(&panels, width, height)
    })
    .await??;

    Ok(png_response(png))
}

/// GET /lc-test
///
/// Synthetic light curve and its flattened version as JSON arrays.
pub async fn lc_test(
    query: Result<Query<SyntheticQuery>, QueryRejection>,
) -> HandlerResult<SeriesPair> {
    let Query(query) = query?;
    query.validate()?;

    let series = tokio::task::spawn_blocking(move || {
        synthetic_series(query.period, query.depth_ppm, query.window_length as usize)
    })
    .await?;

    Ok(Json(series))
}

/// POST /predict
///
/// Mock classification of a target. Every body field is optional.
pub async fn predict(
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> HandlerResult<Classification> {
    let Json(request) = body?;
    Ok(Json(classify(&request)))
}

// =============================================================================
// Archive endpoints
// =============================================================================

async fn run_pipeline(
    state: &AppState,
    target_id: String,
    query: &ArchiveQuery,
) -> Result<PipelineOutput, AppError> {
    query.validate()?;
    let mut request = PipelineRequest::new(target_id, query.mission, query.window_length as usize);
    if let Some(author) = &query.author {
        request = request.with_author(author.trim());
    }
    Ok(load_and_flatten(state.archive.as_ref(), &request).await?)
}

/// GET /lc/{target_id}
///
/// Cleaned and flattened archive light curve as JSON arrays.
pub async fn get_light_curve(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    query: Result<Query<ArchiveQuery>, QueryRejection>,
) -> HandlerResult<ArchiveLightCurveResponse> {
    let Query(query) = query?;
    let output = run_pipeline(&state, target_id.clone(), &query).await?;
    let (time, flux) = output.raw.into_parts();
    let (flat_time, flat_flux) = output.flat.into_parts();

    Ok(Json(ArchiveLightCurveResponse {
        mission: query.mission,
        target: target_id,
        time,
        flux,
        flat_time,
        flat_flux,
    }))
}

/// GET /plot/{target_id}
///
/// Flattened archive light curve as a PNG.
pub async fn get_light_curve_plot(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    query: Result<Query<ArchiveQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let output = run_pipeline(&state, target_id, &query).await?;

    let png = tokio::task::spawn_blocking(move || {
        let flat = &output.flat;
        let panels = [Panel::new(flat.time(), flat.flux()).with_reference(1.0)];
        let (width, height) = ARCHIVE_PLOT_SIZE;
        render_panels(&panels, width, height)
    })
    .await??;

    Ok(png_response(png))
}
