//! Prediction API handlers
//!
//! POST /api/predict-country, GET /api/search-history,
//! GET /api/search-history/{id}, GET /api/export-history.csv

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::{PredictionRecord, SubjectQuery},
    services::tabular,
    AppState,
};

/// History endpoint returns at most this many records.
const HISTORY_LIMIT: i64 = 100;
/// Export covers a deeper slice of history than the JSON listing.
const EXPORT_LIMIT: i64 = 1000;

/// GET /api/
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "GeoMed AI - Healthcare Professional Country Predictor"
    }))
}

/// POST /api/predict-country
///
/// Run one prediction for the submitted subject. The response is the
/// persisted record; evidence or inference degradation never fails the
/// request, only a storage fault does.
pub async fn predict_country(
    State(state): State<AppState>,
    Json(query): Json<SubjectQuery>,
) -> ApiResult<Json<PredictionRecord>> {
    if !query.email.contains('@') {
        return Err(ApiError::BadRequest(format!(
            "Invalid email address: {}",
            query.email
        )));
    }

    let record = state.pipeline.run(&query).await?;
    Ok(Json(record))
}

/// GET /api/search-history
///
/// Most recent predictions, newest first.
pub async fn search_history(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PredictionRecord>>> {
    let records = crate::db::predictions::list_recent(&state.db, HISTORY_LIMIT).await?;
    Ok(Json(records))
}

/// GET /api/search-history/{id}
pub async fn search_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PredictionRecord>> {
    let record = crate::db::predictions::get_prediction(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Search not found".to_string()))?;

    Ok(Json(record))
}

/// GET /api/export-history.csv
///
/// Download the search history as a CSV attachment.
pub async fn export_history(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = crate::db::predictions::list_recent(&state.db, EXPORT_LIMIT).await?;

    if records.is_empty() {
        return Err(ApiError::NotFound("No search history found".to_string()));
    }

    let body = tabular::render_history_csv(&records)?;
    let filename = format!(
        "geomed_hcp_history_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );

    tracing::info!(records = records.len(), filename = %filename, "History exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    ))
}

/// Build prediction routes
pub fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/api/", get(root))
        .route("/api/predict-country", post(predict_country))
        .route("/api/search-history", get(search_history))
        .route("/api/search-history/:id", get(search_by_id))
        .route("/api/export-history.csv", get(export_history))
}
