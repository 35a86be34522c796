//! Batch upload API handler
//!
//! POST /api/batch-upload

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use crate::{
    error::{ApiError, ApiResult},
    models::BatchReport,
    services::{batch_runner, tabular},
    AppState,
};

/// POST /api/batch-upload
///
/// CSV request body; one prediction per data row with per-row error
/// isolation. Column validation failures reject the whole upload before any
/// row is processed.
pub async fn batch_upload(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<BatchReport>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty upload".to_string()));
    }

    let rows = tabular::read_batch_rows(&body)?;
    tracing::info!(rows = rows.len(), "Batch upload received");

    let report = batch_runner::run_batch(&state.pipeline, &rows).await;

    tracing::info!(
        total = report.total_processed,
        successful = report.successful,
        failed = report.failed,
        "Batch upload complete"
    );

    Ok(Json(report))
}

/// Build batch routes
pub fn batch_routes() -> Router<AppState> {
    Router::new().route("/api/batch-upload", post(batch_upload))
}
