//! geomed-server library interface
//!
//! Exposes the application state, router, and services for integration
//! testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

use crate::services::pipeline::PredictionPipeline;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Prediction pipeline with its injected collaborators
    pub pipeline: Arc<PredictionPipeline>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, pipeline: Arc<PredictionPipeline>) -> Self {
        Self {
            db,
            pipeline,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::prediction_routes())
        .merge(api::batch_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
