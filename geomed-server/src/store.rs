//! Prediction storage backed by SQLite

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db;
use crate::models::PredictionRecord;
use crate::types::PredictionStore;

/// `PredictionStore` over the shared connection pool. The pool's lifecycle
/// belongs to the surrounding server, not to this store.
pub struct SqlitePredictionStore {
    pool: SqlitePool,
}

impl SqlitePredictionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionStore for SqlitePredictionStore {
    async fn save(&self, record: &PredictionRecord) -> geomed_common::Result<()> {
        db::predictions::save_prediction(&self.pool, record).await
    }
}
