//! Prediction record database operations

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use geomed_common::{Error, Result};

use crate::models::PredictionRecord;

/// Insert a finished prediction. Records are write-once; there is no update
/// path.
pub async fn save_prediction(pool: &SqlitePool, record: &PredictionRecord) -> Result<()> {
    let sources = serde_json::to_string(&record.sources)
        .map_err(|e| Error::Internal(format!("Failed to serialize sources: {}", e)))?;
    let timestamp = record.timestamp.to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO predictions (
            id, name, email, hospital, pubmed_topic,
            predicted_country, city, confidence_score,
            sources, reasoning, is_doctor, specialty,
            public_profile_url, timestamp
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.hospital)
    .bind(&record.pubmed_topic)
    .bind(&record.predicted_country)
    .bind(&record.city)
    .bind(record.confidence_score)
    .bind(&sources)
    .bind(&record.reasoning)
    .bind(record.is_doctor as i64)
    .bind(&record.specialty)
    .bind(&record.public_profile_url)
    .bind(&timestamp)
    .execute(pool)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

/// Load the most recent predictions, newest first.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<PredictionRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, email, hospital, pubmed_topic,
               predicted_country, city, confidence_score,
               sources, reasoning, is_doctor, specialty,
               public_profile_url, timestamp
        FROM predictions
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Load one prediction by id.
pub async fn get_prediction(pool: &SqlitePool, id: &str) -> Result<Option<PredictionRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, email, hospital, pubmed_topic,
               predicted_country, city, confidence_score,
               sources, reasoning, is_doctor, specialty,
               public_profile_url, timestamp
        FROM predictions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PredictionRecord> {
    let sources: String = row.get("sources");
    let sources: Vec<String> = serde_json::from_str(&sources)
        .map_err(|e| Error::Internal(format!("Failed to deserialize sources: {}", e)))?;

    let timestamp: String = row.get("timestamp");
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp: {}", e)))?
        .with_timezone(&Utc);

    let is_doctor: i64 = row.get("is_doctor");

    Ok(PredictionRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        hospital: row.get("hospital"),
        pubmed_topic: row.get("pubmed_topic"),
        predicted_country: row.get("predicted_country"),
        city: row.get("city"),
        confidence_score: row.get("confidence_score"),
        sources,
        reasoning: row.get("reasoning"),
        is_doctor: is_doctor != 0,
        specialty: row.get("specialty"),
        public_profile_url: row.get("public_profile_url"),
        timestamp,
    })
}
