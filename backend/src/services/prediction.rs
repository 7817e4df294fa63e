//! Prediction pipeline and history service
//!
//! The pipeline itself is a pure function of the loaded artifacts and one
//! request's measurements: build features, scale, run both estimators,
//! decode, compute fertilizer, assemble. The service wraps it with per-user
//! persistence. Nothing here mutates the shared artifacts, so concurrent
//! requests need no synchronization.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::artifacts::ArtifactStore;
use crate::error::AppResult;
use shared::{
    assemble, build_features, calculate_fertilizer, AdvisoryText, NumericOutputs,
    PredictionError, PredictionResult, ScaledFeatures,
};

/// Run the full prediction pipeline for one request.
///
/// Input validation happens first; no model is invoked for a request that is
/// missing a key or carries a non-numeric value. The two estimators are
/// independent functions of the same scaled vector.
pub fn run_pipeline(
    artifacts: &ArtifactStore,
    raw: &Map<String, Value>,
) -> Result<PredictionResult, PredictionError> {
    let features = build_features(raw)?;
    let scaled = artifacts.scaler.scale(&features);

    let numeric = predict_numeric(artifacts, &scaled)?;
    let text = predict_text(artifacts, &scaled)?;
    let fertilizer = calculate_fertilizer(features.soil_ph, features.field_area_ha);

    Ok(assemble(numeric, text, fertilizer))
}

/// Numeric estimator: regression forest output, rounded to 2 decimals
pub fn predict_numeric(
    artifacts: &ArtifactStore,
    scaled: &ScaledFeatures,
) -> Result<NumericOutputs, PredictionError> {
    let values = artifacts.numeric.predict(scaled)?;
    NumericOutputs::from_values(&values)
}

/// Text estimator: one class code per target, decoded through the
/// label-encoding table in its fixed target order
pub fn predict_text(
    artifacts: &ArtifactStore,
    scaled: &ScaledFeatures,
) -> Result<AdvisoryText, PredictionError> {
    let codes = artifacts.text.predict_codes(scaled)?;
    let labels = artifacts.encoders.decode_codes(&codes)?;
    AdvisoryText::from_labels(labels)
}

/// A persisted prediction, returned verbatim from history
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub input: Value,
    pub result: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PredictionRow {
    id: Uuid,
    input: Value,
    result: Value,
    created_at: DateTime<Utc>,
}

impl From<PredictionRow> for PredictionRecord {
    fn from(row: PredictionRow) -> Self {
        PredictionRecord {
            id: row.id,
            input: row.input,
            result: row.result,
            created_at: row.created_at,
        }
    }
}

/// Prediction service: runs the pipeline and persists results per user
#[derive(Clone)]
pub struct PredictionService {
    db: PgPool,
    artifacts: Arc<ArtifactStore>,
}

impl PredictionService {
    pub fn new(db: PgPool, artifacts: Arc<ArtifactStore>) -> Self {
        Self { db, artifacts }
    }

    /// Run the pipeline for a user's request and store the result
    pub async fn predict_and_store(
        &self,
        user_id: Uuid,
        raw: &Map<String, Value>,
    ) -> AppResult<PredictionResult> {
        let result = run_pipeline(&self.artifacts, raw)?;

        let input_json = Value::Object(raw.clone());
        let result_json = serde_json::to_value(&result)
            .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO predictions (user_id, input, result)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&input_json)
        .bind(&result_json)
        .execute(&self.db)
        .await?;

        tracing::info!(user_id = %user_id, "stored prediction");

        Ok(result)
    }

    /// A user's prediction history, newest first
    pub async fn history(&self, user_id: Uuid) -> AppResult<Vec<PredictionRecord>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, input, result, created_at
            FROM predictions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PredictionRecord::from).collect())
    }
}
