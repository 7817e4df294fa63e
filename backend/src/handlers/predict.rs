//! Prediction handlers

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::prediction::PredictionRecord;
use crate::services::PredictionService;
use crate::AppState;
use shared::{build_features, validate_ranges, PredictionResult};

/// Run the prediction pipeline for the authenticated user and persist the
/// result
pub async fn create_prediction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<PredictionResult>, AppError> {
    let raw = body
        .as_object()
        .ok_or_else(|| AppError::ValidationError("No input data provided".to_string()))?;

    // Optional strict range checks at the boundary. The core pipeline stays
    // permissive either way.
    if state.config.validation.strict_ranges {
        let features = build_features(raw)?;
        validate_ranges(&features)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
    }

    let service = PredictionService::new(state.db.clone(), state.artifacts.clone());
    let result = service.predict_and_store(user.user_id, raw).await?;

    Ok(Json(result))
}

/// List the authenticated user's prediction history, newest first
pub async fn list_predictions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PredictionRecord>>, AppError> {
    let service = PredictionService::new(state.db.clone(), state.artifacts.clone());
    let history = service.history(user.user_id).await?;
    Ok(Json(history))
}
