//! Health check handlers
//!
//! Reports database connectivity and the loaded model artifacts. Artifact
//! load failures are fatal at startup, so a running server always reports
//! its model; the counts let operators confirm which export is live.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::artifacts::ArtifactStore;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub model: ModelStatus,
}

/// Summary of the loaded model artifacts
#[derive(Serialize)]
pub struct ModelStatus {
    pub regression_trees: usize,
    pub advisory_targets: usize,
}

impl ModelStatus {
    pub fn from_store(artifacts: &ArtifactStore) -> Self {
        Self {
            regression_trees: artifacts.numeric.tree_count(),
            advisory_targets: artifacts.encoders.target_count(),
        }
    }
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        model: ModelStatus::from_store(&state.artifacts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{
        ClassificationForest, LabelEncodingTable, MultiTargetClassifier, RegressionForest,
        TargetForest, TargetLabels, TreeNode,
    };
    use shared::{FeatureScaler, NUMERIC_OUTPUT_COUNT, TEXT_TARGETS};

    fn store_with_trees(tree_count: usize) -> ArtifactStore {
        let numeric = RegressionForest {
            trees: (0..tree_count)
                .map(|_| TreeNode::Leaf {
                    value: vec![0.0; NUMERIC_OUTPUT_COUNT],
                })
                .collect(),
            n_outputs: NUMERIC_OUTPUT_COUNT,
        };
        let text = MultiTargetClassifier {
            forests: TEXT_TARGETS
                .iter()
                .map(|t| TargetForest {
                    target: t.to_string(),
                    forest: ClassificationForest {
                        trees: vec![TreeNode::Leaf { value: 0 }],
                    },
                })
                .collect(),
        };
        let encoders = LabelEncodingTable {
            targets: TEXT_TARGETS
                .iter()
                .map(|t| TargetLabels {
                    target: t.to_string(),
                    labels: vec!["a".to_string()],
                })
                .collect(),
        };
        let scaler = FeatureScaler {
            mean: [0.0; 5],
            scale: [1.0; 5],
        };
        ArtifactStore::from_parts(numeric, text, encoders, scaler).unwrap()
    }

    #[test]
    fn model_status_reports_loaded_counts() {
        let status = ModelStatus::from_store(&store_with_trees(3));
        assert_eq!(status.regression_trees, 3);
        assert_eq!(status.advisory_targets, TEXT_TARGETS.len());
    }

    #[test]
    fn model_status_serializes_both_counts() {
        let status = ModelStatus::from_store(&store_with_trees(1));
        let json = serde_json::to_value(&status).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["regression_trees"], 1);
        assert_eq!(obj["advisory_targets"], TEXT_TARGETS.len());
    }
}
