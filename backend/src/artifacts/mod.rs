//! Model artifact lifecycle
//!
//! The offline trainer exports four artifacts: the numeric regression
//! forest, the multi-label text classifier, the label-encoding table and the
//! feature scaler. They are deserialized exactly once at startup, validated
//! structurally, and then held read-only in [`crate::AppState`] for the
//! process lifetime. Any load failure is fatal; the server must not accept
//! traffic with a partial or corrupt model.

pub mod encoders;
pub mod forest;

use std::fs;
use std::path::Path;

use shared::{FeatureScaler, NUMERIC_OUTPUT_COUNT, TEXT_TARGETS};
use thiserror::Error;

pub use encoders::{LabelEncodingTable, TargetLabels};
pub use forest::{ClassificationForest, MultiTargetClassifier, RegressionForest, TargetForest, TreeNode};

/// Artifact file names, fixed by the trainer's export step
pub const NUMERIC_MODEL_FILE: &str = "numeric_model.json";
pub const TEXT_MODEL_FILE: &str = "text_model.json";
pub const LABEL_ENCODERS_FILE: &str = "label_encoders.json";
pub const SCALER_FILE: &str = "scaler.json";

/// Errors while loading the model artifacts at startup
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("artifact validation failed: {0}")]
    Invalid(String),
}

/// The four loaded artifacts, shared immutably across requests
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    pub numeric: RegressionForest,
    pub text: MultiTargetClassifier,
    pub encoders: LabelEncodingTable,
    pub scaler: FeatureScaler,
}

impl ArtifactStore {
    /// Load and validate all four artifacts from a directory
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let numeric: RegressionForest = read_json(&dir.join(NUMERIC_MODEL_FILE))?;
        let text: MultiTargetClassifier = read_json(&dir.join(TEXT_MODEL_FILE))?;
        let encoders: LabelEncodingTable = read_json(&dir.join(LABEL_ENCODERS_FILE))?;
        let scaler: FeatureScaler = read_json(&dir.join(SCALER_FILE))?;
        Self::from_parts(numeric, text, encoders, scaler)
    }

    /// Assemble a store from already-deserialized artifacts, enforcing the
    /// structural invariants the pipeline relies on
    pub fn from_parts(
        numeric: RegressionForest,
        text: MultiTargetClassifier,
        encoders: LabelEncodingTable,
        scaler: FeatureScaler,
    ) -> Result<Self, ArtifactError> {
        if numeric.trees.is_empty() {
            return Err(ArtifactError::Invalid(
                "numeric model has no trees".to_string(),
            ));
        }
        if numeric.n_outputs != NUMERIC_OUTPUT_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "numeric model is {}-wide, expected {}",
                numeric.n_outputs, NUMERIC_OUTPUT_COUNT
            )));
        }

        for (i, scale) in scaler.scale.iter().enumerate() {
            if *scale == 0.0 {
                return Err(ArtifactError::Invalid(format!(
                    "scaler has zero scale for feature {}",
                    i
                )));
            }
        }

        // The encoding table's target order defines the classifier's output
        // column order. Require it to match the training target list exactly
        // so a train/serve skew fails at startup, not at decode time.
        let names: Vec<&str> = encoders.target_names().collect();
        if names != TEXT_TARGETS {
            return Err(ArtifactError::Invalid(format!(
                "label encoder targets {:?} do not match expected {:?}",
                names, TEXT_TARGETS
            )));
        }
        for entry in &encoders.targets {
            if entry.labels.is_empty() {
                return Err(ArtifactError::Invalid(format!(
                    "target {} has no labels",
                    entry.target
                )));
            }
        }

        if text.target_count() != encoders.target_count() {
            return Err(ArtifactError::Invalid(format!(
                "text model has {} targets, encoding table has {}",
                text.target_count(),
                encoders.target_count()
            )));
        }
        for (forest, entry) in text.forests.iter().zip(&encoders.targets) {
            if forest.target != entry.target {
                return Err(ArtifactError::Invalid(format!(
                    "text model target {} does not line up with encoder target {}",
                    forest.target, entry.target
                )));
            }
            if forest.forest.trees.is_empty() {
                return Err(ArtifactError::Invalid(format!(
                    "target {} has no trees",
                    forest.target
                )));
            }
        }

        Ok(Self {
            numeric,
            text,
            encoders,
            scaler,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FEATURE_COUNT;

    fn leaf_regression(value: Vec<f64>) -> TreeNode<Vec<f64>> {
        TreeNode::Leaf { value }
    }

    fn leaf_class(code: usize) -> TreeNode<usize> {
        TreeNode::Leaf { value: code }
    }

    fn valid_numeric() -> RegressionForest {
        RegressionForest {
            trees: vec![leaf_regression(vec![0.0; NUMERIC_OUTPUT_COUNT])],
            n_outputs: NUMERIC_OUTPUT_COUNT,
        }
    }

    fn valid_encoders() -> LabelEncodingTable {
        LabelEncodingTable {
            targets: TEXT_TARGETS
                .iter()
                .map(|t| TargetLabels {
                    target: t.to_string(),
                    labels: vec!["a".to_string(), "b".to_string()],
                })
                .collect(),
        }
    }

    fn valid_text() -> MultiTargetClassifier {
        MultiTargetClassifier {
            forests: TEXT_TARGETS
                .iter()
                .map(|t| TargetForest {
                    target: t.to_string(),
                    forest: ClassificationForest {
                        trees: vec![leaf_class(0)],
                    },
                })
                .collect(),
        }
    }

    fn valid_scaler() -> FeatureScaler {
        FeatureScaler {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    #[test]
    fn accepts_consistent_artifacts() {
        let store =
            ArtifactStore::from_parts(valid_numeric(), valid_text(), valid_encoders(), valid_scaler());
        assert!(store.is_ok());
    }

    #[test]
    fn rejects_empty_numeric_forest() {
        let numeric = RegressionForest {
            trees: vec![],
            n_outputs: NUMERIC_OUTPUT_COUNT,
        };
        let err =
            ArtifactStore::from_parts(numeric, valid_text(), valid_encoders(), valid_scaler())
                .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn rejects_wrong_numeric_width() {
        let numeric = RegressionForest {
            trees: vec![leaf_regression(vec![0.0; 11])],
            n_outputs: 11,
        };
        assert!(
            ArtifactStore::from_parts(numeric, valid_text(), valid_encoders(), valid_scaler())
                .is_err()
        );
    }

    #[test]
    fn rejects_zero_scale() {
        let mut scaler = valid_scaler();
        scaler.scale[2] = 0.0;
        assert!(
            ArtifactStore::from_parts(valid_numeric(), valid_text(), valid_encoders(), scaler)
                .is_err()
        );
    }

    #[test]
    fn rejects_reordered_encoder_targets() {
        let mut encoders = valid_encoders();
        encoders.targets.swap(0, 1);
        assert!(
            ArtifactStore::from_parts(valid_numeric(), valid_text(), encoders, valid_scaler())
                .is_err()
        );
    }

    #[test]
    fn rejects_text_model_missing_a_target() {
        let mut text = valid_text();
        text.forests.pop();
        assert!(
            ArtifactStore::from_parts(valid_numeric(), text, valid_encoders(), valid_scaler())
                .is_err()
        );
    }
}
