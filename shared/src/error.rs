//! Pipeline error taxonomy
//!
//! Validation errors (MissingKey, InvalidValue) are user-correctable and are
//! raised before any model is invoked. Inference and Decode errors abort the
//! in-flight request only; they indicate an artifact or deployment problem,
//! never a user one.

use thiserror::Error;

/// Errors raised by the prediction pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// A required input key was absent from the request
    #[error("Missing input key: {key}")]
    MissingKey { key: &'static str },

    /// A present input key could not be coerced to a number
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    /// An estimator failed to produce a prediction (shape mismatch,
    /// artifact inconsistency)
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The classifier emitted a class code outside the known label range
    /// for its target. Signals artifact corruption or train/serve skew.
    #[error("Unknown class code {code} for target {target} ({known} known labels)")]
    Decode {
        target: String,
        code: usize,
        known: usize,
    },
}

impl PredictionError {
    /// Whether this error is caused by the caller's input (as opposed to a
    /// deployment defect)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionError::MissingKey { .. } | PredictionError::InvalidValue { .. }
        )
    }
}
