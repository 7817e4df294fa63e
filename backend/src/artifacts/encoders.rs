//! Label encoding table
//!
//! Maps each categorical target's integer class codes back to the
//! human-readable labels the trainer encoded them from. Represented as an
//! ordered list of targets because the order defines which classifier output
//! column belongs to which target; a plain map would lose that.

use serde::{Deserialize, Serialize};
use shared::PredictionError;

/// Ordered label list for one categorical target (index = class code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetLabels {
    pub target: String,
    pub labels: Vec<String>,
}

/// Per-target label encodings, in classifier output column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncodingTable {
    pub targets: Vec<TargetLabels>,
}

impl LabelEncodingTable {
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Target names in table order
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.target.as_str())
    }

    /// Decode one class code per target, in table order.
    ///
    /// A code outside a target's known label range means the artifact is
    /// corrupt or the classifier was trained against a different table;
    /// that is a [`PredictionError::Decode`], not a user error.
    pub fn decode_codes(&self, codes: &[usize]) -> Result<Vec<String>, PredictionError> {
        if codes.len() != self.targets.len() {
            return Err(PredictionError::Inference(format!(
                "classifier produced {} codes for {} targets",
                codes.len(),
                self.targets.len()
            )));
        }
        self.targets
            .iter()
            .zip(codes)
            .map(|(entry, &code)| {
                entry
                    .labels
                    .get(code)
                    .cloned()
                    .ok_or_else(|| PredictionError::Decode {
                        target: entry.target.clone(),
                        code,
                        known: entry.labels.len(),
                    })
            })
            .collect()
    }
}
