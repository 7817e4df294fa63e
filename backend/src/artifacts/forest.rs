//! Decision-tree ensemble inference
//!
//! The offline trainer exports its fitted forests as serialized trees. Each
//! node splits on one feature with the convention `value <= threshold` goes
//! left; leaves carry either a 12-wide output vector (regression) or a class
//! code (classification). Inference only walks trees, it never mutates them,
//! so loaded forests are safe to share across concurrent requests.

use serde::{Deserialize, Serialize};
use shared::{PredictionError, ScaledFeatures};
use std::collections::BTreeMap;

/// A node in a decision tree (either a split or a leaf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode<L> {
    /// Internal split: `feature value <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode<L>>,
        right: Box<TreeNode<L>>,
    },
    /// Terminal prediction
    Leaf { value: L },
}

impl<L> TreeNode<L> {
    /// Walk the tree for one sample and return its leaf value
    fn evaluate<'a>(&'a self, features: &[f64]) -> Result<&'a L, PredictionError> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        PredictionError::Inference(format!(
                            "tree split on feature index {} but sample has {} features",
                            feature,
                            features.len()
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Multi-output regression forest: each leaf carries one value per output
/// column; the forest prediction is the per-column mean over trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionForest {
    pub trees: Vec<TreeNode<Vec<f64>>>,
    /// Width every leaf must have
    pub n_outputs: usize,
}

impl RegressionForest {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Predict one sample, returning `n_outputs` unrounded values
    pub fn predict(&self, sample: &ScaledFeatures) -> Result<Vec<f64>, PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::Inference(
                "regression forest has no trees".to_string(),
            ));
        }
        let mut sums = vec![0.0; self.n_outputs];
        for tree in &self.trees {
            let leaf = tree.evaluate(sample.as_array())?;
            if leaf.len() != self.n_outputs {
                return Err(PredictionError::Inference(format!(
                    "regression leaf has {} outputs, expected {}",
                    leaf.len(),
                    self.n_outputs
                )));
            }
            for (sum, value) in sums.iter_mut().zip(leaf) {
                *sum += value;
            }
        }
        let count = self.trees.len() as f64;
        for sum in &mut sums {
            *sum /= count;
        }
        Ok(sums)
    }
}

/// Classification forest for one categorical target: leaves carry class
/// codes, prediction is the majority vote over trees. Ties break toward the
/// lowest code, matching the trainer's argmax over averaged votes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationForest {
    pub trees: Vec<TreeNode<usize>>,
}

impl ClassificationForest {
    /// Predict the class code for one sample
    pub fn predict(&self, sample: &ScaledFeatures) -> Result<usize, PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::Inference(
                "classification forest has no trees".to_string(),
            ));
        }
        let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
        for tree in &self.trees {
            let code = tree.evaluate(sample.as_array())?;
            *votes.entry(*code).or_insert(0) += 1;
        }
        // Ascending code order, strict greater-than: ties keep the lowest code
        let mut best_code = 0;
        let mut best_count = 0;
        for (code, count) in votes {
            if count > best_count {
                best_code = code;
                best_count = count;
            }
        }
        Ok(best_code)
    }
}

/// One classification forest per categorical target, in the order the
/// targets' output columns were produced during training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetForest {
    pub target: String,
    pub forest: ClassificationForest,
}

/// The multi-label text estimator: independent per-target forests evaluated
/// on the same scaled sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTargetClassifier {
    pub forests: Vec<TargetForest>,
}

impl MultiTargetClassifier {
    pub fn target_count(&self) -> usize {
        self.forests.len()
    }

    /// Predict one class code per target, in target order
    pub fn predict_codes(&self, sample: &ScaledFeatures) -> Result<Vec<usize>, PredictionError> {
        self.forests
            .iter()
            .map(|tf| tf.forest.predict(sample))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FeatureScaler, FeatureVector};

    fn scaled(values: [f64; 5]) -> ScaledFeatures {
        // Identity scaler: mean 0, scale 1
        let scaler = FeatureScaler {
            mean: [0.0; 5],
            scale: [1.0; 5],
        };
        scaler.scale(&FeatureVector {
            temperature_c: values[0],
            soil_ph: values[1],
            rainfall_mm: values[2],
            field_area_ha: values[3],
            humidity_pct: values[4],
        })
    }

    fn leaf<L>(value: L) -> TreeNode<L> {
        TreeNode::Leaf { value }
    }

    fn split<L>(feature: usize, threshold: f64, left: TreeNode<L>, right: TreeNode<L>) -> TreeNode<L> {
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn split_routes_at_most_threshold_left() {
        let tree = split(1, 6.5, leaf(0usize), leaf(1usize));
        let sample_low = scaled([0.0, 6.5, 0.0, 0.0, 0.0]);
        let sample_high = scaled([0.0, 6.6, 0.0, 0.0, 0.0]);
        assert_eq!(*tree.evaluate(sample_low.as_array()).unwrap(), 0);
        assert_eq!(*tree.evaluate(sample_high.as_array()).unwrap(), 1);
    }

    #[test]
    fn regression_forest_averages_leaf_vectors() {
        let forest = RegressionForest {
            trees: vec![leaf(vec![1.0, 10.0]), leaf(vec![3.0, 20.0])],
            n_outputs: 2,
        };
        let out = forest.predict(&scaled([0.0; 5])).unwrap();
        assert_eq!(out, vec![2.0, 15.0]);
    }

    #[test]
    fn regression_forest_rejects_narrow_leaf() {
        let forest = RegressionForest {
            trees: vec![leaf(vec![1.0, 10.0]), leaf(vec![3.0])],
            n_outputs: 2,
        };
        let err = forest.predict(&scaled([0.0; 5])).unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn empty_forest_is_an_inference_error() {
        let forest = RegressionForest {
            trees: vec![],
            n_outputs: 12,
        };
        assert!(forest.predict(&scaled([0.0; 5])).is_err());
    }

    #[test]
    fn out_of_range_feature_index_is_an_inference_error() {
        let tree: TreeNode<usize> = split(7, 1.0, leaf(0), leaf(1));
        let forest = ClassificationForest { trees: vec![tree] };
        let err = forest.predict(&scaled([0.0; 5])).unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn classification_majority_vote() {
        let forest = ClassificationForest {
            trees: vec![leaf(2usize), leaf(1), leaf(2)],
        };
        assert_eq!(forest.predict(&scaled([0.0; 5])).unwrap(), 2);
    }

    #[test]
    fn classification_tie_breaks_to_lowest_code() {
        let forest = ClassificationForest {
            trees: vec![leaf(3usize), leaf(1), leaf(3), leaf(1)],
        };
        assert_eq!(forest.predict(&scaled([0.0; 5])).unwrap(), 1);
    }

    #[test]
    fn multi_target_codes_follow_target_order() {
        let clf = MultiTargetClassifier {
            forests: vec![
                TargetForest {
                    target: "A".to_string(),
                    forest: ClassificationForest {
                        trees: vec![leaf(1usize)],
                    },
                },
                TargetForest {
                    target: "B".to_string(),
                    forest: ClassificationForest {
                        trees: vec![leaf(0usize)],
                    },
                },
            ],
        };
        assert_eq!(clf.predict_codes(&scaled([0.0; 5])).unwrap(), vec![1, 0]);
    }

    #[test]
    fn tree_round_trips_through_json() {
        let tree = split(0, 27.5, leaf(vec![1.0, 2.0]), leaf(vec![3.0, 4.0]));
        let json = serde_json::to_string(&tree).unwrap();
        let back: TreeNode<Vec<f64>> = serde_json::from_str(&json).unwrap();
        let sample = scaled([30.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(*back.evaluate(sample.as_array()).unwrap(), vec![3.0, 4.0]);
    }
}
