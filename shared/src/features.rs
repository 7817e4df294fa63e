//! Input feature schema and feature vector assembly
//!
//! Both trained models and the scaler were fit against one fixed feature
//! column order. That order is load-bearing: every component downstream of
//! the builder consumes features through [`FeatureVector`] rather than a
//! positional array, so a reordering bug cannot be introduced between
//! components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PredictionError;

/// Number of input features
pub const FEATURE_COUNT: usize = 5;

/// Request keys, in feature column order
pub const INPUT_KEYS: [&str; FEATURE_COUNT] = [
    "temperature",
    "soil_ph",
    "rainfall",
    "field_area",
    "humidity",
];

/// Training-time feature column names, in the same order as [`INPUT_KEYS`]
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Temperature_C",
    "Soil_pH",
    "Rainfall_mm",
    "FieldArea_ha",
    "Humidity_%",
];

/// One prediction request's field measurements, in fixed column order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub temperature_c: f64,
    pub soil_ph: f64,
    pub rainfall_mm: f64,
    pub field_area_ha: f64,
    pub humidity_pct: f64,
}

impl FeatureVector {
    /// Components in training column order
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temperature_c,
            self.soil_ph,
            self.rainfall_mm,
            self.field_area_ha,
            self.humidity_pct,
        ]
    }
}

/// Features after the fitted standardization has been applied.
///
/// A distinct type from [`FeatureVector`] so an unscaled vector can never be
/// handed to a predictor. Constructed only by [`FeatureScaler::scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFeatures([f64; FEATURE_COUNT]);

impl ScaledFeatures {
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Fitted standardization transform, one `(mean, scale)` pair per feature in
/// training column order. Loaded from the scaler artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl FeatureScaler {
    /// Apply the fitted transform: `(v[i] - mean[i]) / scale[i]`
    pub fn scale(&self, v: &FeatureVector) -> ScaledFeatures {
        let raw = v.as_array();
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }
        ScaledFeatures(out)
    }
}

/// Assemble a [`FeatureVector`] from a request body.
///
/// Each of the five required keys must be present and numeric-coercible
/// (a JSON number, or a string parseable as one). No range validation is
/// performed here; out-of-range physical values pass through. Callers that
/// want range checks apply [`crate::validation::validate_ranges`] at the
/// boundary.
pub fn build_features(raw: &Map<String, Value>) -> Result<FeatureVector, PredictionError> {
    let mut values = [0.0; FEATURE_COUNT];
    for (i, key) in INPUT_KEYS.into_iter().enumerate() {
        let value = raw
            .get(key)
            .ok_or(PredictionError::MissingKey { key })?;
        values[i] = coerce_number(key, value)?;
    }
    Ok(FeatureVector {
        temperature_c: values[0],
        soil_ph: values[1],
        rainfall_mm: values[2],
        field_area_ha: values[3],
        humidity_pct: values[4],
    })
}

fn coerce_number(key: &'static str, value: &Value) -> Result<f64, PredictionError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| PredictionError::InvalidValue {
            key,
            value: n.to_string(),
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            PredictionError::InvalidValue {
                key,
                value: s.clone(),
            }
        }),
        other => Err(PredictionError::InvalidValue {
            key,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn builds_vector_in_column_order() {
        let raw = body(json!({
            "temperature": 28.5,
            "soil_ph": 6.2,
            "rainfall": 180.0,
            "field_area": 1.5,
            "humidity": 75.0,
        }));
        let v = build_features(&raw).unwrap();
        assert_eq!(v.as_array(), [28.5, 6.2, 180.0, 1.5, 75.0]);
    }

    #[test]
    fn coerces_numeric_strings() {
        let raw = body(json!({
            "temperature": "28.5",
            "soil_ph": "6.2",
            "rainfall": "180",
            "field_area": "1.5",
            "humidity": " 75.0 ",
        }));
        let v = build_features(&raw).unwrap();
        assert_eq!(v.humidity_pct, 75.0);
        assert_eq!(v.temperature_c, 28.5);
    }

    #[test]
    fn missing_key_names_the_key() {
        for missing in INPUT_KEYS {
            let mut raw = body(json!({
                "temperature": 28.5,
                "soil_ph": 6.2,
                "rainfall": 180.0,
                "field_area": 1.5,
                "humidity": 75.0,
            }));
            raw.remove(missing);
            let err = build_features(&raw).unwrap_err();
            assert_eq!(err, PredictionError::MissingKey { key: missing });
        }
    }

    #[test]
    fn non_numeric_value_names_key_and_value() {
        let raw = body(json!({
            "temperature": "warm",
            "soil_ph": 6.2,
            "rainfall": 180.0,
            "field_area": 1.5,
            "humidity": 75.0,
        }));
        let err = build_features(&raw).unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidValue {
                key: "temperature",
                value: "warm".to_string()
            }
        );
    }

    #[test]
    fn out_of_range_values_pass_through() {
        // The builder is deliberately permissive; range checks are a
        // separate boundary concern.
        let raw = body(json!({
            "temperature": 28.5,
            "soil_ph": 22.0,
            "rainfall": -40.0,
            "field_area": 1.5,
            "humidity": 75.0,
        }));
        let v = build_features(&raw).unwrap();
        assert_eq!(v.soil_ph, 22.0);
        assert_eq!(v.rainfall_mm, -40.0);
    }

    #[test]
    fn scaler_matches_reference_computation() {
        let scaler = FeatureScaler {
            mean: [27.0, 6.0, 150.0, 2.0, 70.0],
            scale: [3.0, 0.5, 60.0, 1.25, 10.0],
        };
        let v = FeatureVector {
            temperature_c: 30.0,
            soil_ph: 6.5,
            rainfall_mm: 120.0,
            field_area_ha: 2.0,
            humidity_pct: 80.0,
        };
        let scaled = scaler.scale(&v);
        let expected = [1.0, 1.0, -0.5, 0.0, 1.0];
        for (got, want) in scaled.as_array().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
