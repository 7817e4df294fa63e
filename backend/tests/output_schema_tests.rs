//! Tests for the prediction output schemas
//!
//! Every value in a response is rounded to 2 decimal places and each output
//! group carries exactly its documented key set.

use proptest::prelude::*;
use shared::{
    assemble, calculate_fertilizer, AdvisoryText, NumericOutputs, NUMERIC_COLUMNS,
    NUMERIC_OUTPUT_COUNT, TEXT_TARGETS,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// All 12 numeric outputs round to exactly 2 decimal places
    #[test]
    fn numeric_outputs_are_two_decimal(
        values in proptest::collection::vec(-1e6f64..1e6, NUMERIC_OUTPUT_COUNT),
    ) {
        let outputs = NumericOutputs::from_values(&values).unwrap();
        let json = serde_json::to_value(&outputs).unwrap();
        for (_, value) in json.as_object().unwrap() {
            let v = value.as_f64().unwrap();
            let scaled = v * 100.0;
            prop_assert!(
                (scaled - scaled.round()).abs() < 1e-6,
                "{} not rounded to 2 decimals", v
            );
        }
    }
}

#[test]
fn assembled_result_has_no_extra_or_missing_keys() {
    let numeric = NumericOutputs::from_values(&[1.0; NUMERIC_OUTPUT_COUNT]).unwrap();
    let text = AdvisoryText::from_labels(
        TEXT_TARGETS.iter().map(|t| format!("advice-{t}")).collect(),
    )
    .unwrap();
    let fertilizer = calculate_fertilizer(6.0, 1.0);

    let result = assemble(numeric, text, fertilizer);
    let json = serde_json::to_value(&result).unwrap();
    let obj = json.as_object().unwrap();

    assert_eq!(obj.len(), 3);
    assert_eq!(obj["numeric"].as_object().unwrap().len(), 12);
    assert_eq!(obj["text"].as_object().unwrap().len(), 8);
    assert_eq!(obj["fertilizer"].as_object().unwrap().len(), 3);

    for col in NUMERIC_COLUMNS {
        assert!(obj["numeric"].get(col).is_some(), "missing {col}");
    }
    for target in TEXT_TARGETS {
        assert!(obj["text"].get(target).is_some(), "missing {target}");
    }
}

#[test]
fn result_round_trips_through_json() {
    let numeric = NumericOutputs::from_values(&[42.42; NUMERIC_OUTPUT_COUNT]).unwrap();
    let text = AdvisoryText::from_labels(
        TEXT_TARGETS.iter().map(|t| t.to_string()).collect(),
    )
    .unwrap();
    let fertilizer = calculate_fertilizer(7.2, 0.5);

    let result = assemble(numeric, text, fertilizer);
    let json = serde_json::to_string(&result).unwrap();
    let back: shared::PredictionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
