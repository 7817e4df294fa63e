//! Output schemas for a prediction
//!
//! Three output groups: the 12 continuous agronomic recommendations, the 8
//! decoded advisory strings, and the deterministic fertilizer dosage. Field
//! order on the structs matches training-time column order, so serialized
//! output preserves it.

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::fertilizer::FertilizerDosage;

/// Number of continuous model outputs
pub const NUMERIC_OUTPUT_COUNT: usize = 12;

/// Number of categorical advisory targets
pub const TEXT_TARGET_COUNT: usize = 8;

/// Continuous output column names, in training order
pub const NUMERIC_COLUMNS: [&str; NUMERIC_OUTPUT_COUNT] = [
    "PredictedYield_kg_ha",
    "PloughDepth_cm",
    "SoilAdjustment_kgLime",
    "SeedAmount_kg",
    "PlantSpacing_cm",
    "Fertilizer_Basal_Urea_kg",
    "Fertilizer_Basal_TSP_kg",
    "Fertilizer_Basal_MOP_kg",
    "Fertilizer_2ndDose_Urea_kg",
    "Fertilizer_2ndDose_TSP_kg",
    "Fertilizer_2ndDose_MOP_kg",
    "FinalMoisture_%",
];

/// Categorical advisory target names, in the order the classifier's output
/// columns were produced during training
pub const TEXT_TARGETS: [&str; TEXT_TARGET_COUNT] = [
    "PloughMethod",
    "IrrigationAdvice",
    "WaterManagementAdvice_Stage4",
    "TillerIncreaseTip",
    "WaterControlAdvice_Stage5",
    "WaterControlAdvice_Stage6",
    "PesticideSuggestion",
    "PostHarvestAdvice",
];

/// Round to 2 decimal places, the precision of every value in a response
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The 12 continuous recommendations, each rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericOutputs {
    #[serde(rename = "PredictedYield_kg_ha")]
    pub predicted_yield_kg_ha: f64,
    #[serde(rename = "PloughDepth_cm")]
    pub plough_depth_cm: f64,
    #[serde(rename = "SoilAdjustment_kgLime")]
    pub soil_adjustment_kg_lime: f64,
    #[serde(rename = "SeedAmount_kg")]
    pub seed_amount_kg: f64,
    #[serde(rename = "PlantSpacing_cm")]
    pub plant_spacing_cm: f64,
    #[serde(rename = "Fertilizer_Basal_Urea_kg")]
    pub fertilizer_basal_urea_kg: f64,
    #[serde(rename = "Fertilizer_Basal_TSP_kg")]
    pub fertilizer_basal_tsp_kg: f64,
    #[serde(rename = "Fertilizer_Basal_MOP_kg")]
    pub fertilizer_basal_mop_kg: f64,
    #[serde(rename = "Fertilizer_2ndDose_Urea_kg")]
    pub fertilizer_second_dose_urea_kg: f64,
    #[serde(rename = "Fertilizer_2ndDose_TSP_kg")]
    pub fertilizer_second_dose_tsp_kg: f64,
    #[serde(rename = "Fertilizer_2ndDose_MOP_kg")]
    pub fertilizer_second_dose_mop_kg: f64,
    #[serde(rename = "FinalMoisture_%")]
    pub final_moisture_pct: f64,
}

impl NumericOutputs {
    /// Build from raw estimator outputs in training column order, rounding
    /// each value to 2 decimals. Fails if the estimator produced the wrong
    /// number of outputs.
    pub fn from_values(values: &[f64]) -> Result<Self, PredictionError> {
        if values.len() != NUMERIC_OUTPUT_COUNT {
            return Err(PredictionError::Inference(format!(
                "numeric estimator produced {} outputs, expected {}",
                values.len(),
                NUMERIC_OUTPUT_COUNT
            )));
        }
        Ok(Self {
            predicted_yield_kg_ha: round2(values[0]),
            plough_depth_cm: round2(values[1]),
            soil_adjustment_kg_lime: round2(values[2]),
            seed_amount_kg: round2(values[3]),
            plant_spacing_cm: round2(values[4]),
            fertilizer_basal_urea_kg: round2(values[5]),
            fertilizer_basal_tsp_kg: round2(values[6]),
            fertilizer_basal_mop_kg: round2(values[7]),
            fertilizer_second_dose_urea_kg: round2(values[8]),
            fertilizer_second_dose_tsp_kg: round2(values[9]),
            fertilizer_second_dose_mop_kg: round2(values[10]),
            final_moisture_pct: round2(values[11]),
        })
    }
}

/// The 8 decoded advisory strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryText {
    #[serde(rename = "PloughMethod")]
    pub plough_method: String,
    #[serde(rename = "IrrigationAdvice")]
    pub irrigation_advice: String,
    #[serde(rename = "WaterManagementAdvice_Stage4")]
    pub water_management_advice_stage4: String,
    #[serde(rename = "TillerIncreaseTip")]
    pub tiller_increase_tip: String,
    #[serde(rename = "WaterControlAdvice_Stage5")]
    pub water_control_advice_stage5: String,
    #[serde(rename = "WaterControlAdvice_Stage6")]
    pub water_control_advice_stage6: String,
    #[serde(rename = "PesticideSuggestion")]
    pub pesticide_suggestion: String,
    #[serde(rename = "PostHarvestAdvice")]
    pub post_harvest_advice: String,
}

impl AdvisoryText {
    /// Build from decoded labels in [`TEXT_TARGETS`] order
    pub fn from_labels(mut labels: Vec<String>) -> Result<Self, PredictionError> {
        if labels.len() != TEXT_TARGET_COUNT {
            return Err(PredictionError::Inference(format!(
                "text decoder produced {} labels, expected {}",
                labels.len(),
                TEXT_TARGET_COUNT
            )));
        }
        let mut drain = labels.drain(..);
        // drain order follows TEXT_TARGETS
        Ok(Self {
            plough_method: drain.next().unwrap_or_default(),
            irrigation_advice: drain.next().unwrap_or_default(),
            water_management_advice_stage4: drain.next().unwrap_or_default(),
            tiller_increase_tip: drain.next().unwrap_or_default(),
            water_control_advice_stage5: drain.next().unwrap_or_default(),
            water_control_advice_stage6: drain.next().unwrap_or_default(),
            pesticide_suggestion: drain.next().unwrap_or_default(),
            post_harvest_advice: drain.next().unwrap_or_default(),
        })
    }
}

/// The full response for one prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub numeric: NumericOutputs,
    pub text: AdvisoryText,
    pub fertilizer: FertilizerDosage,
}

/// Merge the three output groups. Pure structural assembly, no computation.
pub fn assemble(
    numeric: NumericOutputs,
    text: AdvisoryText,
    fertilizer: FertilizerDosage,
) -> PredictionResult {
    PredictionResult {
        numeric,
        text,
        fertilizer,
    }
}
