//! Deterministic fertilizer dosage calculation
//!
//! Independent of the trained models. Rates are fixed agronomic policy
//! constants, not learned parameters.

use serde::{Deserialize, Serialize};

use crate::outputs::round2;

/// TSP rate for acidic soil, kg per hectare
pub const TSP_RATE_ACIDIC: f64 = 50.0;
/// TSP rate at or above the pH threshold, kg per hectare
pub const TSP_RATE_NEUTRAL: f64 = 40.0;
/// MOP rate, kg per hectare
pub const MOP_RATE: f64 = 25.0;
/// Urea rate, kg per hectare
pub const UREA_RATE: f64 = 60.0;
/// Soil pH below which the higher TSP rate applies
pub const PH_THRESHOLD: f64 = 6.5;

/// Computed fertilizer dosage, kg per field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilizerDosage {
    #[serde(rename = "TSP_kg")]
    pub tsp_kg: f64,
    #[serde(rename = "MOP_kg")]
    pub mop_kg: f64,
    #[serde(rename = "Urea_kg")]
    pub urea_kg: f64,
}

/// Compute the fertilizer dosage for a field.
///
/// `ph < 6.5` selects the higher TSP rate; exactly 6.5 takes the neutral
/// rate. Negative area is not rejected and propagates as a negative dosage.
pub fn calculate_fertilizer(ph: f64, area_ha: f64) -> FertilizerDosage {
    let tsp_rate = if ph < PH_THRESHOLD {
        TSP_RATE_ACIDIC
    } else {
        TSP_RATE_NEUTRAL
    };
    FertilizerDosage {
        tsp_kg: round2(tsp_rate * area_ha),
        mop_kg: round2(MOP_RATE * area_ha),
        urea_kg: round2(UREA_RATE * area_ha),
    }
}
