//! Boundary validation for field measurements
//!
//! The core pipeline deliberately accepts any numeric input. These checks are
//! an optional layer applied at the API boundary when strict range validation
//! is enabled in configuration.

use crate::features::FeatureVector;

/// Validate field measurements against physically plausible ranges
pub fn validate_ranges(v: &FeatureVector) -> Result<(), &'static str> {
    if !(0.0..=14.0).contains(&v.soil_ph) {
        return Err("soil_ph must be between 0 and 14");
    }
    if v.rainfall_mm < 0.0 {
        return Err("rainfall cannot be negative");
    }
    if v.field_area_ha < 0.0 {
        return Err("field_area cannot be negative");
    }
    if !(0.0..=100.0).contains(&v.humidity_pct) {
        return Err("humidity must be between 0 and 100");
    }
    Ok(())
}
