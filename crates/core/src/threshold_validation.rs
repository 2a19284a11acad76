//! Shared threshold validation helpers.
//!
//! Provides reusable range-checking functions used by the style target and
//! lane caps validators.

use crate::error::CoreError;

/// Validate that a value falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value is finite and not negative.
pub fn validate_non_negative(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that `lo <= hi` for a closed band.
pub fn validate_band(lo: f64, hi: f64, name: &str) -> Result<(), CoreError> {
    validate_non_negative(lo, name)?;
    validate_non_negative(hi, name)?;
    if lo > hi {
        return Err(CoreError::Validation(format!(
            "{name} lower bound ({lo}) must not exceed upper bound ({hi})"
        )));
    }
    Ok(())
}
