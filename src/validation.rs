/// Input validation for request data
///
/// Small, composable checks used by the patient observation validator and
/// the raw feature path. Every check reports the offending field and the
/// violated constraint; nothing is clamped or defaulted.
use crate::error::ValidationError;

/// Validate an integer lies within an inclusive range
///
/// # Arguments
/// * `value` - Value to validate
/// * `min` / `max` - Inclusive bounds
/// * `field` - Name of the field for error messages
pub fn validate_range(
    value: i64,
    min: i64,
    max: i64,
    field: &'static str,
) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

/// Validate an integer is one of an enumerated set of codes
pub fn validate_one_of(
    value: i64,
    allowed: &'static [i64],
    field: &'static str,
) -> Result<i64, ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::NotAllowed {
            field,
            allowed,
            value,
        });
    }
    Ok(value)
}

/// Validate systolic pressure is strictly above diastolic pressure
pub fn validate_blood_pressure(ap_hi: i64, ap_lo: i64) -> Result<(), ValidationError> {
    if ap_lo >= ap_hi {
        return Err(ValidationError::DiastolicNotBelowSystolic { ap_hi, ap_lo });
    }
    Ok(())
}

/// Validate a raw feature vector carries only finite numbers
///
/// Length is deliberately not checked here; the scaler and classifier own
/// the expected width.
pub fn validate_finite(features: &[f64]) -> Result<(), ValidationError> {
    if let Some((idx, v)) = features.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::InvalidInput(format!(
            "feature[{idx}] must be a finite number, got {v}"
        )));
    }
    Ok(())
}
