//! Clinical fields supplied by callers of the friendly prediction path.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{validate_blood_pressure, validate_one_of, validate_range};

pub const AGE_RANGE: (i64, i64) = (0, 120);
pub const AP_HI_RANGE: (i64, i64) = (10, 200);
pub const AP_LO_RANGE: (i64, i64) = (10, 140);
pub const CHOLESTEROL_CODES: &[i64] = &[1, 2, 3];
pub const ACTIVE_CODES: &[i64] = &[0, 1];

/// Cholesterol level as coded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CholesterolLevel {
    Normal = 1,
    AboveNormal = 2,
    WellAboveNormal = 3,
}

impl CholesterolLevel {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for CholesterolLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match validate_one_of(value, CHOLESTEROL_CODES, "cholesterol")? {
            1 => Ok(Self::Normal),
            2 => Ok(Self::AboveNormal),
            _ => Ok(Self::WellAboveNormal),
        }
    }
}

/// Unvalidated request body: `{age, ap_hi, ap_lo, cholesterol, active}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientObservation {
    /// Age in years
    pub age: i64,
    /// Systolic blood pressure (mmHg)
    pub ap_hi: i64,
    /// Diastolic blood pressure (mmHg)
    pub ap_lo: i64,
    /// 1 = normal, 2 = above normal, 3 = well above normal
    pub cholesterol: i64,
    /// Physical activity, 0 = no, 1 = yes
    pub active: i64,
}

/// An observation that passed every field and cross-field check.
///
/// Only [`PatientObservation::validate`] constructs it, so feature
/// derivation can never see out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidObservation {
    age: u8,
    ap_hi: u16,
    ap_lo: u16,
    cholesterol: CholesterolLevel,
    active: bool,
}

impl PatientObservation {
    /// Checks run in field order; the first violation is reported.
    pub fn validate(&self) -> Result<ValidObservation, ValidationError> {
        let age = validate_range(self.age, AGE_RANGE.0, AGE_RANGE.1, "age")?;
        let ap_hi = validate_range(self.ap_hi, AP_HI_RANGE.0, AP_HI_RANGE.1, "ap_hi")?;
        let ap_lo = validate_range(self.ap_lo, AP_LO_RANGE.0, AP_LO_RANGE.1, "ap_lo")?;
        let cholesterol = CholesterolLevel::try_from(self.cholesterol)?;
        let active = validate_one_of(self.active, ACTIVE_CODES, "active")? == 1;
        validate_blood_pressure(ap_hi, ap_lo)?;

        // Bounds above guarantee the narrowing casts are lossless.
        Ok(ValidObservation {
            age: age as u8,
            ap_hi: ap_hi as u16,
            ap_lo: ap_lo as u16,
            cholesterol,
            active,
        })
    }
}

impl ValidObservation {
    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn ap_hi(&self) -> u16 {
        self.ap_hi
    }

    pub fn ap_lo(&self) -> u16 {
        self.ap_lo
    }

    pub fn cholesterol(&self) -> CholesterolLevel {
        self.cholesterol
    }

    pub fn active(&self) -> bool {
        self.active
    }
}
