//! Fixed-order feature derivation.
//!
//! The classifier and scaler artifacts were fitted on one specific column
//! layout. [`FeatureSchema::CARDIO_V3`] pins that layout: names, order and
//! how many leading columns pass through the scaler. Earlier layouts (a
//! 5-column passthrough without scaling, and a 6-column BMI / risk score /
//! mean arterial pressure variant) are not served.

use serde::Serialize;

use crate::prediction::observation::ValidObservation;

/// Versioned contract between feature derivation and the trained artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    pub id: &'static str,
    pub names: &'static [&'static str],
    /// Columns `0..scaled_prefix` go through the scaler, the rest pass through.
    pub scaled_prefix: usize,
}

pub const AGE: usize = 0;
pub const AP_HI: usize = 1;
pub const AP_LO: usize = 2;
pub const CHOLESTEROL: usize = 3;
pub const ACTIVE: usize = 4;

impl FeatureSchema {
    pub const CARDIO_V3: FeatureSchema = FeatureSchema {
        id: "cardio-v3",
        names: &["age", "ap_hi", "ap_lo", "cholesterol", "active"],
        scaled_prefix: 3,
    };

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn scaled_names(&self) -> &'static [&'static str] {
        &self.names[..self.scaled_prefix]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }
}

/// Feature vector in [`FeatureSchema::CARDIO_V3`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures([f64; 5]);

impl DerivedFeatures {
    pub fn schema(&self) -> &'static FeatureSchema {
        &FeatureSchema::CARDIO_V3
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema().position(name).map(|i| self.0[i])
    }

    /// `(name, value)` pairs in positional order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema().names.iter().copied().zip(self.0.iter().copied())
    }
}

/// Project a validated observation onto the canonical layout.
pub fn derive_features(obs: &ValidObservation) -> DerivedFeatures {
    let mut v = [0.0; 5];
    v[AGE] = f64::from(obs.age());
    v[AP_HI] = f64::from(obs.ap_hi());
    v[AP_LO] = f64::from(obs.ap_lo());
    v[CHOLESTEROL] = f64::from(obs.cholesterol().ordinal());
    v[ACTIVE] = if obs.active() { 1.0 } else { 0.0 };
    DerivedFeatures(v)
}
