//! Decision threshold chosen at training time.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ArtifactKind, ArtifactLoadError};

/// Probability cutoff in `[0, 1]`; `p >= threshold` is the positive label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdFile {
    Bare(f64),
    Object { threshold: f64 },
}

impl Threshold {
    pub fn new(value: f64) -> std::result::Result<Self, String> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(format!("threshold must be within [0, 1], got {value}"));
        }
        Ok(Self(value))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Threshold, path, e))?;
        let value = match serde_json::from_str::<ThresholdFile>(&content)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Threshold, path, e))?
        {
            ThresholdFile::Bare(v) | ThresholdFile::Object { threshold: v } => v,
        };
        Self::new(value)
            .map_err(|reason| ArtifactLoadError::invalid(ArtifactKind::Threshold, path, reason))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Label for a positive-class probability.
    pub fn label(self, probability: f64) -> u8 {
        u8::from(probability >= self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_probability_is_positive() {
        let t = Threshold::new(0.42).unwrap();
        assert_eq!(t.label(0.42), 1);
        assert_eq!(t.label(0.4199), 0);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Threshold::new(1.5).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn reads_bare_and_object_forms() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        let obj = dir.path().join("obj.json");
        std::fs::write(&bare, "0.37").unwrap();
        std::fs::write(&obj, r#"{"threshold": 0.61}"#).unwrap();

        assert_eq!(Threshold::from_file(&bare).unwrap().value(), 0.37);
        assert_eq!(Threshold::from_file(&obj).unwrap().value(), 0.61);
    }

    #[test]
    fn missing_file_carries_io_cause() {
        let err = Threshold::from_file("/nonexistent/threshold.json").unwrap_err();
        assert_eq!(err.kind, ArtifactKind::Threshold);
        assert!(matches!(err.source, crate::error::ArtifactLoadCause::Io(_)));
    }
}
