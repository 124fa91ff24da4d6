//! Z-score scaler exported from training (`(x - mean) / scale`).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ArtifactKind, ArtifactLoadError, ModelError};
use crate::ml::Scaler;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names seen at fit time, in fit order.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            feature_names: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Scaler, path, e))?;
        let scaler: Self = serde_json::from_str(&content)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Scaler, path, e))?;
        scaler
            .validate()
            .map_err(|reason| ArtifactLoadError::invalid(ArtifactKind::Scaler, path, reason))?;
        Ok(scaler)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.is_empty() {
            return Err("mean must not be empty".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean length {} != scale length {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err("mean must be finite".to_string());
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("scale must be finite and > 0".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "feature_names length {} != mean length {}",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError> {
        rows.iter()
            .map(|row| {
                if row.len() != self.mean.len() {
                    return Err(ModelError::Shape {
                        model: "StandardScaler",
                        expected: self.mean.len(),
                        got: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(x, (m, s))| (x - m) / s)
                    .collect())
            })
            .collect()
    }
}
