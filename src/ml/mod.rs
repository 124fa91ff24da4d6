//! Model artifacts used by the prediction pipeline.
//!
//! Every artifact is loaded once at startup and then only read. The
//! [`Classifier`] and [`Scaler`] traits are the seams the pipeline scores
//! through, so tests can substitute recording mocks.

pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;
pub mod threshold;

use crate::error::ModelError;

pub use dense::{Activation, MlpClassifier, MlpLayer};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;
pub use threshold::Threshold;

/// Binary probabilistic classifier.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Width of the feature vector the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Returns `[P(class = 0), P(class = 1)]` for a single sample.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError>;
}

/// Column-wise feature transform fitted at training time.
#[cfg_attr(test, mockall::automock)]
pub trait Scaler: Send + Sync {
    /// Number of columns the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Transform a row-major matrix. Every row must be `n_features()` wide.
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ModelError>;
}

/// Checks a `predict_proba` pair before it reaches thresholding.
pub(crate) fn check_proba(proba: [f64; 2]) -> Result<[f64; 2], ModelError> {
    if proba.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
        return Err(ModelError::Numeric(format!(
            "class probabilities out of range: {proba:?}"
        )));
    }
    Ok(proba)
}
