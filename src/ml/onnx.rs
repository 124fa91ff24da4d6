//! ONNX classifier (pure Rust via `tract-onnx`).
//!
//! Lets a classifier exported with `skl2onnx` or similar be served without
//! Python. The graph is specialised to a fixed `[1, n_features]` f32 input.

use std::path::Path;

use tract_onnx::prelude::*;

use crate::error::{ArtifactKind, ArtifactLoadError, ModelError};
use crate::ml::{check_proba, Classifier};

#[derive(Clone)]
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    n_features: usize,
    output_dim: usize,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("n_features", &self.n_features)
            .field("output_dim", &self.output_dim)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load an ONNX classifier taking a single `[1, n_features]` row.
    pub fn load<P: AsRef<Path>>(path: P, n_features: usize) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let invalid = |reason: String| ArtifactLoadError::invalid(ArtifactKind::Classifier, path, reason);

        if n_features == 0 {
            return Err(invalid("n_features must be > 0".to_string()));
        }
        if !path.exists() {
            return Err(ArtifactLoadError::new(
                ArtifactKind::Classifier,
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "ONNX file not found"),
            ));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| invalid(format!("onnx load failed: {e}")))?
            .with_input_fact(0, f32::fact([1, n_features]).into())
            .map_err(|e| invalid(format!("onnx input fact failed: {e}")))?
            .into_optimized()
            .map_err(|e| invalid(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| invalid(format!("onnx runnable failed: {e}")))?;

        let mut model = Self {
            plan,
            n_features,
            output_dim: 0,
        };

        // Infer output_dim by running a dummy forward pass.
        let probe = model
            .run(&vec![0.0; n_features])
            .map_err(|e| invalid(e.to_string()))?;
        if !(1..=2).contains(&probe.len()) {
            return Err(invalid(format!(
                "classifier must emit 1 or 2 probabilities, got {}",
                probe.len()
            )));
        }
        model.output_dim = probe.len();
        Ok(model)
    }

    fn run(&self, features: &[f64]) -> Result<Vec<f32>, ModelError> {
        let input: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let tensor = tract_ndarray::Array2::<f32>::from_shape_vec((1, self.n_features), input)
            .map_err(|e| ModelError::Backend(format!("onnx input reshape failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| ModelError::Backend(format!("onnx run failed: {e}")))?;

        // skl2onnx emits (label, probabilities); the probabilities are last.
        let Some(last) = outputs.last() else {
            return Err(ModelError::Backend("onnx produced no outputs".to_string()));
        };
        let arr = last
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Backend(format!("onnx output decode failed: {e}")))?;
        Ok(arr.iter().copied().collect())
    }
}

impl Classifier for OnnxClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::Shape {
                model: "OnnxClassifier",
                expected: self.n_features,
                got: features.len(),
            });
        }

        let out = self.run(features)?;
        let proba = match out.as_slice() {
            [p1] => [1.0 - f64::from(*p1), f64::from(*p1)],
            [p0, p1] => [f64::from(*p0), f64::from(*p1)],
            other => {
                return Err(ModelError::Backend(format!(
                    "classifier emitted {} outputs",
                    other.len()
                )))
            }
        };
        check_proba(proba)
    }
}
